//! Explicit lazily-filled cache with an invalidate operation.
//!
//! Backing implementations that compute an expensive answer once (build
//! metadata, platform capability probes) own one of these instead of a
//! process-wide static, so the cached value's lifetime is scoped to its
//! owner and refresh is an explicit call.

use std::sync::Arc;

#[cfg(feature = "parking-lot")]
use parking_lot::Mutex;
#[cfg(not(feature = "parking-lot"))]
use std::sync::Mutex;

#[cfg(feature = "parking-lot")]
type Guard<'a, T> = parking_lot::MutexGuard<'a, T>;
#[cfg(not(feature = "parking-lot"))]
type Guard<'a, T> = std::sync::MutexGuard<'a, T>;

/// Lazily-filled, invalidatable cache slot.
///
/// `get_or_fill` fills the slot on first access and returns the cached
/// value afterwards; `invalidate` empties it so the next access fills
/// again. Values are shared as `Arc<T>`.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::LazyCache;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let fills = AtomicU32::new(0);
/// let cache = LazyCache::new();
///
/// let a = cache.get_or_fill(|| {
///     fills.fetch_add(1, Ordering::SeqCst);
///     "computed".to_string()
/// });
/// let b = cache.get_or_fill(|| unreachable!("already filled"));
/// assert_eq!(*a, "computed");
/// assert_eq!(fills.load(Ordering::SeqCst), 1);
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
///
/// cache.invalidate();
/// assert!(cache.peek().is_none());
/// ```
pub struct LazyCache<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> LazyCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    fn lock(&self) -> Guard<'_, Option<Arc<T>>> {
        #[cfg(feature = "parking-lot")]
        {
            self.slot.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            // A poisoned slot only ever holds a fully-built value or None.
            self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    /// Returns the cached value, filling it with `fill` if empty.
    ///
    /// The lock is held across `fill`, so concurrent first accesses run
    /// the filler exactly once.
    pub fn get_or_fill<F: FnOnce() -> T>(&self, fill: F) -> Arc<T> {
        let mut slot = self.lock();
        if let Some(value) = slot.as_ref() {
            return Arc::clone(value);
        }
        let value = Arc::new(fill());
        *slot = Some(Arc::clone(&value));
        value
    }

    /// Returns the cached value without filling.
    pub fn peek(&self) -> Option<Arc<T>> {
        self.lock().clone()
    }

    /// Empties the slot; the next access fills again.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }
}

impl<T> Default for LazyCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
