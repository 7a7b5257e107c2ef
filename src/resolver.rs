//! Preferred-or-fallback resolution of the backing instance.

use std::sync::Arc;

use crate::binder::Bindable;
use crate::observer::Observers;
use crate::registry::ImplementationRegistry;

/// Records which implementation variant backs a proxy
///
/// Set once when the backing instance is chosen and immutable for the life
/// of the proxy.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::Provenance;
///
/// assert!(Provenance::Preferred.is_preferred());
/// assert!(!Provenance::Fallback.is_preferred());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The preferred implementation was constructed and is in use
    Preferred,
    /// The preferred implementation was unavailable; the fallback factory's
    /// product is in use
    Fallback,
}

impl Provenance {
    /// True iff the preferred implementation is in use.
    pub fn is_preferred(&self) -> bool {
        matches!(self, Provenance::Preferred)
    }
}

/// The chosen backing instance plus its provenance. Created once at proxy
/// construction, owned by the proxy, immutable thereafter.
pub(crate) struct ImplementationHandle {
    pub(crate) instance: Arc<dyn Bindable>,
    pub(crate) provenance: Provenance,
}

/// Attempts the preferred implementation; on any failure falls back.
///
/// Every failure mode — name not registered, the registered factory
/// returning an error — collapses into one outcome: preferred unavailable.
/// That outcome is reported to the observers and the fallback factory is
/// invoked exactly once (`FnOnce` makes a second call unrepresentable). On
/// success the fallback factory is never invoked.
pub(crate) fn resolve<T, F>(
    registry: &ImplementationRegistry,
    preferred: &'static str,
    fallback: F,
    observers: &Observers,
) -> ImplementationHandle
where
    T: Bindable,
    F: FnOnce() -> T,
{
    observers.resolving(preferred);

    match registry.construct(preferred) {
        Some(Ok(instance)) => {
            observers.resolved(instance.implementation_name(), Provenance::Preferred);
            return ImplementationHandle {
                instance,
                provenance: Provenance::Preferred,
            };
        }
        Some(Err(error)) => {
            observers.preferred_unavailable(preferred, &format!("construction failed: {}", error));
        }
        None => {
            observers.preferred_unavailable(preferred, "not registered");
        }
    }

    let instance: Arc<dyn Bindable> = Arc::new(fallback());
    observers.resolved(instance.implementation_name(), Provenance::Fallback);
    ImplementationHandle {
        instance,
        provenance: Provenance::Fallback,
    }
}
