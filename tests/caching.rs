//! LazyCache behavior, standalone and owned by a backing implementation.

use fallback_proxy::{
    Bindable, Contract, DispatchTableBuilder, FallbackProxy, ImplementationRegistry, LazyCache,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_fill_happens_once() {
    let fills = AtomicU32::new(0);
    let cache = LazyCache::new();

    let first = cache.get_or_fill(|| {
        fills.fetch_add(1, Ordering::SeqCst);
        41u32
    });
    let second = cache.get_or_fill(|| {
        fills.fetch_add(1, Ordering::SeqCst);
        99u32
    });

    assert_eq!(*first, 41);
    assert_eq!(*second, 41);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fills.load(Ordering::SeqCst), 1);
}

#[test]
fn test_peek_does_not_fill() {
    let cache: LazyCache<u32> = LazyCache::new();
    assert!(cache.peek().is_none());

    cache.get_or_fill(|| 7);
    assert_eq!(cache.peek().map(|v| *v), Some(7));
}

#[test]
fn test_invalidate_forces_refill() {
    let fills = AtomicU32::new(0);
    let cache = LazyCache::new();

    cache.get_or_fill(|| fills.fetch_add(1, Ordering::SeqCst));
    cache.invalidate();
    assert!(cache.peek().is_none());

    cache.get_or_fill(|| fills.fetch_add(1, Ordering::SeqCst));
    assert_eq!(fills.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_first_access_fills_once() {
    let fills = Arc::new(AtomicU32::new(0));
    let cache = Arc::new(LazyCache::new());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let fills = Arc::clone(&fills);
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let value = cache.get_or_fill(|| {
                    fills.fetch_add(1, Ordering::SeqCst);
                    "filled".to_string()
                });
                assert_eq!(*value, "filled");
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(fills.load(Ordering::SeqCst), 1);
}

// ===== A backing implementation owning its cache =====

/// Reports build information, computed once and cached until cleared.
struct BuildInfoService {
    version: Arc<LazyCache<String>>,
    computes: Arc<AtomicU32>,
}

impl Bindable for BuildInfoService {
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
        let this = Arc::clone(&self);
        table.bind0("version", move || {
            let version = this.version.get_or_fill(|| {
                this.computes.fetch_add(1, Ordering::SeqCst);
                "1.4.2 build #207".to_string()
            });
            (*version).clone()
        });
    }
}

#[test]
fn test_backing_instance_caches_its_answer() {
    let version = Arc::new(LazyCache::new());
    let computes = Arc::new(AtomicU32::new(0));

    let registry = ImplementationRegistry::new();
    let cache = Arc::clone(&version);
    let counter = Arc::clone(&computes);
    let proxy = FallbackProxy::builder(Contract::new("BuildInfo").op0("version"))
        .preferred("platform.BuildInfoService")
        .build(&registry, move || BuildInfoService {
            version: cache,
            computes: counter,
        })
        .unwrap();

    let first: String = proxy.invoke_as("version", vec![]).unwrap();
    let second: String = proxy.invoke_as("version", vec![]).unwrap();
    assert_eq!(first, "1.4.2 build #207");
    assert_eq!(second, first);
    assert_eq!(computes.load(Ordering::SeqCst), 1);

    // Clearing the cache makes the next call recompute.
    version.invalidate();
    let third: String = proxy.invoke_as("version", vec![]).unwrap();
    assert_eq!(third, first);
    assert_eq!(computes.load(Ordering::SeqCst), 2);
}
