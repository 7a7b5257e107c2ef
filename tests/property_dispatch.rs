//! Property tests for key identity and dispatch behavior.

use fallback_proxy::{
    arg, Bindable, Contract, DispatchTableBuilder, FallbackProxy, ImplementationRegistry,
    LazyCache, MethodKey, ProxyError,
};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct EchoGreeter;

impl Bindable for EchoGreeter {
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
        table.bind1("greet", |name: String| format!("Hello, {}", name));
    }
}

fn echo_proxy() -> FallbackProxy {
    let registry = ImplementationRegistry::new();
    FallbackProxy::builder(Contract::new("Greeter").op1::<String>("greet"))
        .preferred("does.not.Exist")
        .build(&registry, || EchoGreeter)
        .unwrap()
}

// Fixed pool of distinct keys; equality must hold exactly on equal indices.
fn key_at(index: usize) -> MethodKey {
    match index {
        0 => MethodKey::of0("greet"),
        1 => MethodKey::of1::<String>("greet"),
        2 => MethodKey::of1::<u32>("greet"),
        3 => MethodKey::of2::<String, u32>("greet"),
        4 => MethodKey::of2::<u32, String>("greet"),
        5 => MethodKey::of0("farewell"),
        6 => MethodKey::of1::<String>("farewell"),
        _ => MethodKey::of3::<String, u32, bool>("greet"),
    }
}

fn hash_of(key: &MethodKey) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn prop_dispatch_formats_any_input(name in "[a-zA-Z0-9 .,-]{0,40}") {
        let proxy = echo_proxy();
        let out: String = proxy.invoke_as("greet", vec![arg(name.clone())]).unwrap();
        prop_assert_eq!(out, format!("Hello, {}", name));
    }

    #[test]
    fn prop_wrong_arity_is_always_unbound(extra in 1usize..4) {
        let proxy = echo_proxy();
        let mut args = vec![arg("Ann".to_string())];
        for _ in 0..extra {
            args.push(arg(0u8));
        }
        let result = proxy.invoke("greet", args);
        prop_assert!(matches!(result, Err(ProxyError::UnboundMethod(_))));
    }

    #[test]
    fn prop_key_equality_matches_pool_identity(i in 0usize..8, j in 0usize..8) {
        let a = key_at(i);
        let b = key_at(j);
        prop_assert_eq!(i == j, a == b);
    }

    #[test]
    fn prop_equal_keys_hash_equal(i in 0usize..8) {
        let a = key_at(i);
        let b = key_at(i);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
        prop_assert_eq!(a.clone(), b);
        // Cloning preserves identity too.
        prop_assert_eq!(hash_of(&a.clone()), hash_of(&a));
    }

    #[test]
    fn prop_lazy_cache_matches_model(ops in proptest::collection::vec(any::<Option<u32>>(), 0..20)) {
        let cache = LazyCache::new();
        let mut model: Option<u32> = None;

        for op in ops {
            match op {
                // Fill attempt: only lands if the slot is empty.
                Some(value) => {
                    let got = cache.get_or_fill(|| value);
                    let expected = *model.get_or_insert(value);
                    prop_assert_eq!(*got, expected);
                }
                // Invalidate.
                None => {
                    cache.invalidate();
                    model = None;
                }
            }
            prop_assert_eq!(cache.peek().map(|v| *v), model);
        }
    }
}
