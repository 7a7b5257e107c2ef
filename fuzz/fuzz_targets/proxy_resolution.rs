#![no_main]

use libfuzzer_sys::fuzz_target;
use fallback_proxy::{
    arg, Bindable, BoxError, Contract, DispatchTableBuilder, FallbackProxy,
    ImplementationRegistry,
};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let pattern = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let register = pattern % 2 == 0;
    let factory_fails = (pattern >> 1) % 2 == 0;

    let mut registry = ImplementationRegistry::new();
    if register {
        if factory_fails {
            registry.register_fallible("fuzz.Preferred", || -> Result<PreferredService, BoxError> {
                Err("construction refused".into())
            });
        } else {
            registry.register("fuzz.Preferred", || PreferredService);
        }
    }

    let contract = Contract::new("Fuzzed").op1::<String>("echo");
    let proxy = FallbackProxy::builder(contract)
        .preferred("fuzz.Preferred")
        .build(&registry, || DefaultService)
        .unwrap();

    // Provenance must reflect whether the preferred path could construct.
    let expect_preferred = register && !factory_fails;
    assert_eq!(proxy.is_preferred(), expect_preferred);
    if expect_preferred {
        assert!(proxy.implementation_name().ends_with("PreferredService"));
    } else {
        assert!(proxy.implementation_name().ends_with("DefaultService"));
    }

    // Either backing answers the contract operation.
    let input = String::from_utf8_lossy(&data[4..]).into_owned();
    let out: String = proxy.invoke_as("echo", vec![arg(input.clone())]).unwrap();
    if expect_preferred {
        assert_eq!(out, input);
    } else {
        assert_eq!(out, "(default)");
    }
});

struct PreferredService;

impl Bindable for PreferredService {
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
        table.bind1("echo", |value: String| value);
    }
}

struct DefaultService;

impl Bindable for DefaultService {
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
        table.bind1("echo", |_value: String| "(default)".to_string());
    }
}
