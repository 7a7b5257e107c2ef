#![no_main]

use libfuzzer_sys::fuzz_target;
use fallback_proxy::{
    arg, Args, Bindable, Contract, DispatchTableBuilder, FallbackProxy,
    ImplementationRegistry, ProxyError,
};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let registry = ImplementationRegistry::new();
    let contract = Contract::new("Fuzzed")
        .op0("ping")
        .op1::<u64>("echo")
        .op2::<u64, bool>("mix");
    let proxy = FallbackProxy::builder(contract)
        .preferred("fuzz.Missing")
        .build(&registry, || FuzzService)
        .unwrap();

    // Each byte drives one invocation with an arbitrary argument shape.
    for &byte in data.iter().take(64) {
        let (name, args): (&'static str, Args) = match byte % 8 {
            0 => ("ping", vec![]),
            1 => ("echo", vec![arg(byte as u64)]),
            2 => ("mix", vec![arg(byte as u64), arg(byte % 2 == 0)]),
            // Shapes that must miss: wrong types, wrong arity, wrong name.
            3 => ("echo", vec![arg(byte as u32)]),
            4 => ("echo", vec![]),
            5 => ("ping", vec![arg(byte as u64)]),
            6 => ("mix", vec![arg(byte % 2 == 0), arg(byte as u64)]),
            _ => ("absent", vec![]),
        };

        match proxy.invoke(name, args) {
            Ok(_) => assert!(byte % 8 <= 2),
            Err(ProxyError::UnboundMethod(_)) => assert!(byte % 8 > 2),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
});

struct FuzzService;

impl Bindable for FuzzService {
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
        table.bind0("ping", || 0u8);
        table.bind1("echo", |value: u64| value);
        table.bind2("mix", |value: u64, flag: bool| if flag { value } else { 0 });
    }
}
