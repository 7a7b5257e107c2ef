use criterion::{criterion_group, criterion_main, black_box, BenchmarkId, Criterion};
use fallback_proxy::*;
use std::sync::Arc;

// ===== Fixtures =====

struct EchoService;

impl Bindable for EchoService {
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
        table.bind0("ping", || 1u64);
        table.bind1("echo", |value: u64| value);
        table.bind1("greet", |name: String| format!("Hello, {}", name));
    }
}

/// Binds `extra` additional operations to grow the table past the
/// small-storage threshold.
struct WideService {
    extra: usize,
}

impl Bindable for WideService {
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
        table.bind1("echo", |value: u64| value);
        // Static names so keys stay 'static; 32 is plenty for the benchmark.
        static NAMES: [&str; 32] = [
            "m00", "m01", "m02", "m03", "m04", "m05", "m06", "m07", "m08", "m09", "m10",
            "m11", "m12", "m13", "m14", "m15", "m16", "m17", "m18", "m19", "m20", "m21",
            "m22", "m23", "m24", "m25", "m26", "m27", "m28", "m29", "m30", "m31",
        ];
        for name in NAMES.iter().take(self.extra) {
            table.bind0(*name, || 0u64);
        }
    }
}

fn echo_proxy() -> FallbackProxy {
    let registry = ImplementationRegistry::new();
    FallbackProxy::builder(
        Contract::new("Echo")
            .op0("ping")
            .op1::<u64>("echo")
            .op1::<String>("greet"),
    )
    .preferred("does.not.Exist")
    .build(&registry, || EchoService)
    .unwrap()
}

// ===== Micro Benchmarks =====

fn bench_dispatch_hit(c: &mut Criterion) {
    let proxy = echo_proxy();

    c.bench_function("dispatch_nullary", |b| {
        b.iter(|| {
            let v: u64 = proxy.invoke_as("ping", vec![]).unwrap();
            black_box(v);
        })
    });

    c.bench_function("dispatch_unary", |b| {
        b.iter(|| {
            let v: u64 = proxy.invoke_as("echo", vec![arg(7u64)]).unwrap();
            black_box(v);
        })
    });
}

fn bench_introspection(c: &mut Criterion) {
    let proxy = echo_proxy();

    c.bench_function("introspection_accessor", |b| {
        b.iter(|| {
            black_box(proxy.is_preferred());
            black_box(proxy.implementation_name());
        })
    });

    c.bench_function("introspection_dispatched", |b| {
        b.iter(|| {
            let v: bool = proxy.invoke_as(OP_IS_PREFERRED, vec![]).unwrap();
            black_box(v);
        })
    });
}

fn bench_construction(c: &mut Criterion) {
    let mut registry = ImplementationRegistry::new();
    registry.register("bench.EchoService", || EchoService);
    let contract = Contract::new("Echo")
        .op0("ping")
        .op1::<u64>("echo")
        .op1::<String>("greet");

    c.bench_function("construct_preferred", |b| {
        b.iter(|| {
            let proxy = FallbackProxy::builder(contract.clone())
                .preferred("bench.EchoService")
                .build(&registry, || EchoService)
                .unwrap();
            black_box(proxy.is_preferred());
        })
    });

    c.bench_function("construct_fallback", |b| {
        b.iter(|| {
            let proxy = FallbackProxy::builder(contract.clone())
                .preferred("does.not.Exist")
                .build(&registry, || EchoService)
                .unwrap();
            black_box(proxy.is_preferred());
        })
    });
}

// ===== Macro Benchmarks =====

fn bench_table_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_width");

    for &extra in &[4usize, 16, 32] {
        let registry = ImplementationRegistry::new();
        let proxy = FallbackProxy::builder(Contract::new("Wide").op1::<u64>("echo"))
            .preferred("does.not.Exist")
            .build(&registry, move || WideService { extra })
            .unwrap();

        group.bench_with_input(BenchmarkId::new("lookup", extra), &extra, |b, _| {
            b.iter(|| {
                let v: u64 = proxy.invoke_as("echo", vec![arg(7u64)]).unwrap();
                black_box(v);
            })
        });
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    let proxy = echo_proxy();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("dispatch_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let proxy_ref = &proxy;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v: u64 = proxy_ref.invoke_as("echo", vec![arg(7u64)]).unwrap();
                                    black_box(v);
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    micro_benches,
    bench_dispatch_hit,
    bench_introspection,
    bench_construction
);
criterion_group!(macro_benches, bench_table_width, bench_contention);
criterion_main!(micro_benches, macro_benches);
