//! # fallback-proxy
//!
//! Transparent preferred-or-fallback delegation proxies with method-level
//! dispatch.
//!
//! Some implementations only work where a platform facility exists — a
//! restricted security subsystem, a vendor library — while every other
//! environment needs a portable default. This crate lets a caller obtain a
//! single object exposing a target contract, backed by whichever of the two
//! could actually be constructed, with no caller-side branching on
//! availability.
//!
//! ## Features
//!
//! - **Transparent failover**: the preferred implementation is tried by
//!   name; any failure silently selects the fallback
//! - **Method-level dispatch**: an immutable per-proxy table maps
//!   (name, parameter types) to bound call targets
//! - **Most-derived-wins binding**: contributions from embedded base
//!   components never override the concrete type's own methods
//! - **Introspection overlay**: every proxy reports which implementation
//!   backs it, with defined precedence on name collisions
//! - **Contract coverage check**: construction fails unless every declared
//!   operation is bound — no partially wired proxy escapes
//! - **Thread-safe dispatch**: the table is read-only after construction,
//!   so invocation needs no locking
//!
//! ## Quick Start
//!
//! ```rust
//! use fallback_proxy::{arg, create_proxy, Bindable, Contract, DispatchTableBuilder, ImplementationRegistry};
//! use std::sync::Arc;
//!
//! // The platform-restricted candidate, registered under a name.
//! struct SafTicketing;
//!
//! impl Bindable for SafTicketing {
//!     fn implementation_name(&self) -> &'static str {
//!         std::any::type_name::<Self>()
//!     }
//!     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
//!         table.bind2("generate", |user: String, application_id: String| {
//!             format!("ticket:{}:{}", user, application_id)
//!         });
//!     }
//! }
//!
//! // The portable default.
//! struct DummyTicketing;
//!
//! impl Bindable for DummyTicketing {
//!     fn implementation_name(&self) -> &'static str {
//!         std::any::type_name::<Self>()
//!     }
//!     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
//!         table.bind2("generate", |_user: String, _application_id: String| {
//!             "dummy-ticket".to_string()
//!         });
//!     }
//! }
//!
//! let mut registry = ImplementationRegistry::new();
//! registry.register("platform.SafTicketing", || SafTicketing);
//!
//! let contract = Contract::new("Ticketing").op2::<String, String>("generate");
//! let proxy = create_proxy(&registry, contract, "platform.SafTicketing", || DummyTicketing).unwrap();
//!
//! // Callers use the proxy like the backing instance itself.
//! let ticket: String = proxy
//!     .invoke_as("generate", vec![arg("ann".to_string()), arg("ZOWEAPPL".to_string())])
//!     .unwrap();
//! assert_eq!(ticket, "ticket:ann:ZOWEAPPL");
//!
//! // And can ask which variant they got.
//! assert!(proxy.is_preferred());
//! assert!(proxy.implementation_name().ends_with("SafTicketing"));
//! ```
//!
//! ## Failover
//!
//! Resolution tries the name in the [`ImplementationRegistry`]; a missing
//! name or a factory error collapses into one outcome — preferred
//! unavailable — which is reported to observers and absorbed. The fallback
//! factory then runs exactly once. Callers see a working proxy either way,
//! or an immediate construction error for invalid inputs; never a partial
//! proxy.
//!
//! ## Introspection precedence
//!
//! The proxy overlays two zero-parameter operations,
//! [`OP_IMPLEMENTATION_NAME`] and [`OP_IS_PREFERRED`], after the backing
//! instance's methods are bound. The overlay overwrites unconditionally, so
//! a backing instance declaring a same-name, same-shape method is silently
//! shadowed — a documented naming hazard, not an error.

// Module declarations
pub mod binder;
pub mod cache;
pub mod contract;
pub mod error;
pub mod key;
pub mod observer;
pub mod proxy;
pub mod registry;
pub mod resolver;
pub mod table;

// Internal modules
mod dispatcher;

// Re-export core types
pub use binder::{Bindable, OP_IMPLEMENTATION_NAME, OP_IS_PREFERRED};
pub use cache::LazyCache;
pub use contract::Contract;
pub use error::{BoxError, ProxyError, ProxyResult};
pub use key::MethodKey;
pub use observer::{LoggingObserver, ProxyObserver};
pub use proxy::{create_proxy, FallbackProxy, ProxyBuilder};
pub use registry::ImplementationRegistry;
pub use resolver::Provenance;
pub use table::{arg, Args, DispatchTable, DispatchTableBuilder, MethodDescriptor};
