//! The composed proxy object and its construction entry points.

use std::any::Any;
use std::sync::Arc;

use crate::binder::{self, Bindable};
use crate::contract::Contract;
use crate::dispatcher;
use crate::error::{ProxyError, ProxyResult};
use crate::observer::{LoggingObserver, Observers, ProxyObserver};
use crate::registry::ImplementationRegistry;
use crate::resolver::{self, ImplementationHandle, Provenance};
use crate::table::{Args, DispatchTable, MethodDescriptor};

/// A proxy exposing a contract's operations, transparently backed by either
/// the preferred implementation or the fallback.
///
/// The proxy owns its backing instance and its dispatch table; both are
/// created together at construction and never change afterward. Dispatch is
/// lock-free and safe to call from multiple threads; thread-safety of the
/// backing instance's own operations remains the backing instance's
/// responsibility.
///
/// Alongside the contract operations the proxy carries the two
/// introspection accessors, which always answer from the proxy's own state
/// and take precedence over identically-keyed instance methods.
pub struct FallbackProxy {
    handle: ImplementationHandle,
    table: DispatchTable,
}

impl FallbackProxy {
    /// Starts a builder for a proxy over `contract`.
    pub fn builder(contract: Contract) -> ProxyBuilder {
        ProxyBuilder::new(contract)
    }

    /// Type name of the concrete implementation backing this proxy.
    pub fn implementation_name(&self) -> &'static str {
        self.handle.instance.implementation_name()
    }

    /// Which variant backs this proxy.
    pub fn provenance(&self) -> Provenance {
        self.handle.provenance
    }

    /// True iff the preferred implementation was constructed and is in use.
    pub fn is_preferred(&self) -> bool {
        self.handle.provenance.is_preferred()
    }

    /// Invokes a bound operation by name with type-erased arguments.
    ///
    /// The dispatch key is derived from `name` and the runtime types of
    /// `args`. The bound target's own failure is propagated unchanged as
    /// [`ProxyError::Invocation`]; an unbound name is an integrity failure.
    pub fn invoke(&self, name: &'static str, args: Args) -> ProxyResult<Box<dyn Any + Send>> {
        dispatcher::dispatch(&self.table, name, args)
    }

    /// Invokes a bound operation and downcasts the result.
    ///
    /// ```rust
    /// # use fallback_proxy::{arg, Bindable, Contract, DispatchTableBuilder, FallbackProxy, ImplementationRegistry};
    /// # use std::sync::Arc;
    /// # struct DummyGreeter;
    /// # impl Bindable for DummyGreeter {
    /// #     fn implementation_name(&self) -> &'static str { std::any::type_name::<Self>() }
    /// #     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
    /// #         table.bind1("greet", |_name: String| "(unavailable)".to_string());
    /// #     }
    /// # }
    /// # let registry = ImplementationRegistry::new();
    /// # let contract = Contract::new("Greeter").op1::<String>("greet");
    /// let proxy = FallbackProxy::builder(contract)
    ///     .preferred("does.not.Exist")
    ///     .build(&registry, || DummyGreeter)
    ///     .unwrap();
    /// let greeting: String = proxy.invoke_as("greet", vec![arg("Ann".to_string())]).unwrap();
    /// assert_eq!(greeting, "(unavailable)");
    /// ```
    pub fn invoke_as<R: Any>(&self, name: &'static str, args: Args) -> ProxyResult<R> {
        self.invoke(name, args)?
            .downcast::<R>()
            .map(|boxed| *boxed)
            .map_err(|_| ProxyError::TypeMismatch(std::any::type_name::<R>()))
    }

    /// Descriptors for every bound operation, overlay included.
    pub fn method_descriptors(&self) -> Vec<MethodDescriptor> {
        self.table.descriptors()
    }
}

/// Builder assembling a [`FallbackProxy`].
///
/// Collects the contract, the preferred implementation name, and any
/// observers; [`build`](ProxyBuilder::build) runs resolution, binding, and
/// the contract-coverage check in one step, so either a fully wired proxy
/// comes back or nothing does.
pub struct ProxyBuilder {
    contract: Contract,
    preferred: Option<&'static str>,
    observers: Observers,
}

impl ProxyBuilder {
    fn new(contract: Contract) -> Self {
        Self {
            contract,
            preferred: None,
            observers: Observers::new(),
        }
    }

    /// Name of the preferred implementation to try first.
    pub fn preferred(mut self, name: &'static str) -> Self {
        self.preferred = Some(name);
        self
    }

    /// Attaches an observer for resolution events.
    pub fn observer(mut self, observer: Arc<dyn ProxyObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Resolves the backing instance, binds the dispatch table, and checks
    /// contract coverage.
    ///
    /// The fallback factory is `FnOnce` and runs at most once, only when
    /// the preferred implementation is unavailable. Precondition failures
    /// (missing or empty preferred name, contract without operations) and
    /// an uncovered contract operation fail construction; no partial proxy
    /// escapes.
    pub fn build<T, F>(
        self,
        registry: &ImplementationRegistry,
        fallback: F,
    ) -> ProxyResult<FallbackProxy>
    where
        T: Bindable,
        F: FnOnce() -> T,
    {
        if self.contract.is_empty() {
            return Err(ProxyError::Precondition(format!(
                "contract {} declares no operations",
                self.contract.name()
            )));
        }
        let preferred = self.preferred.ok_or_else(|| {
            ProxyError::Precondition("preferred implementation name is required".to_string())
        })?;
        if preferred.is_empty() {
            return Err(ProxyError::Precondition(
                "preferred implementation name can't be empty".to_string(),
            ));
        }

        let handle = resolver::resolve(registry, preferred, fallback, &self.observers);
        let table = binder::bind_instance(&handle);

        if let Some(missing) = self.contract.first_unbound(&table) {
            return Err(ProxyError::IncompleteBinding {
                contract: self.contract.name(),
                missing: missing.to_string(),
            });
        }

        Ok(FallbackProxy { handle, table })
    }
}

/// Creates a proxy for `contract`, backed by the implementation registered
/// under `preferred` when it can be constructed, and by the fallback
/// factory's product otherwise.
///
/// This is the single construction entry point. A [`LoggingObserver`] is
/// attached, so an unavailable preferred implementation is logged as a
/// recoverable condition; callers never see it fail over.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::{arg, create_proxy, Bindable, Contract, DispatchTableBuilder, ImplementationRegistry};
/// use std::sync::Arc;
///
/// struct RealGreeter;
///
/// impl Bindable for RealGreeter {
///     fn implementation_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
///         table.bind1("greet", |name: String| format!("Hello, {}", name));
///     }
/// }
///
/// struct DummyGreeter;
///
/// impl Bindable for DummyGreeter {
///     fn implementation_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
///         table.bind1("greet", |_name: String| "(unavailable)".to_string());
///     }
/// }
///
/// let mut registry = ImplementationRegistry::new();
/// registry.register("greeters.RealGreeter", || RealGreeter);
///
/// let contract = Contract::new("Greeter").op1::<String>("greet");
///
/// // The preferred implementation resolves, so it backs the proxy.
/// let proxy = create_proxy(&registry, contract.clone(), "greeters.RealGreeter", || DummyGreeter).unwrap();
/// assert!(proxy.is_preferred());
/// let greeting: String = proxy.invoke_as("greet", vec![arg("Ann".to_string())]).unwrap();
/// assert_eq!(greeting, "Hello, Ann");
///
/// // An unknown name silently falls back.
/// let proxy = create_proxy(&registry, contract, "does.not.Exist", || DummyGreeter).unwrap();
/// assert!(!proxy.is_preferred());
/// let greeting: String = proxy.invoke_as("greet", vec![arg("Ann".to_string())]).unwrap();
/// assert_eq!(greeting, "(unavailable)");
/// ```
pub fn create_proxy<T, F>(
    registry: &ImplementationRegistry,
    contract: Contract,
    preferred: &'static str,
    fallback: F,
) -> ProxyResult<FallbackProxy>
where
    T: Bindable,
    F: FnOnce() -> T,
{
    FallbackProxy::builder(contract)
        .preferred(preferred)
        .observer(Arc::new(LoggingObserver::new()))
        .build(registry, fallback)
}
