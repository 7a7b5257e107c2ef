//! Error types for proxy construction and dispatch.

use std::fmt;

/// Boxed error type used by fallible factories and bound targets.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Proxy construction and dispatch errors
///
/// Construction-time variants (`Precondition`, `IncompleteBinding`) mean no
/// proxy was produced at all. `UnboundMethod` and `ArgumentMismatch` are
/// integrity failures: they indicate a contract/implementation mismatch and
/// are not conditions callers should routinely handle. `Invocation` is the
/// one pass-through variant: it carries the bound target's own failure
/// unchanged, available through [`std::error::Error::source`] for
/// downcasting to the original domain error.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::{Contract, FallbackProxy, ImplementationRegistry, ProxyError};
/// use fallback_proxy::{Bindable, DispatchTableBuilder};
/// use std::sync::Arc;
///
/// struct Dummy;
/// impl Bindable for Dummy {
///     fn implementation_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///     fn bind_methods(self: Arc<Self>, _table: &mut DispatchTableBuilder) {}
/// }
///
/// let registry = ImplementationRegistry::new();
/// let contract = Contract::new("Greeter").op1::<String>("greet");
/// let result = FallbackProxy::builder(contract)
///     .preferred("does.not.Exist")
///     .build(&registry, || Dummy);
///
/// // Dummy binds nothing, so the contract is not covered.
/// match result {
///     Err(ProxyError::IncompleteBinding { contract, .. }) => assert_eq!(contract, "Greeter"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug)]
pub enum ProxyError {
    /// Invalid construction input (empty preferred name, empty contract)
    Precondition(String),
    /// A contract operation had no binding after the binder ran
    IncompleteBinding {
        /// Contract name
        contract: &'static str,
        /// Display form of the first missing operation key
        missing: String,
    },
    /// Dispatch-time lookup miss; fatal integrity failure
    UnboundMethod(String),
    /// A bound target could not downcast an argument; defensive only, since
    /// key equality already guarantees matching types
    ArgumentMismatch {
        /// Method name
        method: &'static str,
        /// Zero-based argument position
        index: usize,
        /// Expected parameter type name
        expected: &'static str,
    },
    /// Return-value downcast failed in a typed invocation
    TypeMismatch(&'static str),
    /// The bound target's own failure, propagated unchanged
    Invocation(BoxError),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Precondition(msg) => write!(f, "Precondition failed: {}", msg),
            ProxyError::IncompleteBinding { contract, missing } => {
                write!(f, "Contract {} is not fully bound: missing {}", contract, missing)
            }
            ProxyError::UnboundMethod(sig) => write!(f, "No binding for method {}", sig),
            ProxyError::ArgumentMismatch { method, index, expected } => {
                write!(f, "Argument {} of {} is not a {}", index, method, expected)
            }
            ProxyError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            // Transparent: show the source failure as-is.
            ProxyError::Invocation(source) => write!(f, "{}", source),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Invocation(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for proxy operations
///
/// ```rust
/// use fallback_proxy::{ProxyError, ProxyResult};
///
/// fn check(name: &str) -> ProxyResult<()> {
///     if name.is_empty() {
///         return Err(ProxyError::Precondition("name can't be empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(check("ticketing").is_ok());
/// assert!(check("").is_err());
/// ```
pub type ProxyResult<T> = Result<T, ProxyError>;
