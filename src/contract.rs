//! Contract descriptions: the operation set a proxy must expose.

use std::any::Any;

use crate::key::MethodKey;
use crate::table::DispatchTable;

/// Runtime description of the operation set both implementations must
/// satisfy.
///
/// A contract is the statically-assembled analog of an interface type: a
/// name plus the [`MethodKey`] of every operation the proxy must expose.
/// Construction validates the contract against the built dispatch table, so
/// a proxy either covers every listed operation or is never produced.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::Contract;
///
/// let greeter = Contract::new("Greeter").op1::<String>("greet");
/// assert_eq!(greeter.name(), "Greeter");
/// assert_eq!(greeter.operations().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Contract {
    name: &'static str,
    operations: Vec<MethodKey>,
}

impl Contract {
    /// Creates a contract with no operations yet.
    pub fn new(name: &'static str) -> Self {
        Self { name, operations: Vec::new() }
    }

    /// Adds a zero-parameter operation.
    pub fn op0(mut self, name: &'static str) -> Self {
        self.operations.push(MethodKey::of0(name));
        self
    }

    /// Adds a one-parameter operation.
    pub fn op1<A: Any>(mut self, name: &'static str) -> Self {
        self.operations.push(MethodKey::of1::<A>(name));
        self
    }

    /// Adds a two-parameter operation.
    pub fn op2<A: Any, B: Any>(mut self, name: &'static str) -> Self {
        self.operations.push(MethodKey::of2::<A, B>(name));
        self
    }

    /// Adds a three-parameter operation.
    pub fn op3<A: Any, B: Any, C: Any>(mut self, name: &'static str) -> Self {
        self.operations.push(MethodKey::of3::<A, B, C>(name));
        self
    }

    /// Adds an operation from a pre-built key.
    pub fn operation(mut self, key: MethodKey) -> Self {
        self.operations.push(key);
        self
    }

    /// The contract name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared operation set.
    pub fn operations(&self) -> &[MethodKey] {
        &self.operations
    }

    /// Whether the contract declares no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// First declared operation with no binding in `table`, if any.
    pub(crate) fn first_unbound<'a>(&'a self, table: &DispatchTable) -> Option<&'a MethodKey> {
        self.operations.iter().find(|key| !table.contains(key))
    }
}
