//! Method identifier types used as dispatch keys.

use std::any::{Any, TypeId};
use std::fmt;

/// Key for dispatch-table storage and lookup.
///
/// A `MethodKey` identifies an operation by its name and its ordered
/// parameter-type list. The return type and the declaring type are
/// deliberately excluded, so an operation declared on an ancestor and an
/// override on the concrete type produce the same key.
///
/// Keys built at bind time carry the parameter type names for diagnostics;
/// keys built at invocation time (probe keys) only know the runtime
/// `TypeId`s of the supplied arguments. Equality and hashing therefore
/// ignore the display names.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::MethodKey;
///
/// let greet = MethodKey::of1::<String>("greet");
/// assert_eq!(greet.name(), "greet");
/// assert_eq!(greet.arity(), 1);
/// assert_eq!(greet.to_string(), "greet(alloc::string::String)");
/// ```
#[derive(Debug, Clone)]
pub struct MethodKey {
    name: &'static str,
    params: Vec<TypeId>,
    /// Display only; empty for probe keys.
    param_names: Vec<&'static str>,
}

impl MethodKey {
    /// Key for a zero-parameter operation.
    pub fn of0(name: &'static str) -> Self {
        Self { name, params: Vec::new(), param_names: Vec::new() }
    }

    /// Key for a one-parameter operation.
    pub fn of1<A: Any>(name: &'static str) -> Self {
        Self {
            name,
            params: vec![TypeId::of::<A>()],
            param_names: vec![std::any::type_name::<A>()],
        }
    }

    /// Key for a two-parameter operation.
    pub fn of2<A: Any, B: Any>(name: &'static str) -> Self {
        Self {
            name,
            params: vec![TypeId::of::<A>(), TypeId::of::<B>()],
            param_names: vec![std::any::type_name::<A>(), std::any::type_name::<B>()],
        }
    }

    /// Key for a three-parameter operation.
    ///
    /// Operations with more than three parameters should take a single
    /// parameter-struct instead.
    pub fn of3<A: Any, B: Any, C: Any>(name: &'static str) -> Self {
        Self {
            name,
            params: vec![TypeId::of::<A>(), TypeId::of::<B>(), TypeId::of::<C>()],
            param_names: vec![
                std::any::type_name::<A>(),
                std::any::type_name::<B>(),
                std::any::type_name::<C>(),
            ],
        }
    }

    /// Builds the lookup key for an invocation from the runtime types of
    /// the supplied arguments. Carries no display names.
    pub(crate) fn probe(name: &'static str, args: &[Box<dyn Any + Send>]) -> Self {
        Self {
            name,
            params: args.iter().map(|a| a.as_ref().type_id()).collect(),
            param_names: Vec::new(),
        }
    }

    /// The operation name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if self.param_names.len() == self.params.len() {
            for (i, name) in self.param_names.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", name)?;
            }
        } else {
            // Probe key; the concrete type names are not recoverable.
            for i in 0..self.params.len() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "_")?;
            }
        }
        write!(f, ")")
    }
}

// Equality and hashing cover (name, parameter TypeIds) only, so bind-time
// keys and probe keys land in the same bucket.
impl PartialEq for MethodKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl Eq for MethodKey {}

impl std::hash::Hash for MethodKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.params.hash(state);
    }
}

// Ordering for the sorted small-table storage.
impl PartialOrd for MethodKey {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MethodKey {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.params.cmp(&other.params))
    }
}
