//! Explicit name-to-factory registry for preferred implementations.
//!
//! Rust has no lookup-by-class-name facility, so the dynamic step is
//! replaced by a statically assembled table: callers register the
//! platform-restricted candidates under their names at build time, and the
//! resolver consults the table instead of scanning the environment.

use std::collections::HashMap;
use std::sync::Arc;

use crate::binder::Bindable;
use crate::error::BoxError;

type Factory = Arc<dyn Fn() -> Result<Arc<dyn Bindable>, BoxError> + Send + Sync>;

/// Name-to-factory table for preferred implementations.
///
/// Registration uses replace semantics: registering a name twice keeps the
/// last factory. Factories are zero-argument; a factory that cannot produce
/// its instance returns an error, which the resolver treats the same as the
/// name being absent.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::{Bindable, DispatchTableBuilder, ImplementationRegistry};
/// use std::sync::Arc;
///
/// struct SafTicketing;
///
/// impl Bindable for SafTicketing {
///     fn implementation_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
///         table.bind1("generate", |application_id: String| {
///             format!("ticket-for-{}", application_id)
///         });
///     }
/// }
///
/// let mut registry = ImplementationRegistry::new();
/// registry.register("platform.SafTicketing", || SafTicketing);
/// assert!(registry.contains("platform.SafTicketing"));
/// assert!(!registry.contains("does.not.Exist"));
/// ```
pub struct ImplementationRegistry {
    entries: HashMap<&'static str, Factory>,
}

impl ImplementationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Registers an infallible factory under `name`.
    pub fn register<T, F>(&mut self, name: &'static str, factory: F) -> &mut Self
    where
        T: Bindable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_fallible(name, move || Ok(factory()))
    }

    /// Registers a factory whose construction can fail under `name`.
    ///
    /// A returned error makes the name unavailable at resolution time; the
    /// error text is reported to observers, never to callers.
    pub fn register_fallible<T, F>(&mut self, name: &'static str, factory: F) -> &mut Self
    where
        T: Bindable,
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let erased: Factory = Arc::new(move || {
            let instance = factory()?;
            Ok(Arc::new(instance) as Arc<dyn Bindable>)
        });
        self.entries.insert(name, erased);
        self
    }

    /// Whether a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the factory registered under `name`, if any.
    pub(crate) fn construct(&self, name: &str) -> Option<Result<Arc<dyn Bindable>, BoxError>> {
        self.entries.get(name).map(|factory| factory())
    }
}

impl Default for ImplementationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
