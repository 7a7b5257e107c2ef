//! Dispatch table: immutable mapping from method identifiers to bound call
//! targets.

use std::any::Any;

use crate::error::{BoxError, ProxyError, ProxyResult};
use crate::key::MethodKey;

#[cfg(feature = "ahash")]
type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// Type-erased argument list for a dispatched invocation.
pub type Args = Vec<Box<dyn Any + Send>>;

/// Boxes a value as a dispatch argument.
///
/// ```rust
/// use fallback_proxy::arg;
///
/// let args = vec![arg("Ann".to_string()), arg(3u32)];
/// assert_eq!(args.len(), 2);
/// ```
pub fn arg<T: Any + Send>(value: T) -> Box<dyn Any + Send> {
    Box::new(value)
}

type ErasedCall = Box<dyn Fn(Args) -> ProxyResult<Box<dyn Any + Send>> + Send + Sync>;

/// A bound call target: an erased closure holding the backing instance.
pub(crate) struct MethodBinding {
    /// Type name of the contributor, for diagnostics.
    origin: &'static str,
    /// True for the introspection overlay bindings.
    overlay: bool,
    call: ErasedCall,
}

impl MethodBinding {
    pub(crate) fn invoke(&self, args: Args) -> ProxyResult<Box<dyn Any + Send>> {
        (self.call)(args)
    }
}

/// Descriptor of one bound operation, for diagnostics and introspection.
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// Display form of the method key, e.g. `greet(alloc::string::String)`
    pub signature: String,
    /// Type name of the contributor that supplied the binding
    pub origin: &'static str,
    /// Whether this binding belongs to the introspection overlay
    pub overlay: bool,
}

/// Immutable mapping from [`MethodKey`] to bound call target.
///
/// Built once per proxy by the binder and never mutated afterward, so
/// lookups are safe for concurrent invocation from multiple threads without
/// locking. Storage is a hybrid of a sorted `Vec` for the first handful of
/// bindings (cache-friendly linear search) with a `HashMap` fallback for
/// larger method sets.
pub struct DispatchTable {
    small: Vec<(MethodKey, MethodBinding)>,
    large: Map<MethodKey, MethodBinding>,
    small_threshold: usize,
}

impl DispatchTable {
    fn new() -> Self {
        Self {
            small: Vec::new(),
            large: Map::default(),
            small_threshold: 16,
        }
    }

    /// Looks up the binding for a key.
    #[inline(always)]
    pub(crate) fn get(&self, key: &MethodKey) -> Option<&MethodBinding> {
        for (k, binding) in &self.small {
            if k == key {
                return Some(binding);
            }
        }
        self.large.get(key)
    }

    /// Whether a binding exists for `key`.
    #[inline(always)]
    pub fn contains(&self, key: &MethodKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of bound operations, overlay included.
    pub fn len(&self) -> usize {
        self.small.len() + self.large.len()
    }

    /// Whether the table holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.small.is_empty() && self.large.is_empty()
    }

    /// Descriptors for every bound operation.
    pub fn descriptors(&self) -> Vec<MethodDescriptor> {
        self.small
            .iter()
            .map(|(k, b)| (k, b))
            .chain(self.large.iter())
            .map(|(key, binding)| MethodDescriptor {
                signature: key.to_string(),
                origin: binding.origin,
                overlay: binding.overlay,
            })
            .collect()
    }
}

/// Builder for a [`DispatchTable`].
///
/// Handed to [`Bindable::bind_methods`](crate::Bindable::bind_methods)
/// during proxy construction. Registration is first-wins: a key already
/// present is never overwritten, so a type that registers its own methods
/// before delegating to an embedded base component gets most-derived-wins
/// semantics. The introspection overlay is applied afterwards by the binder
/// and is the only writer allowed to replace an existing binding.
///
/// Typed helpers cover arities 0 to 3, each in an infallible and a fallible
/// flavor; wider operations should take a parameter struct.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::{Bindable, DispatchTableBuilder};
/// use std::sync::Arc;
///
/// struct Greeter {
///     salutation: String,
/// }
///
/// impl Bindable for Greeter {
///     fn implementation_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///
///     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
///         let this = Arc::clone(&self);
///         table.bind1("greet", move |name: String| {
///             format!("{}, {}", this.salutation, name)
///         });
///     }
/// }
/// ```
pub struct DispatchTableBuilder {
    origin: &'static str,
    table: DispatchTable,
}

impl DispatchTableBuilder {
    pub(crate) fn new(origin: &'static str) -> Self {
        Self { origin, table: DispatchTable::new() }
    }

    /// Binds a zero-parameter operation.
    pub fn bind0<R, F>(&mut self, name: &'static str, f: F)
    where
        R: Any + Send,
        F: Fn() -> R + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |_args| Ok(Box::new(f()) as Box<dyn Any + Send>));
        self.first_wins(MethodKey::of0(name), call);
    }

    /// Binds a one-parameter operation.
    pub fn bind1<A, R, F>(&mut self, name: &'static str, f: F)
    where
        A: Any + Send,
        R: Any + Send,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |args: Args| {
            let mut it = args.into_iter();
            let a = downcast_arg::<A>(it.next(), name, 0)?;
            Ok(Box::new(f(a)) as Box<dyn Any + Send>)
        });
        self.first_wins(MethodKey::of1::<A>(name), call);
    }

    /// Binds a two-parameter operation.
    pub fn bind2<A, B, R, F>(&mut self, name: &'static str, f: F)
    where
        A: Any + Send,
        B: Any + Send,
        R: Any + Send,
        F: Fn(A, B) -> R + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |args: Args| {
            let mut it = args.into_iter();
            let a = downcast_arg::<A>(it.next(), name, 0)?;
            let b = downcast_arg::<B>(it.next(), name, 1)?;
            Ok(Box::new(f(a, b)) as Box<dyn Any + Send>)
        });
        self.first_wins(MethodKey::of2::<A, B>(name), call);
    }

    /// Binds a three-parameter operation.
    pub fn bind3<A, B, C, R, F>(&mut self, name: &'static str, f: F)
    where
        A: Any + Send,
        B: Any + Send,
        C: Any + Send,
        R: Any + Send,
        F: Fn(A, B, C) -> R + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |args: Args| {
            let mut it = args.into_iter();
            let a = downcast_arg::<A>(it.next(), name, 0)?;
            let b = downcast_arg::<B>(it.next(), name, 1)?;
            let c = downcast_arg::<C>(it.next(), name, 2)?;
            Ok(Box::new(f(a, b, c)) as Box<dyn Any + Send>)
        });
        self.first_wins(MethodKey::of3::<A, B, C>(name), call);
    }

    /// Binds a zero-parameter operation whose target can fail.
    ///
    /// The target's error is propagated to callers unchanged, wrapped only
    /// in the transparent [`ProxyError::Invocation`] variant.
    pub fn bind0_fallible<R, F>(&mut self, name: &'static str, f: F)
    where
        R: Any + Send,
        F: Fn() -> Result<R, BoxError> + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |_args| {
            let out = f().map_err(ProxyError::Invocation)?;
            Ok(Box::new(out) as Box<dyn Any + Send>)
        });
        self.first_wins(MethodKey::of0(name), call);
    }

    /// Binds a one-parameter operation whose target can fail.
    pub fn bind1_fallible<A, R, F>(&mut self, name: &'static str, f: F)
    where
        A: Any + Send,
        R: Any + Send,
        F: Fn(A) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |args: Args| {
            let mut it = args.into_iter();
            let a = downcast_arg::<A>(it.next(), name, 0)?;
            let out = f(a).map_err(ProxyError::Invocation)?;
            Ok(Box::new(out) as Box<dyn Any + Send>)
        });
        self.first_wins(MethodKey::of1::<A>(name), call);
    }

    /// Binds a two-parameter operation whose target can fail.
    pub fn bind2_fallible<A, B, R, F>(&mut self, name: &'static str, f: F)
    where
        A: Any + Send,
        B: Any + Send,
        R: Any + Send,
        F: Fn(A, B) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |args: Args| {
            let mut it = args.into_iter();
            let a = downcast_arg::<A>(it.next(), name, 0)?;
            let b = downcast_arg::<B>(it.next(), name, 1)?;
            let out = f(a, b).map_err(ProxyError::Invocation)?;
            Ok(Box::new(out) as Box<dyn Any + Send>)
        });
        self.first_wins(MethodKey::of2::<A, B>(name), call);
    }

    /// Binds a three-parameter operation whose target can fail.
    pub fn bind3_fallible<A, B, C, R, F>(&mut self, name: &'static str, f: F)
    where
        A: Any + Send,
        B: Any + Send,
        C: Any + Send,
        R: Any + Send,
        F: Fn(A, B, C) -> Result<R, BoxError> + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |args: Args| {
            let mut it = args.into_iter();
            let a = downcast_arg::<A>(it.next(), name, 0)?;
            let b = downcast_arg::<B>(it.next(), name, 1)?;
            let c = downcast_arg::<C>(it.next(), name, 2)?;
            let out = f(a, b, c).map_err(ProxyError::Invocation)?;
            Ok(Box::new(out) as Box<dyn Any + Send>)
        });
        self.first_wins(MethodKey::of3::<A, B, C>(name), call);
    }

    /// Overlay registration: unconditionally replaces any existing binding
    /// for a zero-parameter operation. Reserved for the proxy's
    /// introspection pass.
    pub(crate) fn overlay0<R, F>(&mut self, name: &'static str, origin: &'static str, f: F)
    where
        R: Any + Send,
        F: Fn() -> R + Send + Sync + 'static,
    {
        let call: ErasedCall = Box::new(move |_args| Ok(Box::new(f()) as Box<dyn Any + Send>));
        let binding = MethodBinding { origin, overlay: true, call };
        self.overwrite(MethodKey::of0(name), binding);
    }

    /// Registers only if no binding for `key` exists yet; the most-derived
    /// declaration wins, ancestor declarations never override it.
    fn first_wins(&mut self, key: MethodKey, call: ErasedCall) {
        if self.table.contains(&key) {
            return;
        }
        let binding = MethodBinding { origin: self.origin, overlay: false, call };
        self.push(key, binding);
    }

    fn overwrite(&mut self, key: MethodKey, binding: MethodBinding) {
        if let Some(pos) = self.table.small.iter().position(|(k, _)| k == &key) {
            self.table.small[pos] = (key, binding);
            return;
        }
        if self.table.large.contains_key(&key) {
            self.table.large.insert(key, binding);
            return;
        }
        self.push(key, binding);
    }

    fn push(&mut self, key: MethodKey, binding: MethodBinding) {
        if self.table.small.len() < self.table.small_threshold {
            self.table.small.push((key, binding));
        } else {
            self.table.large.insert(key, binding);
        }
    }

    /// Seals the table. Sorts the small storage for cache-friendly lookup.
    pub(crate) fn finish(mut self) -> DispatchTable {
        self.table.small.sort_by(|a, b| a.0.cmp(&b.0));
        self.table
    }
}

fn downcast_arg<T: Any>(
    slot: Option<Box<dyn Any + Send>>,
    method: &'static str,
    index: usize,
) -> ProxyResult<T> {
    slot.and_then(|boxed| boxed.downcast::<T>().ok())
        .map(|boxed| *boxed)
        .ok_or(ProxyError::ArgumentMismatch {
            method,
            index,
            expected: std::any::type_name::<T>(),
        })
}
