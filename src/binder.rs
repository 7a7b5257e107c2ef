//! Binding pass: walks a backing instance's method contributions and
//! produces the dispatch table, introspection overlay included.

use std::sync::Arc;

use crate::resolver::{ImplementationHandle, Provenance};
use crate::table::{DispatchTable, DispatchTableBuilder};

/// Dispatched name of the implementation-kind query.
pub const OP_IMPLEMENTATION_NAME: &str = "implementation_name";
/// Dispatched name of the provenance query.
pub const OP_IS_PREFERRED: &str = "is_preferred";

/// Origin label recorded on the overlay bindings.
const STATE_ORIGIN: &str = "proxy state";

/// Trait implemented by backing instances so the binder can collect their
/// callable surface.
///
/// `bind_methods` must register the type's own methods first and only then
/// delegate to any embedded base component's `bind_methods`. Registration
/// is first-wins, so this ordering is what makes the most-derived
/// declaration win: a method declared only on a base component is still
/// bound, while a base declaration never overrides one already captured
/// from the more derived type.
///
/// # Examples
///
/// ```rust
/// use fallback_proxy::{Bindable, DispatchTableBuilder};
/// use std::sync::Arc;
///
/// struct CourtesyBase;
///
/// impl Bindable for CourtesyBase {
///     fn implementation_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///
///     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
///         table.bind1("farewell", |name: String| format!("Goodbye, {}", name));
///     }
/// }
///
/// struct RealGreeter {
///     base: Arc<CourtesyBase>,
/// }
///
/// impl Bindable for RealGreeter {
///     fn implementation_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///
///     fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder) {
///         // Own methods first, base contributions last.
///         table.bind1("greet", |name: String| format!("Hello, {}", name));
///         Arc::clone(&self.base).bind_methods(table);
///     }
/// }
/// ```
pub trait Bindable: Send + Sync + 'static {
    /// Type name of the concrete implementation, reported through the
    /// proxy's introspection capability.
    fn implementation_name(&self) -> &'static str;

    /// Registers this instance's callable surface into the table under
    /// construction. Own methods first, then embedded base components.
    fn bind_methods(self: Arc<Self>, table: &mut DispatchTableBuilder);
}

/// Builds the complete dispatch table for a chosen backing instance.
///
/// First pass: the instance's contribution chain, first-wins. Second pass:
/// the two introspection operations, unconditionally overwriting — a
/// backing instance that declares a same-name zero-parameter method is
/// silently shadowed. The overlay answers are captured by value here, so
/// introspection is always answered by the proxy itself and never forwarded
/// to the backing instance.
pub(crate) fn bind_instance(handle: &ImplementationHandle) -> DispatchTable {
    let mut builder = DispatchTableBuilder::new(handle.instance.implementation_name());
    Arc::clone(&handle.instance).bind_methods(&mut builder);

    let implementation = handle.instance.implementation_name();
    let preferred = handle.provenance == Provenance::Preferred;
    builder.overlay0(OP_IMPLEMENTATION_NAME, STATE_ORIGIN, move || {
        implementation.to_string()
    });
    builder.overlay0(OP_IS_PREFERRED, STATE_ORIGIN, move || preferred);

    builder.finish()
}
