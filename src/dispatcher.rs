//! Invocation routing through the dispatch table.

use std::any::Any;

use crate::error::{ProxyError, ProxyResult};
use crate::key::MethodKey;
use crate::table::{Args, DispatchTable};

/// Routes one invocation: computes the probe key from the invoked name and
/// the runtime types of the supplied arguments, looks up the table, and
/// hands the arguments to the bound target.
///
/// A lookup miss means the exposed surface and the bound surface have
/// diverged — an integrity failure, reported as
/// [`ProxyError::UnboundMethod`] rather than something callers routinely
/// handle. A bound target's own failure passes through unchanged.
pub(crate) fn dispatch(
    table: &DispatchTable,
    name: &'static str,
    args: Args,
) -> ProxyResult<Box<dyn Any + Send>> {
    let probe = MethodKey::probe(name, &args);
    match table.get(&probe) {
        Some(binding) => binding.invoke(args),
        None => Err(ProxyError::UnboundMethod(probe.to_string())),
    }
}
