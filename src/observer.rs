//! Diagnostic observers for resolution traceability.
//!
//! This module provides hooks for observing preferred-or-fallback
//! resolution events. A preferred implementation being unavailable is a
//! recoverable condition that never surfaces to callers, so observers are
//! the only place it becomes visible.

use std::sync::Arc;

use crate::resolver::Provenance;

/// Observer trait for proxy resolution events.
///
/// Observer calls are made synchronously during construction. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use fallback_proxy::{Provenance, ProxyObserver};
///
/// struct TracingObserver {
///     trace_id: String,
/// }
///
/// impl ProxyObserver for TracingObserver {
///     fn resolving(&self, preferred: &str) {
///         println!("[{}] Resolving: {}", self.trace_id, preferred);
///     }
///
///     fn preferred_unavailable(&self, preferred: &str, reason: &str) {
///         println!("[{}] Unavailable: {} ({})", self.trace_id, preferred, reason);
///     }
///
///     fn resolved(&self, implementation: &str, provenance: Provenance) {
///         println!("[{}] Resolved: {} ({:?})", self.trace_id, implementation, provenance);
///     }
/// }
/// ```
pub trait ProxyObserver: Send + Sync {
    /// Called before the preferred implementation is looked up.
    fn resolving(&self, preferred: &str);

    /// Called when the preferred implementation cannot be constructed.
    ///
    /// This is the recoverable path: the fallback factory runs next and the
    /// condition is never surfaced to the caller.
    fn preferred_unavailable(&self, preferred: &str, reason: &str);

    /// Called once the backing instance is chosen.
    fn resolved(&self, implementation: &str, provenance: Provenance);
}

/// Observer that prints resolution events to stdout/stderr.
///
/// The fallback path goes to stderr since it usually means a platform
/// facility is missing.
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[fallback-proxy]".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyObserver for LoggingObserver {
    fn resolving(&self, preferred: &str) {
        println!("{} Resolving preferred implementation: {}", self.prefix, preferred);
    }

    fn preferred_unavailable(&self, preferred: &str, reason: &str) {
        eprintln!(
            "{} Implementation {} is not available, continuing with the default one: {}",
            self.prefix, preferred, reason
        );
    }

    fn resolved(&self, implementation: &str, provenance: Provenance) {
        println!(
            "{} Resolved: {} ({})",
            self.prefix,
            implementation,
            if provenance.is_preferred() { "preferred" } else { "fallback" }
        );
    }
}

/// Internal fan-out collection of attached observers.
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ProxyObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn push(&mut self, observer: Arc<dyn ProxyObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn resolving(&self, preferred: &str) {
        for obs in &self.observers {
            obs.resolving(preferred);
        }
    }

    pub(crate) fn preferred_unavailable(&self, preferred: &str, reason: &str) {
        for obs in &self.observers {
            obs.preferred_unavailable(preferred, reason);
        }
    }

    pub(crate) fn resolved(&self, implementation: &str, provenance: Provenance) {
        for obs in &self.observers {
            obs.resolved(implementation, provenance);
        }
    }
}
