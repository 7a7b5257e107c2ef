/// Unit tests for ProxyError display formats and source chaining.

use fallback_proxy::{BoxError, ProxyError};
use std::error::Error;
use std::fmt;

#[derive(Debug)]
struct DomainError;

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain says no")
    }
}

impl Error for DomainError {}

#[test]
fn test_precondition_display() {
    let err = ProxyError::Precondition("preferred implementation name can't be empty".to_string());
    assert_eq!(
        err.to_string(),
        "Precondition failed: preferred implementation name can't be empty"
    );
    assert!(err.source().is_none());
}

#[test]
fn test_incomplete_binding_display() {
    let err = ProxyError::IncompleteBinding {
        contract: "Greeter",
        missing: "greet(alloc::string::String)".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Contract Greeter is not fully bound: missing greet(alloc::string::String)"
    );
    assert!(err.source().is_none());
}

#[test]
fn test_unbound_method_display() {
    let err = ProxyError::UnboundMethod("greet(_)".to_string());
    assert_eq!(err.to_string(), "No binding for method greet(_)");
}

#[test]
fn test_argument_mismatch_display() {
    let err = ProxyError::ArgumentMismatch {
        method: "greet",
        index: 0,
        expected: "alloc::string::String",
    };
    assert_eq!(
        err.to_string(),
        "Argument 0 of greet is not a alloc::string::String"
    );
}

#[test]
fn test_type_mismatch_display() {
    let err = ProxyError::TypeMismatch("u32");
    assert_eq!(err.to_string(), "Type mismatch for: u32");
}

#[test]
fn test_invocation_is_transparent() {
    let source: BoxError = Box::new(DomainError);
    let err = ProxyError::Invocation(source);

    // Display shows the source unchanged, no proxy-layer wrapping text.
    assert_eq!(err.to_string(), "domain says no");

    // And the original error stays reachable for downcasting.
    let source = err.source().unwrap();
    assert!(source.downcast_ref::<DomainError>().is_some());
}
