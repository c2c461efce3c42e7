//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_out_of_range_display() {
    let err = Error::OutOfRange { index: 12, bound: 8 };
    let display = format!("{}", err);
    assert!(display.contains("out of range"));
    assert!(display.contains("12"));
    assert!(display.contains("8"));
}

#[test]
fn test_overflow_display() {
    let err = Error::Overflow { required: 20, capacity: 16 };
    assert_eq!(format!("{}", err), "Buffer overflow: 20 required, 16 available");
}

#[test]
fn test_invalid_argument_display() {
    let err = Error::InvalidArgument("offset 4 + length 8 exceeds slice length 10".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid argument"));
    assert!(display.contains("exceeds slice length 10"));
}

#[test]
fn test_invalid_state_display() {
    let err = Error::InvalidState("mark is not set".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid state"));
    assert!(display.contains("mark is not set"));
}

#[test]
fn test_read_only_display() {
    assert_eq!(format!("{}", Error::ReadOnly), "Buffer is read-only");
}

#[test]
fn test_detached_display() {
    assert!(format!("{}", Error::Detached).contains("detached"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::ReadOnly;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug1 = format!("{:?}", Error::OutOfRange { index: 1, bound: 0 });
    assert!(debug1.contains("OutOfRange"));

    let debug2 = format!("{:?}", Error::Overflow { required: 1, capacity: 0 });
    assert!(debug2.contains("Overflow"));

    let debug3 = format!("{:?}", Error::InvalidArgument("arg".to_string()));
    assert!(debug3.contains("InvalidArgument"));

    let debug4 = format!("{:?}", Error::InvalidState("state".to_string()));
    assert!(debug4.contains("InvalidState"));
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::OutOfRange { index: 3, bound: 2 };
    let err2 = err1.clone();
    assert_eq!(err1, err2);

    let err3 = Error::InvalidArgument("a".to_string());
    assert_ne!(err3, Error::InvalidArgument("b".to_string()));
    assert_ne!(Error::ReadOnly, Error::Detached);
}

// ============================================================================
// RESULT / PROPAGATION TESTS
// ============================================================================

#[test]
fn test_result_type_err() {
    fn returns_error() -> Result<i32> {
        Err(Error::ReadOnly)
    }

    let result = returns_error();
    assert_eq!(result, Err(Error::ReadOnly));
}

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::Detached)
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    assert_eq!(outer(), Err(Error::Detached));
}

#[test]
fn test_bail_macro_returns_error() {
    fn bails() -> Result<()> {
        crate::buffer_bail!("galaxy3d::test", Error::InvalidState("nope".to_string()));
    }

    assert_eq!(bails(), Err(Error::InvalidState("nope".to_string())));
}

#[test]
fn test_err_macro_evaluates_to_error() {
    let value: Option<u8> = None;
    let result = value.ok_or_else(|| crate::buffer_err!("galaxy3d::test", Error::Detached));
    assert_eq!(result, Err(Error::Detached));
}
