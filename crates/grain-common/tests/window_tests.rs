//! Tests for physical window parsing, normalization and validation.

use grain_common::{ErrorKind, GrainError, Window, WindowParseError};

// ============================================================================
// from_cli_string tests
// ============================================================================

#[test]
fn test_parse_window_integer() {
    let w = Window::from_cli_string("0,100,0,50").unwrap();
    assert_eq!(w, Window::new(0.0, 100.0, 0.0, 50.0));
}

#[test]
fn test_parse_window_scientific_notation() {
    let w = Window::from_cli_string("1e-3,2e-3,-1e2,1e2").unwrap();
    assert!((w.xmin - 1e-3).abs() < 1e-12);
    assert!((w.ymax - 100.0).abs() < 1e-12);
}

#[test]
fn test_parse_window_wrong_arity() {
    let result = Window::from_cli_string("0,1,2");
    assert!(matches!(result, Err(WindowParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_window_bad_number() {
    let result = Window::from_cli_string("0,1,abc,3");
    match result {
        Err(WindowParseError::InvalidNumber(s)) => assert_eq!(s, "abc"),
        other => panic!("expected InvalidNumber, got {:?}", other),
    }
}

// ============================================================================
// normalization and validation tests
// ============================================================================

#[test]
fn test_normalized_is_idempotent() {
    let w = Window::new(5.0, -5.0, 3.0, 1.0).normalized();
    assert_eq!(w, w.normalized());
    assert!(w.width() > 0.0);
    assert!(w.height() > 0.0);
}

#[test]
fn test_validate_accepts_regular_window() {
    assert!(Window::new(0.0, 1.0, 0.0, 1.0).validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_width() {
    let err = Window::new(2.0, 2.0, 0.0, 1.0).validate().unwrap_err();
    assert!(matches!(err, GrainError::DegenerateWindow(_)));
    assert_eq!(err.kind(), ErrorKind::InputValidation);
}

#[test]
fn test_validate_rejects_zero_height() {
    let err = Window::new(0.0, 1.0, 4.0, 4.0).validate().unwrap_err();
    assert!(matches!(err, GrainError::DegenerateWindow(_)));
}

#[test]
fn test_validate_rejects_non_finite() {
    assert!(Window::new(0.0, f64::INFINITY, 0.0, 1.0).validate().is_err());
    assert!(Window::new(f64::NAN, 1.0, 0.0, 1.0).validate().is_err());
}

#[test]
fn test_empty_window_is_invalid() {
    let w = Window::empty();
    assert!(w.is_empty());
    assert!(w.validate().is_err());
}

// ============================================================================
// growth tests
// ============================================================================

#[test]
fn test_include_point_and_union() {
    let mut a = Window::empty();
    a.include_point(1.0, 2.0);
    a.include_point(-1.0, 5.0);
    assert_eq!(a, Window::new(-1.0, 1.0, 2.0, 5.0));

    let b = Window::new(0.0, 3.0, -2.0, 0.0);
    assert_eq!(a.union(&b), Window::new(-1.0, 3.0, -2.0, 5.0));
    assert!(a.contains_point(0.0, 3.0));
    assert!(!a.contains_point(2.0, 3.0));
}
