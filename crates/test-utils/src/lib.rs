//! Shared test utilities for the grain-render workspace.
//!
//! - Snapshot text fixtures (`.xy` geometry, `.sxy` scalars)
//! - Generators for synthetic packings and scratch input directories
//! - Tolerance assertions for scalars and points
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Fails unless `actual` lies within `tol` of `expected`. NaN never passes.
#[macro_export]
macro_rules! assert_close {
    ($actual:expr, $expected:expr, $tol:expr) => {{
        let actual = $actual as f64;
        let expected = $expected as f64;
        let tol = $tol as f64;
        assert!(
            (actual - expected).abs() <= tol,
            "{} = {} is not within {} of {}",
            stringify!($actual),
            actual,
            tol,
            expected
        );
    }};
}

/// Both coordinates of an `(x, y)` pair within `tol` of the expected point.
#[macro_export]
macro_rules! assert_point_close {
    ($actual:expr, $expected:expr, $tol:expr) => {{
        let (ax, ay): (f64, f64) = $actual;
        let (ex, ey): (f64, f64) = $expected;
        let tol = $tol as f64;
        assert!(
            (ax - ex).abs() <= tol && (ay - ey).abs() <= tol,
            "point ({}, {}) is not within {} of ({}, {})",
            ax,
            ay,
            tol,
            ex,
            ey
        );
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_close_values_pass() {
        assert_close!(1.0001, 1.0, 0.001);
        assert_close!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "is not within")]
    fn test_distant_values_fail() {
        assert_close!(1.1, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "is not within")]
    fn test_nan_fails() {
        assert_close!(f64::NAN, 1.0, 0.001);
    }

    #[test]
    fn test_point_close() {
        assert_point_close!((1.0001, 2.0001), (1.0, 2.0), 0.001);
    }

    #[test]
    #[should_panic(expected = "point")]
    fn test_point_off_in_one_axis_fails() {
        assert_point_close!((1.0, 2.5), (1.0, 2.0), 0.001);
    }
}
