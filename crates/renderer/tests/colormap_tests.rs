//! Tests for colormap evaluation, presets and reversal.

use grain_common::GrainError;
use renderer::colormap::{ColorStop, Colormap, Rgb};

// ============================================================================
// Endpoints and clamping
// ============================================================================

#[test]
fn test_range_endpoints_hit_first_and_last_stop_exactly() {
    for name in Colormap::preset_names() {
        let cmap = Colormap::from_preset(name).unwrap();
        assert_eq!(cmap.evaluate(-3.0, -3.0, 7.5), cmap.first_color(), "{}", name);
        assert_eq!(cmap.evaluate(7.5, -3.0, 7.5), cmap.last_color(), "{}", name);
    }
}

#[test]
fn test_out_of_range_values_clamp() {
    let cmap = Colormap::from_preset("inferno").unwrap();
    assert_eq!(cmap.evaluate(1e9, 0.0, 1.0), cmap.last_color());
    assert_eq!(cmap.evaluate(-1e9, 0.0, 1.0), cmap.first_color());
}

#[test]
fn test_nan_maps_to_first_color() {
    let cmap = Colormap::default();
    assert_eq!(cmap.evaluate(f64::NAN, 0.0, 1.0), cmap.first_color());
}

#[test]
fn test_degenerate_range_does_not_divide_by_zero() {
    let cmap = Colormap::from_preset("gray").unwrap();
    assert_eq!(cmap.evaluate(5.0, 5.0, 5.0), Rgb::BLACK);
    assert_eq!(cmap.evaluate(6.0, 5.0, 5.0), Rgb::WHITE);
    assert_eq!(Colormap::normalize(5.0, 5.0, 5.0), 0.0);
}

// ============================================================================
// Interpolation
// ============================================================================

#[test]
fn test_linear_interpolation_between_stops() {
    let cmap = Colormap::from_preset("gray").unwrap();
    assert_eq!(cmap.evaluate(0.5, 0.0, 1.0), Rgb::new(0.5, 0.5, 0.5));
    assert_eq!(cmap.evaluate(25.0, 0.0, 100.0), Rgb::new(0.25, 0.25, 0.25));
}

#[test]
fn test_rdylbu_midpoint_is_middle_stop() {
    let cmap = Colormap::from_preset("RdYlBu").unwrap();
    assert_eq!(cmap.evaluate(0.0, -1.0, 1.0), Rgb::new(1.0, 1.0, 0.8));
}

#[test]
fn test_gray_is_monotonic() {
    let cmap = Colormap::from_preset("grayscale").unwrap();
    let mut previous = -1.0;
    for i in 0..=100 {
        let c = cmap.evaluate(i as f64, 0.0, 100.0);
        assert!(c.r >= previous);
        previous = c.r;
    }
}

#[test]
fn test_single_stop_colormap_is_constant() {
    let red = Rgb::new(1.0, 0.0, 0.0);
    let cmap = Colormap::new("solid", vec![ColorStop::new(0.5, red)]).unwrap();
    assert_eq!(cmap.sample(0.0), red);
    assert_eq!(cmap.sample(0.7), red);
    assert_eq!(cmap.sample(1.0), red);
}

// ============================================================================
// Presets
// ============================================================================

#[test]
fn test_preset_lookup_is_case_insensitive() {
    let upper = Colormap::from_preset("VIRIDIS").unwrap();
    assert_eq!(upper.name(), "viridis");
    assert_eq!(upper, Colormap::from_preset("viridis").unwrap());
}

#[test]
fn test_unknown_preset_is_an_error() {
    let err = Colormap::from_preset("rainbow-unicorn").unwrap_err();
    assert!(matches!(err, GrainError::UnknownColormap(_)));
    assert!(err.to_string().contains("viridis"));
}

#[test]
fn test_required_presets_exist() {
    for name in ["viridis", "inferno", "rdylbu", "plasma", "magma", "jet", "gray", "orrd"] {
        assert!(Colormap::from_preset(name).is_ok(), "missing preset {}", name);
    }
}

// ============================================================================
// Construction and reversal
// ============================================================================

#[test]
fn test_empty_stop_list_is_rejected() {
    let err = Colormap::new("empty", vec![]).unwrap_err();
    assert!(matches!(err, GrainError::InvalidColormap(_)));
}

#[test]
fn test_stop_outside_unit_interval_is_rejected() {
    let err = Colormap::new("bad", vec![ColorStop::new(1.5, Rgb::WHITE)]).unwrap_err();
    assert!(matches!(err, GrainError::InvalidColormap(_)));
}

#[test]
fn test_reversed_swaps_ends() {
    let cmap = Colormap::from_preset("viridis").unwrap();
    let rev = cmap.reversed();
    assert_eq!(rev.name(), "viridis_r");
    assert_eq!(rev.evaluate(0.0, 0.0, 1.0), cmap.last_color());
    assert_eq!(rev.evaluate(1.0, 0.0, 1.0), cmap.first_color());
    assert_eq!(rev.reversed().stops(), cmap.stops());
}
