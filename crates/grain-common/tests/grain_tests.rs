//! Tests for the grain model: accessors, bounds and draw commands.

use grain_common::{DrawCommand, Grain, GrainKind, BORDER_LINE_WIDTH};

fn square() -> Vec<(f64, f64)> {
    vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]
}

// ============================================================================
// accessor tests
// ============================================================================

#[test]
fn test_polygon_accessors() {
    let g = Grain::polygon(12, 3, square(), 0.25);
    assert_eq!(g.id(), 12);
    assert_eq!(g.material(), 3);
    assert_eq!(g.kind(), GrainKind::Polygon);
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.scalar(), 0.25);
    assert!(g.is_colored());
}

#[test]
fn test_polygon_bounds_and_centroid() {
    let g = Grain::polygon(1, 0, vec![(-1.0, 0.5), (3.0, -2.0), (1.0, 4.0)], 0.0);
    let b = g.bounds();
    assert_eq!((b.xmin, b.xmax, b.ymin, b.ymax), (-1.0, 3.0, -2.0, 4.0));
    let (cx, cy) = g.centroid().unwrap();
    assert!((cx - 1.0).abs() < 1e-12);
    assert!((cy - 2.5 / 3.0).abs() < 1e-12);
}

// ============================================================================
// render tests
// ============================================================================

#[test]
fn test_circle_render_uses_transform_and_scale() {
    let g = Grain::circle(1, 0, 0.0, 0.0, 1.0, 0.0);
    let to_screen = |x: f64, y: f64| (10.0 + x * 4.0, 100.0 - y * 4.0);
    match g.render(to_screen, 4.0) {
        Some(DrawCommand::FillCircle { cx, cy, radius }) => {
            assert_eq!((cx, cy), (10.0, 100.0));
            assert_eq!(radius, 4.0);
        }
        other => panic!("expected FillCircle, got {:?}", other),
    }
}

#[test]
fn test_polygon_render_keeps_vertex_order() {
    // Clockwise input stays clockwise.
    let verts = vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
    let g = Grain::polygon(2, 0, verts.clone(), 0.0);
    match g.render(|x, y| (x * 10.0, y * 10.0), 10.0) {
        Some(DrawCommand::FillPolygon { points }) => {
            let expected: Vec<(f64, f64)> =
                verts.iter().map(|&(x, y)| (x * 10.0, y * 10.0)).collect();
            assert_eq!(points, expected);
        }
        other => panic!("expected FillPolygon, got {:?}", other),
    }
}

#[test]
fn test_border_render_is_stroke_only() {
    let g = Grain::border(-3, 0, square());
    match g.render(|x, y| (x, y), 1.0) {
        Some(DrawCommand::StrokePolygon { points, width }) => {
            assert_eq!(points.len(), 4);
            assert_eq!(width, BORDER_LINE_WIDTH);
        }
        other => panic!("expected StrokePolygon, got {:?}", other),
    }
}

#[test]
fn test_empty_border_renders_nothing() {
    let g = Grain::border(-1, 0, Vec::new());
    assert!(g.render(|x, y| (x, y), 1.0).is_none());
    assert_eq!(g.vertex_count(), 0);
}
