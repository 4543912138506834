//! Geometric grain model.
//!
//! A [`Grain`] is one simulated particle or wall entity: a circle, a filled
//! polygon, or an outline-only border polygon, tagged with the scalar value
//! that drives its color. Grains are immutable once built.
//!
//! Rendering a grain does not touch any raster. [`Grain::render`] maps the
//! geometry through a caller-supplied coordinate transform and returns a
//! [`DrawCommand`] in screen space, which the scene renderer rasterizes.

use crate::window::Window;

/// Scalar carried by border entities, marking them as non-colored.
pub const BORDER_SCALAR: f64 = -1.0;

/// Stroke width in pixels for border outlines.
pub const BORDER_LINE_WIDTH: f64 = 2.0;

/// Shape family of a grain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrainKind {
    Circle,
    Polygon,
    Border,
}

impl GrainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrainKind::Circle => "circle",
            GrainKind::Polygon => "polygon",
            GrainKind::Border => "border",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Circle { x: f64, y: f64, r: f64 },
    Polygon(Vec<(f64, f64)>),
    Border(Vec<(f64, f64)>),
}

/// Vector drawing command in screen coordinates (pixels, y down).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled disc.
    FillCircle { cx: f64, cy: f64, radius: f64 },
    /// Filled closed path through the points, in order.
    FillPolygon { points: Vec<(f64, f64)> },
    /// Stroked closed path through the points, no fill.
    StrokePolygon { points: Vec<(f64, f64)>, width: f64 },
}

/// One particle or wall entity of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Grain {
    id: i64,
    material: i32,
    scalar: f64,
    shape: Shape,
}

impl Grain {
    /// A circular grain.
    pub fn circle(id: i64, material: i32, x: f64, y: f64, r: f64, scalar: f64) -> Self {
        Self {
            id,
            material,
            scalar,
            shape: Shape::Circle { x, y, r },
        }
    }

    /// A filled polygonal grain. Vertex order is kept as given.
    pub fn polygon(id: i64, material: i32, vertices: Vec<(f64, f64)>, scalar: f64) -> Self {
        Self {
            id,
            material,
            scalar,
            shape: Shape::Polygon(vertices),
        }
    }

    /// An outline-only wall polygon. Carries [`BORDER_SCALAR`].
    pub fn border(id: i64, material: i32, vertices: Vec<(f64, f64)>) -> Self {
        Self {
            id,
            material,
            scalar: BORDER_SCALAR,
            shape: Shape::Border(vertices),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn material(&self) -> i32 {
        self.material
    }

    pub fn scalar(&self) -> f64 {
        self.scalar
    }

    pub fn kind(&self) -> GrainKind {
        match self.shape {
            Shape::Circle { .. } => GrainKind::Circle,
            Shape::Polygon(_) => GrainKind::Polygon,
            Shape::Border(_) => GrainKind::Border,
        }
    }

    /// 1 for circles, the number of vertices otherwise.
    pub fn vertex_count(&self) -> usize {
        match &self.shape {
            Shape::Circle { .. } => 1,
            Shape::Polygon(v) | Shape::Border(v) => v.len(),
        }
    }

    /// Vertices of a polygon or border; empty for circles.
    pub fn vertices(&self) -> &[(f64, f64)] {
        match &self.shape {
            Shape::Circle { .. } => &[],
            Shape::Polygon(v) | Shape::Border(v) => v,
        }
    }

    /// Whether this grain takes its color from the colormap.
    pub fn is_colored(&self) -> bool {
        !matches!(self.shape, Shape::Border(_))
    }

    /// Axis-aligned bounding box in physical coordinates.
    ///
    /// A polygon without vertices yields an empty window.
    pub fn bounds(&self) -> Window {
        match &self.shape {
            Shape::Circle { x, y, r } => Window::new(x - r, x + r, y - r, y + r),
            Shape::Polygon(v) | Shape::Border(v) => {
                let mut w = Window::empty();
                for &(x, y) in v {
                    w.include_point(x, y);
                }
                w
            }
        }
    }

    /// Circle center or vertex mean. None for an empty polygon.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        match &self.shape {
            Shape::Circle { x, y, .. } => Some((*x, *y)),
            Shape::Polygon(v) | Shape::Border(v) => {
                if v.is_empty() {
                    return None;
                }
                let n = v.len() as f64;
                let (sx, sy) = v
                    .iter()
                    .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
                Some((sx / n, sy / n))
            }
        }
    }

    /// Map this grain to screen space.
    ///
    /// `to_screen` converts physical to pixel coordinates; `scale` is the
    /// uniform pixels-per-unit factor used for the circle radius.
    /// Returns None for a polygon or border without vertices.
    pub fn render<F>(&self, to_screen: F, scale: f64) -> Option<DrawCommand>
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        match &self.shape {
            Shape::Circle { x, y, r } => {
                let (cx, cy) = to_screen(*x, *y);
                Some(DrawCommand::FillCircle {
                    cx,
                    cy,
                    radius: r * scale,
                })
            }
            Shape::Polygon(v) => {
                if v.is_empty() {
                    return None;
                }
                let points = v.iter().map(|&(x, y)| to_screen(x, y)).collect();
                Some(DrawCommand::FillPolygon { points })
            }
            Shape::Border(v) => {
                if v.is_empty() {
                    return None;
                }
                let points = v.iter().map(|&(x, y)| to_screen(x, y)).collect();
                Some(DrawCommand::StrokePolygon {
                    points,
                    width: BORDER_LINE_WIDTH,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_bounds() {
        let g = Grain::circle(3, 0, 1.0, 2.0, 0.5, 7.0);
        assert_eq!(g.bounds(), Window::new(0.5, 1.5, 1.5, 2.5));
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.kind(), GrainKind::Circle);
    }

    #[test]
    fn test_border_is_not_colored() {
        let g = Grain::border(-1, 0, vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(!g.is_colored());
        assert_eq!(g.scalar(), BORDER_SCALAR);
    }

    #[test]
    fn test_empty_polygon_renders_nothing() {
        let g = Grain::polygon(4, 0, Vec::new(), 1.0);
        assert!(g.render(|x, y| (x, y), 1.0).is_none());
        assert!(g.bounds().is_empty());
        assert!(g.centroid().is_none());
    }
}
