//! Snapshot file fixtures.
//!
//! Geometry lines are `id n ...`: `n == 1` is a circle `id 1 x y r type`,
//! a negative id is a border outline, anything else a polygon
//! `id n x1 y1 ... xn yn type`. Scalar lines are `id v1 v2 ...`.

/// Two circles, one triangle and a square border.
pub const SMALL_GEOMETRY: &str = "\
# id n x y r type
1 1 0.0 0.0 1.0 0
2 1 3.0 0.0 0.5 1
3 3 5.0 -1.0 7.0 -1.0 6.0 1.0 2
-1 4 -2.0 -2.0 8.0 -2.0 8.0 2.0 -2.0 2.0 wall
";

/// Stress tensors (σxx, σyy, σxy) for [`SMALL_GEOMETRY`].
/// Pressures: grain 1 → 2.0, grain 2 → 4.0, grain 3 → 6.0.
pub const SMALL_SCALARS: &str = "\
1 -2.0 -2.0 0.0
2 -4.0 -4.0 0.1
3 -6.0 -6.0 0.2
";

/// A single circle, whose value range has to be widened.
pub const SINGLE_GRAIN_GEOMETRY: &str = "1 1 0 0 1 0\n";
pub const SINGLE_GRAIN_SCALARS: &str = "1 -3.0 -3.0 0.0\n";

/// Only a border: nothing to color.
pub const BORDER_ONLY_GEOMETRY: &str = "-1 3 0 0 1 0 0 1\n";

/// Line 2 carries a non-numeric radius.
pub const MALFORMED_GEOMETRY: &str = "\
1 1 0.0 0.0 1.0 0
2 1 3.0 0.0 abc 1
";

/// Velocity records `vx vy m ... v5` for the kinetic and speed properties.
pub const VELOCITY_SCALARS: &str = "\
1 3.0 4.0 2.0 0.0 10.0
2 0.0 0.0 1.0 6.0 8.0
3 1.0 0.0 1.0
";

/// Common physical windows.
pub mod windows {
    /// (xmin, xmax, ymin, ymax) covering [`super::SMALL_GEOMETRY`].
    pub const SMALL: (f64, f64, f64, f64) = (-2.0, 8.0, -2.0, 2.0);

    /// Unit square.
    pub const UNIT: (f64, f64, f64, f64) = (0.0, 1.0, 0.0, 1.0);

    /// Zero width.
    pub const DEGENERATE: (f64, f64, f64, f64) = (1.0, 1.0, 0.0, 1.0);

    /// Axes given high to low.
    pub const REVERSED: (f64, f64, f64, f64) = (1.0, 0.0, 1.0, 0.0);
}

/// Common canvas sizes (width, height).
pub mod canvas {
    pub const SMALL: (u32, u32) = (200, 150);
    pub const DEFAULT: (u32, u32) = (1200, 900);
    pub const SQUARE: (u32, u32) = (100, 100);
}
