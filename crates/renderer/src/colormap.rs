//! Colormap engine: maps a scalar value to a color by piecewise-linear
//! interpolation between sorted color stops.

use grain_common::{GrainError, GrainResult};
use serde::{Deserialize, Serialize};

/// Guard against division by zero in normalization and interpolation.
pub const EPSILON: f64 = 1e-12;

/// Name of the preset used when nothing is configured.
pub const DEFAULT_COLORMAP: &str = "viridis";

/// RGB color with channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Linear interpolation, exact at both ends (`u == 0` gives `self`,
    /// `u == 1` gives `other`).
    pub fn lerp(&self, other: &Rgb, u: f64) -> Rgb {
        Rgb {
            r: (1.0 - u) * self.r + u * other.r,
            g: (1.0 - u) * self.g + u * other.g,
            b: (1.0 - u) * self.b + u * other.b,
        }
    }

    /// Quantize to opaque 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }
}

/// A control point of a colormap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub fn new(position: f64, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// An ordered table of color stops.
///
/// Stops are sorted by position at construction and never change afterwards,
/// so a `Colormap` can be cloned freely into independent render jobs.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<ColorStop>,
}

type StopTable = &'static [(f64, [f64; 3])];

// Sampled from the matplotlib tables.
const VIRIDIS: StopTable = &[
    (0.00, [0.267004, 0.004874, 0.329415]),
    (0.25, [0.229739, 0.322361, 0.545706]),
    (0.50, [0.127568, 0.566949, 0.550556]),
    (0.75, [0.369214, 0.788888, 0.382914]),
    (1.00, [0.993248, 0.906157, 0.143936]),
];

const INFERNO: StopTable = &[
    (0.00, [0.001462, 0.000466, 0.013866]),
    (0.25, [0.341500, 0.062325, 0.429425]),
    (0.50, [0.735683, 0.215906, 0.330245]),
    (0.75, [0.978422, 0.557937, 0.034931]),
    (1.00, [0.988362, 0.998364, 0.644924]),
];

const PLASMA: StopTable = &[
    (0.00, [0.050383, 0.029803, 0.527975]),
    (0.25, [0.494877, 0.011990, 0.657865]),
    (0.50, [0.798216, 0.280197, 0.469538]),
    (0.75, [0.973416, 0.585761, 0.251540]),
    (1.00, [0.940015, 0.975158, 0.131326]),
];

const MAGMA: StopTable = &[
    (0.00, [0.001462, 0.000466, 0.013866]),
    (0.25, [0.316654, 0.071690, 0.485380]),
    (0.50, [0.716387, 0.214982, 0.475290]),
    (0.75, [0.986700, 0.535582, 0.382210]),
    (1.00, [0.987053, 0.991438, 0.749504]),
];

const RDYLBU: StopTable = &[
    (0.0, [0.8, 0.0, 0.0]),
    (0.5, [1.0, 1.0, 0.8]),
    (1.0, [0.0, 0.2, 0.8]),
];

const JET: StopTable = &[
    (0.000, [0.0, 0.0, 0.5]),
    (0.125, [0.0, 0.0, 1.0]),
    (0.375, [0.0, 1.0, 1.0]),
    (0.625, [1.0, 1.0, 0.0]),
    (0.875, [1.0, 0.0, 0.0]),
    (1.000, [0.5, 0.0, 0.0]),
];

const GRAY: StopTable = &[(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])];

// ColorBrewer OrRd, 5 classes.
const ORRD: StopTable = &[
    (0.00, [0.996, 0.941, 0.851]),
    (0.25, [0.992, 0.800, 0.541]),
    (0.50, [0.988, 0.553, 0.349]),
    (0.75, [0.890, 0.290, 0.200]),
    (1.00, [0.702, 0.000, 0.000]),
];

const PRESETS: &[(&str, StopTable)] = &[
    ("viridis", VIRIDIS),
    ("inferno", INFERNO),
    ("plasma", PLASMA),
    ("magma", MAGMA),
    ("rdylbu", RDYLBU),
    ("jet", JET),
    ("gray", GRAY),
    ("grayscale", GRAY),
    ("orrd", ORRD),
];

impl Colormap {
    /// Build a colormap from arbitrary stops.
    ///
    /// Stops are sorted ascending by position. At least one stop is required
    /// and every position must be finite and within [0, 1].
    pub fn new(name: impl Into<String>, mut stops: Vec<ColorStop>) -> GrainResult<Self> {
        let name = name.into();
        if stops.is_empty() {
            return Err(GrainError::InvalidColormap(format!(
                "colormap '{}' has no stops",
                name
            )));
        }
        if let Some(bad) = stops
            .iter()
            .find(|s| !s.position.is_finite() || !(0.0..=1.0).contains(&s.position))
        {
            return Err(GrainError::InvalidColormap(format!(
                "colormap '{}' has stop position {} outside [0, 1]",
                name, bad.position
            )));
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { name, stops })
    }

    /// Look up a named preset (case-insensitive).
    pub fn from_preset(name: &str) -> GrainResult<Self> {
        let key = name.trim().to_ascii_lowercase();
        let table = PRESETS
            .iter()
            .find(|(preset, _)| *preset == key)
            .map(|(_, table)| *table)
            .ok_or_else(|| {
                GrainError::UnknownColormap(format!(
                    "'{}' (available: {})",
                    name,
                    Self::preset_names().join(", ")
                ))
            })?;

        let stops = table
            .iter()
            .map(|&(position, [r, g, b])| ColorStop::new(position, Rgb::new(r, g, b)))
            .collect();
        Self::new(key, stops)
    }

    /// Names accepted by [`Colormap::from_preset`].
    pub fn preset_names() -> Vec<&'static str> {
        PRESETS.iter().map(|(name, _)| *name).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Map `value` into [0, 1] relative to `[vmin, vmax]`.
    ///
    /// Values outside the range clamp to the ends; NaN maps to 0.
    pub fn normalize(value: f64, vmin: f64, vmax: f64) -> f64 {
        let range = vmax - vmin;
        let denom = if range.abs() < EPSILON { EPSILON } else { range };
        let t = (value - vmin) / denom;
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0)
        }
    }

    /// Color for `value` within `[vmin, vmax]`.
    pub fn evaluate(&self, value: f64, vmin: f64, vmax: f64) -> Rgb {
        self.sample(Self::normalize(value, vmin, vmax))
    }

    /// Color at an already-normalized position.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let first = &self.stops[0];
        if t <= first.position {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if t <= hi.position {
                let span = hi.position - lo.position;
                if span < EPSILON || t >= hi.position {
                    return hi.color;
                }
                let u = (t - lo.position) / span;
                return lo.color.lerp(&hi.color, u);
            }
        }

        self.stops[self.stops.len() - 1].color
    }

    /// The same colors in the opposite direction.
    pub fn reversed(&self) -> Self {
        let stops = self
            .stops
            .iter()
            .rev()
            .map(|s| ColorStop::new(1.0 - s.position, s.color))
            .collect();
        Self {
            name: format!("{}_r", self.name),
            stops,
        }
    }

    pub fn first_color(&self) -> Rgb {
        self.stops[0].color
    }

    pub fn last_color(&self) -> Rgb {
        self.stops[self.stops.len() - 1].color
    }
}

impl Default for Colormap {
    fn default() -> Self {
        let stops = VIRIDIS
            .iter()
            .map(|&(position, [r, g, b])| ColorStop::new(position, Rgb::new(r, g, b)))
            .collect();
        Self {
            name: DEFAULT_COLORMAP.to_string(),
            stops,
        }
    }
}
