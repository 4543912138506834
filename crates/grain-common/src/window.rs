//! Physical-space window types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{GrainError, GrainResult};

/// An axis-aligned rectangle in physical (simulation) coordinates.
///
/// Used both as the visible window of a render and as the bounding box of a
/// single grain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Window {
    /// Create a new window from its extents.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// An empty window that any `include_*` call will replace.
    pub fn empty() -> Self {
        Self {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    /// Parse a command-line window string: "xmin,xmax,ymin,ymax"
    pub fn from_cli_string(s: &str) -> Result<Self, WindowParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(WindowParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| WindowParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    /// Return a copy with each axis ordered low to high.
    pub fn normalized(&self) -> Self {
        Self {
            xmin: self.xmin.min(self.xmax),
            xmax: self.xmin.max(self.xmax),
            ymin: self.ymin.min(self.ymax),
            ymax: self.ymin.max(self.ymax),
        }
    }

    /// Reject windows that would produce an infinite or undefined scale.
    pub fn validate(&self) -> GrainResult<()> {
        let finite = [self.xmin, self.xmax, self.ymin, self.ymax]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(GrainError::DegenerateWindow(format!(
                "non-finite bounds {:?}",
                self
            )));
        }
        if self.xmax == self.xmin {
            return Err(GrainError::DegenerateWindow(format!(
                "zero width (xmin == xmax == {})",
                self.xmin
            )));
        }
        if self.ymax == self.ymin {
            return Err(GrainError::DegenerateWindow(format!(
                "zero height (ymin == ymax == {})",
                self.ymin
            )));
        }
        Ok(())
    }

    /// Width of the window in physical units.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the window in physical units.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// True until at least one point has been included.
    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Grow the window to contain a point.
    pub fn include_point(&mut self, x: f64, y: f64) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    /// Smallest window containing both windows.
    pub fn union(&self, other: &Window) -> Window {
        Window {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
        }
    }

    /// Check if a point is contained within this window (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WindowParseError {
    #[error("Invalid window format: {0}. Expected 'xmin,xmax,ymin,ymax'")]
    InvalidFormat(String),

    #[error("Invalid number in window: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_window() {
        let w = Window::from_cli_string("-1.5, 40, 0,25").unwrap();
        assert_eq!(w.xmin, -1.5);
        assert_eq!(w.xmax, 40.0);
        assert_eq!(w.ymin, 0.0);
        assert_eq!(w.ymax, 25.0);
    }

    #[test]
    fn test_normalized_swaps_reversed_axes() {
        let w = Window::new(10.0, 0.0, 5.0, -5.0).normalized();
        assert_eq!(w, Window::new(0.0, 10.0, -5.0, 5.0));
    }
}
