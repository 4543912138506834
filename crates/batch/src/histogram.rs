//! Spatial binning of grain scalars across a whole batch.
//!
//! Every job adds the centroids of its colored grains to one shared grid.
//! Additions take a single lock per call; averages are computed once all
//! jobs have been joined.

use std::fmt::Write as _;
use std::path::Path;

use grain_common::{Grain, GrainError, GrainResult, Window};
use parking_lot::Mutex;

/// Cell edge length in physical units.
pub const DEFAULT_CELL_SIZE: f64 = 1.0;
/// Upper bound on the number of grid cells.
pub const MAX_HISTOGRAM_CELLS: usize = 1 << 26;

struct Bins {
    sums: Vec<f64>,
    counts: Vec<u64>,
}

/// Thread-safe accumulator of `(x, y, value)` samples on a regular grid.
pub struct MagnitudeHistogram {
    window: Window,
    cell: f64,
    bins_x: usize,
    bins_y: usize,
    bins: Mutex<Bins>,
}

impl MagnitudeHistogram {
    pub fn new(window: Window, cell: f64) -> GrainResult<Self> {
        let window = window.normalized();
        window.validate()?;
        if !(cell.is_finite() && cell > 0.0) {
            return Err(GrainError::InvalidConfig(format!(
                "histogram cell size must be positive, got {}",
                cell
            )));
        }

        let cols = (window.width() / cell).ceil().max(1.0);
        let rows = (window.height() / cell).ceil().max(1.0);
        if !(cols * rows <= MAX_HISTOGRAM_CELLS as f64) {
            return Err(GrainError::InvalidConfig(format!(
                "histogram cell size {} gives a {}x{} grid, over the {} cell limit",
                cell, cols, rows, MAX_HISTOGRAM_CELLS
            )));
        }
        let bins_x = cols as usize;
        let bins_y = rows as usize;
        let n = bins_x * bins_y;

        Ok(Self {
            window,
            cell,
            bins_x,
            bins_y,
            bins: Mutex::new(Bins {
                sums: vec![0.0; n],
                counts: vec![0; n],
            }),
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.bins_x, self.bins_y)
    }

    fn cell_index(&self, x: f64, y: f64) -> Option<usize> {
        if !self.window.contains_point(x, y) {
            return None;
        }
        let col = ((x - self.window.xmin) / self.cell) as usize;
        let row = ((y - self.window.ymin) / self.cell) as usize;
        Some(row.min(self.bins_y - 1) * self.bins_x + col.min(self.bins_x - 1))
    }

    /// Add samples. Points outside the window are ignored.
    pub fn add_points(&self, points: &[(f64, f64, f64)]) {
        let mut bins = self.bins.lock();
        for &(x, y, value) in points {
            if let Some(idx) = self.cell_index(x, y) {
                bins.sums[idx] += value;
                bins.counts[idx] += 1;
            }
        }
    }

    /// Add the centroid and scalar of every colored grain.
    pub fn add_grains(&self, grains: &[Grain]) {
        let points: Vec<(f64, f64, f64)> = grains
            .iter()
            .filter(|g| g.is_colored())
            .filter_map(|g| g.centroid().map(|(x, y)| (x, y, g.scalar())))
            .collect();
        self.add_points(&points);
    }

    /// Per-cell averages; NaN where no sample landed.
    pub fn finalize(&self) -> HistogramGrid {
        let bins = self.bins.lock();
        let averages = bins
            .sums
            .iter()
            .zip(&bins.counts)
            .map(|(&sum, &count)| {
                if count > 0 {
                    sum / count as f64
                } else {
                    f64::NAN
                }
            })
            .collect();

        HistogramGrid {
            xmin: self.window.xmin,
            ymin: self.window.ymin,
            cell: self.cell,
            bins_x: self.bins_x,
            bins_y: self.bins_y,
            averages,
            counts: bins.counts.clone(),
        }
    }
}

/// Averaged grid, row-major from the bottom row.
#[derive(Debug, Clone)]
pub struct HistogramGrid {
    pub xmin: f64,
    pub ymin: f64,
    pub cell: f64,
    pub bins_x: usize,
    pub bins_y: usize,
    pub averages: Vec<f64>,
    pub counts: Vec<u64>,
}

impl HistogramGrid {
    /// Average of the cell at `(col, row)`; NaN when out of range or empty.
    pub fn average(&self, col: usize, row: usize) -> f64 {
        if col >= self.bins_x || row >= self.bins_y {
            return f64::NAN;
        }
        self.averages[row * self.bins_x + col]
    }

    pub fn count(&self, col: usize, row: usize) -> u64 {
        if col >= self.bins_x || row >= self.bins_y {
            return 0;
        }
        self.counts[row * self.bins_x + col]
    }

    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.xmin + (col as f64 + 0.5) * self.cell,
            self.ymin + (row as f64 + 0.5) * self.cell,
        )
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from("x_center,y_center,magnitude_average,count\n");
        for row in 0..self.bins_y {
            for col in 0..self.bins_x {
                let (x, y) = self.cell_center(col, row);
                let _ = writeln!(
                    out,
                    "{:.6},{:.6},{:.6},{}",
                    x,
                    y,
                    self.average(col, row),
                    self.count(col, row)
                );
            }
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> GrainResult<()> {
        std::fs::write(path, self.to_csv()).map_err(|e| GrainError::io(path, e))
    }
}
