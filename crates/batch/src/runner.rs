//! Batch orchestration: validate, discover, submit, join, summarize.

use std::path::PathBuf;
use std::sync::Arc;

use grain_common::{GrainError, GrainResult};
use renderer::scene::{RenderSettings, WindowMode};
use snapshot::Property;
use tracing::{error, info, warn};

use crate::discovery::{discover, Discovered};
use crate::error::Result;
use crate::histogram::MagnitudeHistogram;
use crate::job::RenderJob;
use crate::pool::{default_pool_size, ThreadPool};

/// Where to write the binned averages and how coarse the grid is.
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    pub path: PathBuf,
    pub cell: f64,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub property: Property,
    pub settings: RenderSettings,
    /// Worker count; hardware parallelism when None.
    pub workers: Option<usize>,
    pub histogram: Option<HistogramConfig>,
}

/// Counts of what happened to each discovered geometry file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub failed: usize,
    /// `(snapshot name, error message)` for every failed job.
    pub failures: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.rendered + self.skipped + self.failed
    }
}

fn build_histogram(config: &BatchConfig) -> GrainResult<Option<Arc<MagnitudeHistogram>>> {
    let Some(hist) = &config.histogram else {
        return Ok(None);
    };
    let WindowMode::Fixed(window) = config.settings.window else {
        return Err(GrainError::InvalidConfig(
            "the histogram needs a fixed window (--window)".to_string(),
        ));
    };
    Ok(Some(Arc::new(MagnitudeHistogram::new(window, hist.cell)?)))
}

/// Render every snapshot pair in `config.input_dir`.
///
/// Returns an error only for problems found before the first job starts.
/// Per-file failures are logged and counted in the summary.
pub fn run_batch(config: BatchConfig) -> Result<BatchSummary> {
    if !config.property.is_known() {
        warn!(
            property = %config.property,
            "[WARN] Unknown property, using the first raw value of each record"
        );
    }

    let entries = discover(&config.input_dir)?;
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| GrainError::io(&config.output_dir, e))?;
    let histogram = build_histogram(&config)?;

    let workers = config.workers.unwrap_or_else(default_pool_size);
    let pool = ThreadPool::new(workers)?;
    info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        property = %config.property,
        colormap = config.settings.colormap.name(),
        workers = pool.size(),
        "Starting batch"
    );

    let property = Arc::new(config.property);
    let settings = Arc::new(config.settings);
    let mut summary = BatchSummary::default();
    let mut handles = Vec::new();

    for entry in entries {
        match entry {
            Discovered::MissingPair { geometry, expected } => {
                warn!(
                    file = %geometry.display(),
                    expected = %expected.display(),
                    "[WARN] Missing scalar file, skipping"
                );
                summary.skipped += 1;
            }
            Discovered::Pair(pair) => {
                let name = pair.stem.clone();
                let job = RenderJob {
                    output: pair.output_path(&config.output_dir),
                    pair,
                    property: Arc::clone(&property),
                    settings: Arc::clone(&settings),
                    histogram: histogram.clone(),
                };
                handles.push((name, pool.submit(move || job.run())));
            }
        }
    }

    for (name, handle) in handles {
        let message = match handle.join() {
            Ok(Ok(report)) => {
                info!(
                    file = %report.name,
                    output = %report.output.display(),
                    grains = report.grains,
                    "[OK] Rendered"
                );
                summary.rendered += 1;
                continue;
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };
        error!(file = %name, error = %message, "[ERROR] Render failed");
        summary.failed += 1;
        summary.failures.push((name, message));
    }
    pool.join();

    if let (Some(histogram), Some(hist_config)) = (&histogram, &config.histogram) {
        let grid = histogram.finalize();
        match grid.write_csv(&hist_config.path) {
            Ok(()) => info!(
                path = %hist_config.path.display(),
                bins_x = grid.bins_x,
                bins_y = grid.bins_y,
                "Histogram written"
            ),
            Err(e) => error!(error = %e, "[ERROR] Failed to write histogram"),
        }
    }

    info!(
        rendered = summary.rendered,
        skipped = summary.skipped,
        failed = summary.failed,
        "All tasks done"
    );
    Ok(summary)
}
