//! One render job: load a snapshot pair, render it, write the PNG.

use std::path::PathBuf;
use std::sync::Arc;

use grain_common::GrainResult;
use renderer::scene::{write_png, RenderSettings};
use snapshot::{load_snapshot, Property};
use tracing::debug;

use crate::discovery::SnapshotPair;
use crate::histogram::MagnitudeHistogram;

/// Everything a worker needs to render one frame.
///
/// Settings and property are shared read-only between jobs; the snapshot and
/// its render context are created and dropped inside [`RenderJob::run`].
pub struct RenderJob {
    pub pair: SnapshotPair,
    pub output: PathBuf,
    pub property: Arc<Property>,
    pub settings: Arc<RenderSettings>,
    pub histogram: Option<Arc<MagnitudeHistogram>>,
}

/// Result of a successful job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub name: String,
    pub output: PathBuf,
    pub grains: usize,
    pub value_range: (f64, f64),
}

impl RenderJob {
    pub fn run(self) -> GrainResult<JobReport> {
        let snapshot = load_snapshot(&self.pair.geometry, &self.pair.scalars, &self.property)?;
        let ctx = self
            .settings
            .context_for(&snapshot.grains, snapshot.value_range);

        write_png(&snapshot.grains, &ctx, &self.output)?;

        if let Some(histogram) = &self.histogram {
            histogram.add_grains(&snapshot.grains);
        }

        debug!(
            snapshot = %snapshot.name,
            output = %self.output.display(),
            vmin = ctx.vmin,
            vmax = ctx.vmax,
            "Job finished"
        );
        Ok(JobReport {
            name: snapshot.name,
            output: self.output,
            grains: snapshot.grains.len(),
            value_range: (ctx.vmin, ctx.vmax),
        })
    }
}
