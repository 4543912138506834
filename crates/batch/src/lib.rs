//! Parallel batch engine.
//!
//! Discovers snapshot pairs in a directory, renders each one as an
//! independent job on a fixed-size worker pool, and reports per-file
//! outcomes plus an end-of-run summary.

pub mod discovery;
pub mod error;
pub mod histogram;
pub mod job;
pub mod pool;
pub mod runner;

pub use discovery::{discover, Discovered, SnapshotPair};
pub use error::{BatchError, Result};
pub use histogram::{
    HistogramGrid, MagnitudeHistogram, DEFAULT_CELL_SIZE, MAX_HISTOGRAM_CELLS,
};
pub use job::{JobReport, RenderJob};
pub use pool::{default_pool_size, PoolError, TaskHandle, ThreadPool};
pub use runner::{run_batch, BatchConfig, BatchSummary, HistogramConfig};
