//! Error types for the grain rendering pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using GrainError.
pub type GrainResult<T> = Result<T, GrainError>;

/// Broad classification of a failure, used by the batch engine to decide
/// between skipping, failing a single job, or aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input data for one snapshot. The job aborts, the batch continues.
    InputValidation,
    /// Bad run configuration. Fatal when detected before the batch starts.
    Configuration,
    /// Missing or unreadable files.
    Resource,
}

/// Primary error type for snapshot loading and rendering.
#[derive(Debug, Error)]
pub enum GrainError {
    // === Input validation ===
    #[error("{}:{line}: {message}", .file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Degenerate window: {0}")]
    DegenerateWindow(String),

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("Snapshot has no colored grains: {0}")]
    EmptySnapshot(String),

    // === Configuration ===
    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("Invalid colormap definition: {0}")]
    InvalidColormap(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Resources ===
    #[error("Missing paired file: {}", .0.display())]
    MissingPair(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl GrainError {
    /// Shorthand for wrapping an I/O error together with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GrainError::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GrainError::Parse { .. }
            | GrainError::DegenerateWindow(_)
            | GrainError::InvalidCanvas(_)
            | GrainError::EmptySnapshot(_) => ErrorKind::InputValidation,

            GrainError::UnknownColormap(_)
            | GrainError::InvalidColormap(_)
            | GrainError::InvalidConfig(_) => ErrorKind::Configuration,

            GrainError::MissingPair(_) | GrainError::Io { .. } | GrainError::Encode(_) => {
                ErrorKind::Resource
            }
        }
    }

    /// Whether this error should abort a whole run when seen before the batch starts.
    pub fn is_fatal_before_batch(&self) -> bool {
        self.kind() == ErrorKind::Configuration || matches!(self, GrainError::Io { .. })
    }
}
