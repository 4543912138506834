//! Common types shared across the grain rendering workspace.

pub mod error;
pub mod grain;
pub mod window;

pub use error::{ErrorKind, GrainError, GrainResult};
pub use grain::{DrawCommand, Grain, GrainKind, BORDER_LINE_WIDTH, BORDER_SCALAR};
pub use window::{Window, WindowParseError};
