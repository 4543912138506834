//! Snapshot loading for granular simulation output.
//!
//! A snapshot is a pair of whitespace-delimited text files sharing a stem:
//! - `<stem>.xy`: one grain geometry per line
//! - `<stem>.sxy`: raw per-grain values (stress, velocity, ...)
//!
//! The loader parses both, derives one scalar per grain from the selected
//! [`Property`], and computes the value range used for coloring.

pub mod loader;
pub mod parser;
pub mod property;

pub use loader::{load_snapshot, scalar_path_for, value_range, Snapshot};
pub use parser::{
    parse_geometry, parse_scalars, read_geometry_file, read_scalar_file, GeometryRecord,
    ScalarTable,
};
pub use property::Property;
