//! Discovery of snapshot pairs in an input directory.

use std::io;
use std::path::{Path, PathBuf};

use grain_common::{GrainError, GrainResult};
use snapshot::loader::{scalar_path_for, GEOMETRY_EXTENSION};
use tracing::debug;

/// A geometry file and its scalar companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPair {
    pub stem: String,
    pub geometry: PathBuf,
    pub scalars: PathBuf,
}

impl SnapshotPair {
    /// `<output_dir>/<stem>.png`
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.png", self.stem))
    }
}

/// Outcome of looking for the scalar file of one geometry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovered {
    Pair(SnapshotPair),
    MissingPair { geometry: PathBuf, expected: PathBuf },
}

/// List every `.xy` file directly inside `dir`, sorted by name, paired with
/// its `.sxy` file.
pub fn discover(dir: &Path) -> GrainResult<Vec<Discovered>> {
    if !dir.is_dir() {
        return Err(GrainError::io(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "input directory not found"),
        ));
    }

    let mut found = Vec::new();
    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            GrainError::io(path, io::Error::from(e))
        })?;

        let path = entry.path();
        let is_geometry = path.extension().and_then(|e| e.to_str()) == Some(GEOMETRY_EXTENSION);
        if !entry.file_type().is_file() || !is_geometry {
            continue;
        }

        let scalars = scalar_path_for(path);
        if scalars.is_file() {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            found.push(Discovered::Pair(SnapshotPair {
                stem,
                geometry: path.to_path_buf(),
                scalars,
            }));
        } else {
            found.push(Discovered::MissingPair {
                geometry: path.to_path_buf(),
                expected: scalars,
            });
        }
    }

    debug!(dir = %dir.display(), entries = found.len(), "Discovered snapshots");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let pair = SnapshotPair {
            stem: "frm_007".to_string(),
            geometry: PathBuf::from("in/frm_007.xy"),
            scalars: PathBuf::from("in/frm_007.sxy"),
        };
        assert_eq!(
            pair.output_path(Path::new("out")),
            PathBuf::from("out/frm_007.png")
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, GrainError::Io { .. }));
    }
}
