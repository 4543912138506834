//! Snapshot assembly: geometry + scalars + value range.

use std::path::{Path, PathBuf};

use grain_common::{Grain, GrainError, GrainResult};
use tracing::debug;

use crate::parser::{read_geometry_file, read_scalar_file, GeometryRecord, ScalarTable};
use crate::property::Property;

/// Extension of the geometry file of a snapshot pair.
pub const GEOMETRY_EXTENSION: &str = "xy";
/// Extension of the scalar file of a snapshot pair.
pub const SCALAR_EXTENSION: &str = "sxy";

/// The grains of one frame and the range of their colored scalars.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub name: String,
    pub grains: Vec<Grain>,
    pub value_range: (f64, f64),
}

impl Snapshot {
    /// Assemble a snapshot, rejecting one with nothing to color.
    pub fn from_grains(name: impl Into<String>, grains: Vec<Grain>) -> GrainResult<Self> {
        let name = name.into();
        let value_range = value_range(&grains).ok_or_else(|| {
            GrainError::EmptySnapshot(format!("'{}' contains only border entities", name))
        })?;
        Ok(Self {
            name,
            grains,
            value_range,
        })
    }

    pub fn colored_count(&self) -> usize {
        self.grains.iter().filter(|g| g.is_colored()).count()
    }
}

/// `[vmin, vmax]` over colored grains, widened when it collapses to a point.
/// None when no grain is colored.
pub fn value_range(grains: &[Grain]) -> Option<(f64, f64)> {
    let mut colored = grains.iter().filter(|g| g.is_colored()).peekable();
    colored.peek()?;

    let (lo, hi) = colored
        .map(Grain::scalar)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        // Only non-finite scalars.
        return Some(widen(0.0));
    }
    if lo == hi {
        return Some(widen(lo));
    }
    Some((lo, hi))
}

fn widen(v: f64) -> (f64, f64) {
    let delta = (v.abs() * 1e-6).max(1e-9);
    (v - delta, v + delta)
}

/// The scalar file paired with a geometry file.
pub fn scalar_path_for(geometry: &Path) -> PathBuf {
    geometry.with_extension(SCALAR_EXTENSION)
}

/// Attach derived scalars to parsed geometry. Ids without a scalar record
/// get 0.
pub fn assemble(
    records: Vec<GeometryRecord>,
    scalars: &ScalarTable,
    property: &Property,
) -> Vec<Grain> {
    records
        .into_iter()
        .map(|record| {
            let scalar = scalars
                .get(&record.id())
                .map(|values| property.derive(values))
                .unwrap_or(0.0);
            record.into_grain(scalar)
        })
        .collect()
}

/// Load one snapshot pair.
pub fn load_snapshot(
    geometry: &Path,
    scalars: &Path,
    property: &Property,
) -> GrainResult<Snapshot> {
    let name = geometry
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| geometry.display().to_string());

    let table = read_scalar_file(scalars)?;
    let records = read_geometry_file(geometry)?;
    let grains = assemble(records, &table, property);

    let snapshot = Snapshot::from_grains(name, grains)?;
    debug!(
        snapshot = %snapshot.name,
        grains = snapshot.grains.len(),
        colored = snapshot.colored_count(),
        vmin = snapshot.value_range.0,
        vmax = snapshot.value_range.1,
        "Loaded snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_is_symmetric() {
        let (lo, hi) = widen(2.0);
        assert!(lo < 2.0 && hi > 2.0);
        assert!(((2.0 - lo) - (hi - 2.0)).abs() < 1e-15);
        assert_eq!(widen(0.0), (-1e-9, 1e-9));
    }

    #[test]
    fn test_value_range_skips_borders() {
        let grains = vec![
            Grain::border(-1, 0, vec![(0.0, 0.0), (1.0, 0.0)]),
            Grain::circle(1, 0, 0.0, 0.0, 1.0, 3.0),
            Grain::circle(2, 0, 0.0, 0.0, 1.0, 5.0),
        ];
        assert_eq!(value_range(&grains), Some((3.0, 5.0)));
        assert_eq!(value_range(&grains[..1]), None);
    }

    #[test]
    fn test_scalar_path_for() {
        assert_eq!(
            scalar_path_for(Path::new("/data/frm_001.xy")),
            PathBuf::from("/data/frm_001.sxy")
        );
    }
}
