//! Generators for synthetic snapshots and scratch input directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Geometry and scalar text for a `cols × rows` lattice of unit-spaced
/// circles.
///
/// Grain ids start at 1 in row-major order. The stress record of grain `i`
/// is `-i -i 0`, so its pressure equals `i`.
pub fn circle_lattice(cols: usize, rows: usize, radius: f64) -> (String, String) {
    let mut geometry = String::new();
    let mut scalars = String::new();
    for row in 0..rows {
        for col in 0..cols {
            let id = row * cols + col + 1;
            geometry.push_str(&format!("{} 1 {} {} {} 0\n", id, col, row, radius));
            scalars.push_str(&format!("{} {} {} 0\n", id, -(id as f64), -(id as f64)));
        }
    }
    (geometry, scalars)
}

/// Geometry and scalar text for `count` regular polygons with `sides`
/// vertices, laid out along the x axis. Pressure of grain `i` is `i`.
pub fn polygon_row(count: usize, sides: usize) -> (String, String) {
    let mut geometry = String::new();
    let mut scalars = String::new();
    for i in 0..count {
        let id = i + 1;
        let cx = i as f64 * 2.0;
        geometry.push_str(&format!("{} {}", id, sides));
        for k in 0..sides {
            let angle = k as f64 / sides as f64 * std::f64::consts::TAU;
            geometry.push_str(&format!(" {:.6} {:.6}", cx + 0.8 * angle.cos(), 0.8 * angle.sin()));
        }
        geometry.push_str(" 1\n");
        scalars.push_str(&format!("{} {} {} 0\n", id, -(id as f64), -(id as f64)));
    }
    (geometry, scalars)
}

/// Write `<stem>.xy` and, when `scalars` is given, `<stem>.sxy` into `dir`.
/// Returns the geometry path.
pub fn write_snapshot_pair(
    dir: &Path,
    stem: &str,
    geometry: &str,
    scalars: Option<&str>,
) -> io::Result<PathBuf> {
    let xy = dir.join(format!("{}.xy", stem));
    fs::write(&xy, geometry)?;
    if let Some(scalars) = scalars {
        fs::write(dir.join(format!("{}.sxy", stem)), scalars)?;
    }
    Ok(xy)
}

/// A temporary input directory holding `frames` lattice snapshots named
/// `frame_000`, `frame_001`, ...
pub fn snapshot_dir(frames: usize, cols: usize, rows: usize) -> io::Result<tempfile::TempDir> {
    let dir = tempfile::tempdir()?;
    for i in 0..frames {
        let (geometry, scalars) = circle_lattice(cols, rows, 0.4);
        write_snapshot_pair(dir.path(), &format!("frame_{:03}", i), &geometry, Some(&scalars))?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_lattice_line_count() {
        let (geometry, scalars) = circle_lattice(3, 2, 0.5);
        assert_eq!(geometry.lines().count(), 6);
        assert_eq!(scalars.lines().count(), 6);
        assert!(geometry.starts_with("1 1 0 0 0.5 0"));
    }

    #[test]
    fn test_polygon_row_has_all_vertices() {
        let (geometry, _) = polygon_row(2, 5);
        let first = geometry.lines().next().unwrap();
        // id, n, 5 vertex pairs, type
        assert_eq!(first.split_whitespace().count(), 2 + 10 + 1);
    }

    #[test]
    fn test_snapshot_dir_writes_pairs() {
        let dir = snapshot_dir(2, 2, 2).unwrap();
        assert!(dir.path().join("frame_000.xy").exists());
        assert!(dir.path().join("frame_001.sxy").exists());
    }
}
