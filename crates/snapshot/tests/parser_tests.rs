//! Tests for snapshot parsing, property derivation and loading.

use std::path::Path;

use grain_common::{GrainError, GrainKind, BORDER_SCALAR};
use snapshot::parser::{parse_geometry, parse_scalars, GeometryRecord};
use snapshot::{load_snapshot, scalar_path_for, Property};
use test_utils::{assert_close, fixtures, generators};

fn xy() -> &'static Path {
    Path::new("frame.xy")
}

fn sxy() -> &'static Path {
    Path::new("frame.sxy")
}

// ============================================================================
// Scalar files
// ============================================================================

#[test]
fn test_pressure_from_stress_record() {
    let table = parse_scalars("5 -2.0 -4.0 0.5\n", sxy()).unwrap();
    assert_eq!(Property::Pressure.derive(&table[&5]), 3.0);
}

#[test]
fn test_duplicate_scalar_id_last_wins() {
    let table = parse_scalars("1 1.0 1.0 0\n1 -8.0 -2.0 0\n", sxy()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[&1], vec![-8.0, -2.0, 0.0]);
}

#[test]
fn test_scalar_comments_and_blank_lines_are_skipped() {
    let table = parse_scalars("# id sxx syy sxy\n\n   \n2 1 2 3\n", sxy()).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn test_malformed_scalar_value() {
    let err = parse_scalars("1 1.0\n2 oops\n", sxy()).unwrap_err();
    assert!(matches!(err, GrainError::Parse { line: 2, .. }));
    assert!(err.to_string().starts_with("frame.sxy:2:"));
}

// ============================================================================
// Geometry files
// ============================================================================

#[test]
fn test_small_geometry_fixture() {
    let records = parse_geometry(fixtures::SMALL_GEOMETRY, xy()).unwrap();
    assert_eq!(records.len(), 4);
    assert!(matches!(records[0], GeometryRecord::Circle { id: 1, material: 0, .. }));
    assert!(matches!(records[1], GeometryRecord::Circle { id: 2, material: 1, .. }));
    match &records[2] {
        GeometryRecord::Polygon {
            id,
            material,
            vertices,
        } => {
            assert_eq!(*id, 3);
            assert_eq!(*material, 2);
            assert_eq!(vertices, &vec![(5.0, -1.0), (7.0, -1.0), (6.0, 1.0)]);
        }
        other => panic!("expected polygon, got {:?}", other),
    }
    assert!(matches!(
        records[3],
        GeometryRecord::Border { id: -1, material: 0, .. }
    ));
}

#[test]
fn test_polygon_keeps_vertex_order() {
    let records = parse_geometry("9 4 0 0 0 1 1 1 1 0 3\n", xy()).unwrap();
    let GeometryRecord::Polygon { vertices, .. } = &records[0] else {
        panic!("expected polygon");
    };
    assert_eq!(vertices, &vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
}

#[test]
fn test_extra_tokens_are_ignored() {
    let records = parse_geometry("1 1 0 0 1 0 trailing junk 42\n", xy()).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_missing_polygon_type_is_an_error() {
    let err = parse_geometry("3 3 0 0 1 0 0 1\n", xy()).unwrap_err();
    match err {
        GrainError::Parse { line, message, .. } => {
            assert_eq!(line, 1);
            assert!(message.contains("type"), "{}", message);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_missing_vertex_is_an_error() {
    let err = parse_geometry("3 3 0 0 1 0\n", xy()).unwrap_err();
    assert!(matches!(err, GrainError::Parse { .. }));
}

#[test]
fn test_negative_vertex_count_is_an_error() {
    let err = parse_geometry("1 1 0 0 1 0\n2 -3 0 0\n", xy()).unwrap_err();
    assert!(matches!(err, GrainError::Parse { line: 2, .. }));
}

#[test]
fn test_malformed_number_reports_line() {
    let err = parse_geometry(fixtures::MALFORMED_GEOMETRY, xy()).unwrap_err();
    assert!(matches!(err, GrainError::Parse { line: 2, .. }));
}

// ============================================================================
// Property derivation
// ============================================================================

#[test]
fn test_kinetic_energy() {
    let table = parse_scalars(fixtures::VELOCITY_SCALARS, sxy()).unwrap();
    assert_close!(Property::KineticEnergy.derive(&table[&1]), 6.125e-3, 1e-15);
}

#[test]
fn test_velocity_norm_and_speed() {
    let table = parse_scalars(fixtures::VELOCITY_SCALARS, sxy()).unwrap();
    assert_close!(Property::VelocityNorm.derive(&table[&1]), -2.213594, 1e-12);
    assert_close!(Property::Speed.derive(&table[&1]), 2.213594, 1e-12);
    assert_close!(Property::Speed.derive(&table[&2]), 2.213594, 1e-12);
    // Too short for the derivation: first raw value.
    assert_eq!(Property::Speed.derive(&table[&3]), 1.0);
}

#[test]
fn test_raw_column() {
    let table = parse_scalars(fixtures::VELOCITY_SCALARS, sxy()).unwrap();
    assert_eq!(Property::from_name("column:3").derive(&table[&1]), 2.0);
    assert_eq!(Property::from_name("v5").derive(&table[&2]), 8.0);
}

#[test]
fn test_unknown_property_uses_first_value() {
    let property = Property::from_name("temperature");
    assert!(!property.is_known());
    assert_eq!(property.derive(&[7.0, 1.0]), 7.0);
    assert_eq!(property.derive(&[]), 0.0);
}

// ============================================================================
// Loading pairs
// ============================================================================

#[test]
fn test_load_small_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = generators::write_snapshot_pair(
        dir.path(),
        "frm_010",
        fixtures::SMALL_GEOMETRY,
        Some(fixtures::SMALL_SCALARS),
    )
    .unwrap();

    let snap = load_snapshot(&geometry, &scalar_path_for(&geometry), &Property::Pressure).unwrap();
    assert_eq!(snap.name, "frm_010");
    assert_eq!(snap.grains.len(), 4);
    assert_eq!(snap.colored_count(), 3);
    assert_eq!(snap.value_range, (2.0, 6.0));

    let border = &snap.grains[3];
    assert_eq!(border.kind(), GrainKind::Border);
    assert_eq!(border.scalar(), BORDER_SCALAR);
    assert!(!border.is_colored());
}

#[test]
fn test_missing_scalar_record_gives_zero() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = generators::write_snapshot_pair(
        dir.path(),
        "frm",
        "1 1 0 0 1 0\n2 1 3 0 1 0\n",
        Some("1 -4 -4 0\n"),
    )
    .unwrap();

    let snap = load_snapshot(&geometry, &scalar_path_for(&geometry), &Property::Pressure).unwrap();
    assert_eq!(snap.grains[0].scalar(), 4.0);
    assert_eq!(snap.grains[1].scalar(), 0.0);
    assert_eq!(snap.value_range, (0.0, 4.0));
}

#[test]
fn test_single_grain_range_is_widened() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = generators::write_snapshot_pair(
        dir.path(),
        "one",
        fixtures::SINGLE_GRAIN_GEOMETRY,
        Some(fixtures::SINGLE_GRAIN_SCALARS),
    )
    .unwrap();

    let snap = load_snapshot(&geometry, &scalar_path_for(&geometry), &Property::Pressure).unwrap();
    let (vmin, vmax) = snap.value_range;
    assert!(vmin < 3.0 && vmax > 3.0);
    assert!(vmax - vmin < 1e-3);
}

#[test]
fn test_border_only_snapshot_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = generators::write_snapshot_pair(
        dir.path(),
        "walls",
        fixtures::BORDER_ONLY_GEOMETRY,
        Some(""),
    )
    .unwrap();

    let err = load_snapshot(&geometry, &scalar_path_for(&geometry), &Property::Pressure)
        .unwrap_err();
    assert!(matches!(err, GrainError::EmptySnapshot(_)));
}

#[test]
fn test_missing_scalar_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let geometry =
        generators::write_snapshot_pair(dir.path(), "lonely", fixtures::SMALL_GEOMETRY, None)
            .unwrap();

    let err = load_snapshot(&geometry, &scalar_path_for(&geometry), &Property::Pressure)
        .unwrap_err();
    assert!(matches!(err, GrainError::Io { .. }));
}
