//! Line-oriented tokenizers for `.xy` geometry and `.sxy` scalar files.
//!
//! Both formats are whitespace-delimited with one record per line. Blank
//! lines and lines starting with `#` are skipped. Tokens past the end of a
//! record are ignored.

use std::collections::HashMap;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use grain_common::{Grain, GrainError, GrainResult};

/// Raw values per grain id, as read from a scalar file.
pub type ScalarTable = HashMap<i64, Vec<f64>>;

/// One parsed geometry line, before a scalar is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryRecord {
    Circle {
        id: i64,
        material: i32,
        x: f64,
        y: f64,
        r: f64,
    },
    Polygon {
        id: i64,
        material: i32,
        vertices: Vec<(f64, f64)>,
    },
    Border {
        id: i64,
        material: i32,
        vertices: Vec<(f64, f64)>,
    },
}

impl GeometryRecord {
    pub fn id(&self) -> i64 {
        match self {
            GeometryRecord::Circle { id, .. }
            | GeometryRecord::Polygon { id, .. }
            | GeometryRecord::Border { id, .. } => *id,
        }
    }

    /// Build the grain. Borders ignore `scalar` and take the sentinel value.
    pub fn into_grain(self, scalar: f64) -> Grain {
        match self {
            GeometryRecord::Circle {
                id,
                material,
                x,
                y,
                r,
            } => Grain::circle(id, material, x, y, r, scalar),
            GeometryRecord::Polygon {
                id,
                material,
                vertices,
            } => Grain::polygon(id, material, vertices, scalar),
            GeometryRecord::Border {
                id,
                material,
                vertices,
            } => Grain::border(id, material, vertices),
        }
    }
}

/// Tokens of one record line, with enough context for error messages.
struct Record<'a> {
    tokens: SplitWhitespace<'a>,
    file: &'a Path,
    line: usize,
}

impl<'a> Record<'a> {
    fn error(&self, message: String) -> GrainError {
        GrainError::Parse {
            file: self.file.to_path_buf(),
            line: self.line,
            message,
        }
    }

    fn next<T: FromStr>(&mut self, field: &str) -> GrainResult<T> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| self.error(format!("missing {}", field)))?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {} '{}'", field, token)))
    }

    fn vertices(&mut self, count: usize) -> GrainResult<Vec<(f64, f64)>> {
        (0..count)
            .map(|i| {
                let x: f64 = self.next(&format!("x of vertex {}", i + 1))?;
                let y: f64 = self.next(&format!("y of vertex {}", i + 1))?;
                Ok((x, y))
            })
            .collect()
    }
}

/// Non-empty, non-comment lines with their 1-based line numbers.
fn records<'a>(text: &'a str, file: &'a Path) -> impl Iterator<Item = Record<'a>> {
    text.lines().enumerate().filter_map(move |(idx, raw)| {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(Record {
            tokens: trimmed.split_whitespace(),
            file,
            line: idx + 1,
        })
    })
}

/// Parse scalar text: `id v1 v2 ...` per line. A repeated id replaces the
/// earlier record.
pub fn parse_scalars(text: &str, file: &Path) -> GrainResult<ScalarTable> {
    let mut table = ScalarTable::new();
    for mut record in records(text, file) {
        let id: i64 = record.next("grain id")?;
        let mut values = Vec::new();
        while let Some(token) = record.tokens.next() {
            let value = token
                .parse()
                .map_err(|_| record.error(format!("invalid value '{}'", token)))?;
            values.push(value);
        }
        table.insert(id, values);
    }
    Ok(table)
}

/// Parse geometry text.
///
/// - `id 1 x y r type` is a circle,
/// - a negative id is a border: `id n x1 y1 ... xn yn [tag]`, where a
///   missing or non-numeric tag becomes material 0,
/// - anything else is a polygon `id n x1 y1 ... xn yn type`.
pub fn parse_geometry(text: &str, file: &Path) -> GrainResult<Vec<GeometryRecord>> {
    let mut out = Vec::new();
    for mut record in records(text, file) {
        let id: i64 = record.next("grain id")?;
        let n: i64 = record.next("vertex count")?;
        if n < 0 {
            return Err(record.error(format!("negative vertex count {}", n)));
        }
        let n = n as usize;

        let parsed = if id < 0 {
            let vertices = record.vertices(n)?;
            let material = record
                .tokens
                .next()
                .and_then(|tag| tag.parse().ok())
                .unwrap_or(0);
            GeometryRecord::Border {
                id,
                material,
                vertices,
            }
        } else if n == 1 {
            let x = record.next("x")?;
            let y = record.next("y")?;
            let r = record.next("radius")?;
            let material = record.next("type")?;
            GeometryRecord::Circle {
                id,
                material,
                x,
                y,
                r,
            }
        } else {
            let vertices = record.vertices(n)?;
            let material = record.next("type")?;
            GeometryRecord::Polygon {
                id,
                material,
                vertices,
            }
        };
        out.push(parsed);
    }
    Ok(out)
}

fn read_text(path: &Path) -> GrainResult<String> {
    std::fs::read_to_string(path).map_err(|e| GrainError::io(path, e))
}

/// Read and parse a `.sxy` file.
pub fn read_scalar_file(path: &Path) -> GrainResult<ScalarTable> {
    parse_scalars(&read_text(path)?, path)
}

/// Read and parse a `.xy` file.
pub fn read_geometry_file(path: &Path) -> GrainResult<Vec<GeometryRecord>> {
    parse_geometry(&read_text(path)?, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(text: &str) -> GrainResult<Vec<GeometryRecord>> {
        parse_geometry(text, Path::new("frame.xy"))
    }

    #[test]
    fn test_circle_line() {
        let records = geometry("1 1 0 0 1 0").unwrap();
        assert_eq!(
            records,
            vec![GeometryRecord::Circle {
                id: 1,
                material: 0,
                x: 0.0,
                y: 0.0,
                r: 1.0
            }]
        );
    }

    #[test]
    fn test_border_tag_is_optional() {
        let records = geometry("-1 2 0 0 1 1\n-2 2 0 0 1 1 7").unwrap();
        assert!(matches!(records[0], GeometryRecord::Border { material: 0, .. }));
        assert!(matches!(records[1], GeometryRecord::Border { material: 7, .. }));
    }

    #[test]
    fn test_error_carries_line_number() {
        let err = geometry("# header\n\n1 1 0 0 x 0").unwrap_err();
        match err {
            GrainError::Parse { line, ref message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("radius"), "{}", message);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_scalar_only_id() {
        let table = parse_scalars("4", Path::new("frame.sxy")).unwrap();
        assert_eq!(table[&4], Vec::<f64>::new());
    }
}
