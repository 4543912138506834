//! Colormap definitions loaded from JSON, and colormap selection.

use std::path::Path;

use grain_common::{GrainError, GrainResult};
use serde::{Deserialize, Serialize};

use crate::colormap::{ColorStop, Colormap, Rgb};

/// A user-defined colormap loaded from JSON.
///
/// ```json
/// {
///   "name": "sand",
///   "stops": [
///     { "position": 0.0, "color": "#f6e8c3" },
///     { "position": 1.0, "color": "#8c510a" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColormapDefinition {
    pub name: String,
    pub description: Option<String>,
    pub stops: Vec<StopDefinition>,
    #[serde(default)]
    pub reversed: bool,
}

/// Color stop as written in a definition file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopDefinition {
    pub position: f64,
    pub color: String,
}

impl ColormapDefinition {
    /// Load a definition from a JSON string
    pub fn from_json(json_str: &str) -> GrainResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| GrainError::InvalidColormap(format!("JSON error: {}", e)))
    }

    /// Load a definition from file
    pub fn from_file(path: &Path) -> GrainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GrainError::io(path, e))?;
        Self::from_json(&content)
    }

    /// Build the colormap, validating every stop.
    pub fn to_colormap(&self) -> GrainResult<Colormap> {
        let stops = self
            .stops
            .iter()
            .map(|stop| {
                let (r, g, b) = hex_to_rgb(&stop.color).ok_or_else(|| {
                    GrainError::InvalidColormap(format!(
                        "colormap '{}': invalid color '{}'",
                        self.name, stop.color
                    ))
                })?;
                Ok(ColorStop::new(stop.position, Rgb::from_rgb8(r, g, b)))
            })
            .collect::<GrainResult<Vec<_>>>()?;

        let cmap = Colormap::new(self.name.clone(), stops)?;
        Ok(if self.reversed { cmap.reversed() } else { cmap })
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Resolve the active colormap: a definition file wins over a preset name.
pub fn load_colormap(
    preset: &str,
    definition_file: Option<&Path>,
    reversed: bool,
) -> GrainResult<Colormap> {
    let cmap = match definition_file {
        Some(path) => ColormapDefinition::from_file(path)?.to_colormap()?,
        None => Colormap::from_preset(preset)?,
    };
    Ok(if reversed { cmap.reversed() } else { cmap })
}
