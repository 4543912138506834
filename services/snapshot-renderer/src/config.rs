//! Run configuration loaded from YAML, with command-line overrides.
//!
//! ```yaml
//! input_dir: runs/shear
//! output_dir: frames
//! property: pressure
//! colormap: inferno
//! width: 1600
//! height: 1200
//! margin: 5%
//! window: { xmin: 0.0, xmax: 120.0, ymin: 0.0, ymax: 80.0 }
//! value_range: { vmin: -50.0, vmax: 400.0 }
//! legend: { ticks: 6, title: Pressure, unit: kPa }
//! histogram: pressure_map.csv
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use batch::{BatchConfig, HistogramConfig, DEFAULT_CELL_SIZE};
use grain_common::{GrainError, GrainResult, Window};
use renderer::legend::LegendOptions;
use renderer::scene::{Margin, RenderSettings, ValueRange, WindowMode};
use renderer::{load_colormap, Rgb, DEFAULT_COLORMAP};
use serde::Deserialize;
use snapshot::Property;
use tracing::debug;

pub const DEFAULT_INPUT_DIR: &str = ".";
pub const DEFAULT_OUTPUT_DIR: &str = "frames";
pub const DEFAULT_PROPERTY: &str = "pressure";
pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RangeConfig {
    pub vmin: f64,
    pub vmax: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegendConfig {
    pub enabled: Option<bool>,
    pub ticks: Option<usize>,
    pub title: Option<String>,
    pub unit: Option<String>,
}

/// Every setting of a run. Unset fields take their defaults when the
/// configuration is resolved.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub property: Option<String>,
    pub colormap: Option<String>,
    pub colormap_file: Option<PathBuf>,
    pub reverse_colormap: Option<bool>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// "80", "80px" or "5%".
    pub margin: Option<String>,
    pub window: Option<Window>,
    pub value_range: Option<RangeConfig>,
    pub legend: LegendConfig,
    pub workers: Option<usize>,
    pub histogram: Option<PathBuf>,
    pub histogram_cell: Option<f64>,
}

impl RunConfig {
    /// Load a run configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: RunConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded run config");
        Ok(config)
    }

    /// Validate and turn into the batch configuration.
    pub fn into_batch_config(self) -> GrainResult<BatchConfig> {
        let width = self.width.unwrap_or(DEFAULT_WIDTH);
        let height = self.height.unwrap_or(DEFAULT_HEIGHT);
        if width == 0 || height == 0 {
            return Err(GrainError::InvalidConfig(format!(
                "canvas size {}x{} must be positive",
                width, height
            )));
        }

        let margin = match self.margin.as_deref() {
            Some(s) => Margin::parse(s)?,
            None => Margin::default(),
        };

        let window = match self.window {
            Some(w) => {
                let w = w.normalized();
                w.validate()?;
                WindowMode::Fixed(w)
            }
            None => WindowMode::Auto,
        };

        let value_range = match self.value_range {
            Some(RangeConfig { vmin, vmax }) => {
                if !(vmin.is_finite() && vmax.is_finite() && vmin < vmax) {
                    return Err(GrainError::InvalidConfig(format!(
                        "value range [{}, {}] must be finite with vmin < vmax",
                        vmin, vmax
                    )));
                }
                ValueRange::Fixed { vmin, vmax }
            }
            None => ValueRange::PerSnapshot,
        };

        if self.workers == Some(0) {
            return Err(GrainError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        let colormap = load_colormap(
            self.colormap.as_deref().unwrap_or(DEFAULT_COLORMAP),
            self.colormap_file.as_deref(),
            self.reverse_colormap.unwrap_or(false),
        )?;

        let defaults = LegendOptions::default();
        let legend = LegendOptions {
            enabled: self.legend.enabled.unwrap_or(defaults.enabled),
            ticks: self.legend.ticks.unwrap_or(defaults.ticks),
            title: self.legend.title,
            unit: self.legend.unit,
        };

        let histogram = self.histogram.map(|path| HistogramConfig {
            path,
            cell: self.histogram_cell.unwrap_or(DEFAULT_CELL_SIZE),
        });

        Ok(BatchConfig {
            input_dir: self
                .input_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR)),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            property: Property::from_name(self.property.as_deref().unwrap_or(DEFAULT_PROPERTY)),
            settings: RenderSettings {
                width,
                height,
                margin,
                window,
                value_range,
                colormap,
                legend,
                background: Rgb::WHITE,
            },
            workers: self.workers,
            histogram,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = RunConfig::default().into_batch_config().unwrap();
        assert_eq!(cfg.input_dir, PathBuf::from("."));
        assert_eq!(cfg.output_dir, PathBuf::from("frames"));
        assert_eq!(cfg.property, Property::Pressure);
        assert_eq!(cfg.settings.width, 1200);
        assert_eq!(cfg.settings.height, 900);
        assert_eq!(cfg.settings.margin, Margin::Pixels(80.0));
        assert_eq!(cfg.settings.window, WindowMode::Auto);
        assert_eq!(cfg.settings.colormap.name(), "viridis");
        assert!(cfg.settings.legend.enabled);
        assert!(cfg.histogram.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
input_dir: runs/shear
property: kinetic_energy
colormap: Inferno
reverse_colormap: true
width: 1600
height: 1200
margin: 5%
window: { xmin: 0.0, xmax: 120.0, ymin: 0.0, ymax: 80.0 }
value_range: { vmin: -50.0, vmax: 400.0 }
legend:
  ticks: 6
  title: Energy
workers: 2
histogram: map.csv
histogram_cell: 2.5
"#;
        let run: RunConfig = serde_yaml::from_str(yaml).unwrap();
        let cfg = run.into_batch_config().unwrap();
        assert_eq!(cfg.settings.margin, Margin::Fraction(0.05));
        assert_eq!(cfg.property, Property::KineticEnergy);
        assert_eq!(cfg.settings.colormap.name(), "inferno_r");
        assert_eq!(
            cfg.settings.window,
            WindowMode::Fixed(Window::new(0.0, 120.0, 0.0, 80.0))
        );
        assert_eq!(
            cfg.settings.value_range,
            ValueRange::Fixed {
                vmin: -50.0,
                vmax: 400.0
            }
        );
        assert_eq!(cfg.settings.legend.ticks, 6);
        assert_eq!(cfg.settings.legend.title.as_deref(), Some("Energy"));
        assert_eq!(cfg.workers, Some(2));
        let hist = cfg.histogram.unwrap();
        assert_eq!(hist.path, PathBuf::from("map.csv"));
        assert_eq!(hist.cell, 2.5);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(serde_yaml::from_str::<RunConfig>("colour_map: jet\n").is_err());
    }

    #[test]
    fn test_unknown_colormap_is_fatal() {
        let run = RunConfig {
            colormap: Some("sunset".to_string()),
            ..RunConfig::default()
        };
        assert!(matches!(
            run.into_batch_config(),
            Err(GrainError::UnknownColormap(_))
        ));
    }

    #[test]
    fn test_degenerate_window_is_rejected() {
        let run = RunConfig {
            window: Some(Window::new(1.0, 1.0, 0.0, 5.0)),
            ..RunConfig::default()
        };
        assert!(matches!(
            run.into_batch_config(),
            Err(GrainError::DegenerateWindow(_))
        ));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let run = RunConfig {
            value_range: Some(RangeConfig {
                vmin: 5.0,
                vmax: 1.0,
            }),
            ..RunConfig::default()
        };
        assert!(matches!(
            run.into_batch_config(),
            Err(GrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(&dir.path().join("run.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
