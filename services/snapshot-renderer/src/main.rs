//! Snapshot renderer.
//!
//! Scans a directory of `.xy` geometry files with their `.sxy` scalar
//! companions and renders every snapshot to a colorized PNG frame on a
//! worker pool.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grain_common::Window;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{RangeConfig, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "snapshot-renderer")]
#[command(about = "Render granular simulation snapshots to colorized PNG frames")]
struct Args {
    /// Directory holding the .xy/.sxy snapshot pairs
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output directory for the PNG frames
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Property used for coloring (pressure, kinetic_energy, velocity_norm,
    /// speed, column:K)
    #[arg(short, long)]
    property: Option<String>,

    /// Colormap preset
    #[arg(short, long)]
    colormap: Option<String>,

    /// JSON colormap definition, takes precedence over --colormap
    #[arg(long)]
    colormap_file: Option<PathBuf>,

    /// Reverse the colormap
    #[arg(long)]
    reverse_colormap: bool,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Margin in pixels ("80") or as a share of the smaller side ("5%")
    #[arg(long, allow_hyphen_values = true)]
    margin: Option<String>,

    /// Fixed physical window "xmin,xmax,ymin,ymax"
    #[arg(long, value_parser = parse_window, allow_hyphen_values = true)]
    window: Option<Window>,

    /// Fixed color range "vmin,vmax" shared by every frame
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    range: Option<(f64, f64)>,

    /// Number of legend ticks
    #[arg(long)]
    ticks: Option<usize>,

    /// Legend title
    #[arg(long)]
    title: Option<String>,

    /// Legend unit
    #[arg(long)]
    unit: Option<String>,

    /// Do not draw the legend
    #[arg(long)]
    no_legend: bool,

    /// Worker threads (defaults to available parallelism)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Write a spatial magnitude histogram CSV (needs --window)
    #[arg(long)]
    histogram: Option<PathBuf>,

    /// Histogram cell size in physical units
    #[arg(long)]
    histogram_cell: Option<f64>,

    /// YAML run configuration; command-line flags override it
    #[arg(long, env = "SNAPSHOT_RENDERER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn parse_window(s: &str) -> Result<Window, String> {
    Window::from_cli_string(s).map_err(|e| e.to_string())
}

fn parse_range(s: &str) -> Result<(f64, f64), String> {
    let (vmin, vmax) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"vmin,vmax\", got '{}'", s))?;
    let vmin: f64 = vmin
        .trim()
        .parse()
        .map_err(|_| format!("invalid vmin '{}'", vmin.trim()))?;
    let vmax: f64 = vmax
        .trim()
        .parse()
        .map_err(|_| format!("invalid vmax '{}'", vmax.trim()))?;
    Ok((vmin, vmax))
}

/// Overlay command-line flags on the file configuration.
fn apply_args(mut config: RunConfig, args: Args) -> RunConfig {
    if args.dir.is_some() {
        config.input_dir = args.dir;
    }
    if args.output.is_some() {
        config.output_dir = args.output;
    }
    if args.property.is_some() {
        config.property = args.property;
    }
    if args.colormap.is_some() {
        config.colormap = args.colormap;
    }
    if args.colormap_file.is_some() {
        config.colormap_file = args.colormap_file;
    }
    if args.reverse_colormap {
        config.reverse_colormap = Some(true);
    }
    if args.width.is_some() {
        config.width = args.width;
    }
    if args.height.is_some() {
        config.height = args.height;
    }
    if args.margin.is_some() {
        config.margin = args.margin;
    }
    if args.window.is_some() {
        config.window = args.window;
    }
    if let Some((vmin, vmax)) = args.range {
        config.value_range = Some(RangeConfig { vmin, vmax });
    }
    if args.ticks.is_some() {
        config.legend.ticks = args.ticks;
    }
    if args.title.is_some() {
        config.legend.title = args.title;
    }
    if args.unit.is_some() {
        config.legend.unit = args.unit;
    }
    if args.no_legend {
        config.legend.enabled = Some(false);
    }
    if args.workers.is_some() {
        config.workers = args.workers;
    }
    if args.histogram.is_some() {
        config.histogram = args.histogram;
    }
    if args.histogram_cell.is_some() {
        config.histogram_cell = args.histogram_cell;
    }
    config
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_json);

    let file_config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let batch_config = apply_args(file_config, args)
        .into_batch_config()
        .context("Invalid configuration")?;

    info!(
        input = %batch_config.input_dir.display(),
        output = %batch_config.output_dir.display(),
        property = %batch_config.property,
        colormap = batch_config.settings.colormap.name(),
        "Starting snapshot renderer"
    );

    let summary = batch::run_batch(batch_config)?;

    if summary.failed > 0 {
        info!(
            failed = summary.failed,
            "Some snapshots failed to render; see errors above"
        );
    }
    Ok(())
}
