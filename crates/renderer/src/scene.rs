//! Scene rendering: physical-to-screen transform and rasterization of a
//! snapshot's grains onto a canvas.

use std::path::Path;

use grain_common::{DrawCommand, Grain, GrainError, GrainResult, Window};
use serde::{Deserialize, Serialize};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use crate::colormap::{Colormap, Rgb};
use crate::legend::{draw_legend, LegendLayout, LegendOptions, LABEL_GAP};
use crate::png::encode_pixmap;

/// Canvas margin, either in pixels or as a fraction of the smaller canvas
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Margin {
    Pixels(f64),
    Fraction(f64),
}

impl Default for Margin {
    fn default() -> Self {
        Margin::Pixels(80.0)
    }
}

impl Margin {
    /// Parse "80", "80px" or "5%".
    pub fn parse(s: &str) -> GrainResult<Self> {
        let s = s.trim();
        let invalid = || GrainError::InvalidConfig(format!("invalid margin '{}'", s));

        let margin = if let Some(pct) = s.strip_suffix('%') {
            let value: f64 = pct.trim().parse().map_err(|_| invalid())?;
            Margin::Fraction(value / 100.0)
        } else {
            let px = s.strip_suffix("px").unwrap_or(s);
            Margin::Pixels(px.trim().parse().map_err(|_| invalid())?)
        };
        margin.validate()?;
        Ok(margin)
    }

    pub fn validate(&self) -> GrainResult<()> {
        let ok = match *self {
            Margin::Pixels(px) => px.is_finite() && px >= 0.0,
            Margin::Fraction(f) => f.is_finite() && (0.0..0.5).contains(&f),
        };
        if ok {
            Ok(())
        } else {
            Err(GrainError::InvalidConfig(format!(
                "margin {:?} out of range",
                self
            )))
        }
    }

    /// Margin in pixels for a canvas of the given size.
    pub fn to_pixels(&self, width: u32, height: u32) -> f64 {
        match *self {
            Margin::Pixels(px) => px,
            Margin::Fraction(f) => f * width.min(height) as f64,
        }
    }
}

/// Where the color scale comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ValueRange {
    /// The snapshot's own data range.
    #[default]
    PerSnapshot,
    /// One global range shared by every frame.
    Fixed { vmin: f64, vmax: f64 },
}

impl ValueRange {
    pub fn resolve(&self, data_range: (f64, f64)) -> (f64, f64) {
        match *self {
            ValueRange::PerSnapshot => data_range,
            ValueRange::Fixed { vmin, vmax } => (vmin, vmax),
        }
    }
}

/// How the visible physical window is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WindowMode {
    /// Union of every grain's bounding box.
    #[default]
    Auto,
    Fixed(Window),
}

impl WindowMode {
    pub fn resolve(&self, grains: &[Grain]) -> Window {
        match self {
            WindowMode::Fixed(w) => *w,
            WindowMode::Auto => grains
                .iter()
                .map(Grain::bounds)
                .fold(Window::empty(), |acc, b| acc.union(&b)),
        }
    }
}

/// Run-wide render settings, shared by every job.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub window: WindowMode,
    pub value_range: ValueRange,
    pub colormap: Colormap,
    pub legend: LegendOptions,
    pub background: Rgb,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            margin: Margin::default(),
            window: WindowMode::Auto,
            value_range: ValueRange::PerSnapshot,
            colormap: Colormap::default(),
            legend: LegendOptions::default(),
            background: Rgb::WHITE,
        }
    }
}

impl RenderSettings {
    /// Freeze the settings for one snapshot.
    pub fn context_for(&self, grains: &[Grain], data_range: (f64, f64)) -> RenderContext {
        let (vmin, vmax) = self.value_range.resolve(data_range);
        RenderContext {
            width: self.width,
            height: self.height,
            margin: self.margin,
            window: self.window.resolve(grains),
            vmin,
            vmax,
            colormap: self.colormap.clone(),
            legend: self.legend.clone(),
            background: self.background,
        }
    }
}

/// Immutable per-job render parameters.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub window: Window,
    pub vmin: f64,
    pub vmax: f64,
    pub colormap: Colormap,
    pub legend: LegendOptions,
    pub background: Rgb,
}

/// Uniform-scale mapping from physical coordinates to pixels, y pointing
/// down, with the window centered inside the margin box. The right edge of
/// the box can be pulled further in to leave room for the legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    window: Window,
    height: f64,
    margin: f64,
    right: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl ScreenTransform {
    pub fn fit(window: &Window, width: u32, height: u32, margin: Margin) -> GrainResult<Self> {
        Self::fit_with_right_inset(window, width, height, margin, 0.0)
    }

    /// Like [`ScreenTransform::fit`], with the right side of the drawable box
    /// at `width - max(margin, right_inset)`.
    pub fn fit_with_right_inset(
        window: &Window,
        width: u32,
        height: u32,
        margin: Margin,
        right_inset: f64,
    ) -> GrainResult<Self> {
        let window = window.normalized();
        window.validate()?;

        let m = margin.to_pixels(width, height);
        let right = right_inset.max(m);
        let avail_w = width as f64 - m - right;
        let avail_h = height as f64 - 2.0 * m;
        if !(avail_w > 0.0 && avail_h > 0.0) {
            return Err(GrainError::InvalidCanvas(format!(
                "{}x{} canvas leaves no drawable area inside a {} px margin ({} px on the right)",
                width, height, m, right
            )));
        }

        let scale_x = avail_w / window.width();
        let scale_y = avail_h / window.height();
        let scale = scale_x.min(scale_y);

        let offset_x = (avail_w - window.width() * scale) / 2.0;
        let offset_y = (avail_h - window.height() * scale) / 2.0;

        Ok(Self {
            window,
            height: height as f64,
            margin: m,
            right: width as f64 - right,
            scale,
            offset_x,
            offset_y,
        })
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.margin + self.offset_x + (x - self.window.xmin) * self.scale,
            self.height - self.margin - self.offset_y - (y - self.window.ymin) * self.scale,
        )
    }

    /// Right end of the drawable box, in pixels.
    pub fn right_edge(&self) -> f64 {
        self.right
    }

    /// Pixels per physical unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }
}

fn paint_for(color: Rgb) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn polygon_path(points: &[(f64, f64)]) -> Option<tiny_skia::Path> {
    let (&(x0, y0), rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(x0 as f32, y0 as f32);
    for &(x, y) in rest {
        pb.line_to(x as f32, y as f32);
    }
    pb.close();
    pb.finish()
}

/// Rasterize one draw command. Shapes that collapse to nothing are skipped.
fn rasterize(pixmap: &mut Pixmap, command: &DrawCommand, color: Rgb) {
    let paint = paint_for(color);
    match command {
        DrawCommand::FillCircle { cx, cy, radius } => {
            if let Some(path) = PathBuilder::from_circle(*cx as f32, *cy as f32, *radius as f32) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        DrawCommand::FillPolygon { points } => {
            if let Some(path) = polygon_path(points) {
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        DrawCommand::StrokePolygon { points, width } => {
            if let Some(path) = polygon_path(points) {
                let stroke = Stroke {
                    width: *width as f32,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
    }
}

/// Fit the window next to the legend. When the legend would leave no room
/// for the scene it is dropped and the full margin box is used.
fn fit_scene(ctx: &RenderContext) -> GrainResult<(ScreenTransform, Option<LegendLayout>)> {
    let margin_px = ctx.margin.to_pixels(ctx.width, ctx.height);
    let layout = if ctx.legend.enabled {
        LegendLayout::for_canvas(ctx.width, ctx.height, margin_px)
    } else {
        None
    };

    if let Some(layout) = layout {
        let left = layout.left_extent(ctx.legend.caption().is_some()) - LABEL_GAP;
        let inset = ctx.width as f64 - left as f64;
        match ScreenTransform::fit_with_right_inset(
            &ctx.window,
            ctx.width,
            ctx.height,
            ctx.margin,
            inset,
        ) {
            Ok(transform) => return Ok((transform, Some(layout))),
            Err(GrainError::InvalidCanvas(_)) => {
                debug!(width = ctx.width, "No room beside the legend, drawing without it");
            }
            Err(e) => return Err(e),
        }
    }

    let transform = ScreenTransform::fit(&ctx.window, ctx.width, ctx.height, ctx.margin)?;
    Ok((transform, None))
}

/// Render grains onto a fresh canvas.
pub fn render_scene(grains: &[Grain], ctx: &RenderContext) -> GrainResult<Pixmap> {
    let (transform, legend) = fit_scene(ctx)?;

    let mut pixmap = Pixmap::new(ctx.width, ctx.height).ok_or_else(|| {
        GrainError::InvalidCanvas(format!("cannot allocate {}x{} canvas", ctx.width, ctx.height))
    })?;
    let [r, g, b, a] = ctx.background.to_rgba8();
    pixmap.fill(Color::from_rgba8(r, g, b, a));

    let mut drawn = 0usize;
    for grain in grains {
        let color = if grain.is_colored() {
            ctx.colormap.evaluate(grain.scalar(), ctx.vmin, ctx.vmax)
        } else {
            Rgb::BLACK
        };
        if let Some(command) = grain.render(|x, y| transform.to_screen(x, y), transform.scale()) {
            rasterize(&mut pixmap, &command, color);
            drawn += 1;
        }
    }

    if let Some(layout) = legend {
        draw_legend(&mut pixmap, &layout, &ctx.colormap, ctx.vmin, ctx.vmax, &ctx.legend);
    }

    debug!(
        grains = grains.len(),
        drawn,
        scale = transform.scale(),
        "Rendered scene"
    );
    Ok(pixmap)
}

/// Render grains and encode the canvas as PNG bytes.
pub fn render_to_png(grains: &[Grain], ctx: &RenderContext) -> GrainResult<Vec<u8>> {
    let pixmap = render_scene(grains, ctx)?;
    encode_pixmap(&pixmap)
}

/// Render grains and write the PNG to `path`.
pub fn write_png(grains: &[Grain], ctx: &RenderContext, path: &Path) -> GrainResult<()> {
    let png = render_to_png(grains, ctx)?;
    std::fs::write(path, png).map_err(|e| GrainError::io(path, e))
}
