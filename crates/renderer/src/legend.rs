//! Vertical colorbar legend.

use serde::{Deserialize, Serialize};
use tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap, Point, Rect, SpreadMode,
    Stroke, Transform,
};

use crate::colormap::Colormap;
use crate::font::{draw_text, text_height, text_width, Orientation};

/// Distance from the right canvas edge to the left side of the bar.
pub const LEGEND_RIGHT_OFFSET: f32 = 130.0;
/// Width of the gradient bar.
pub const LEGEND_BAR_WIDTH: f32 = 20.0;
/// Number of gradient stops sampled from the colormap.
pub const LEGEND_GRADIENT_STOPS: usize = 256;
/// Length of a tick mark.
pub const TICK_LENGTH: f32 = 6.0;
/// Gap between tick end and label, and between title and bar.
pub const LABEL_GAP: f32 = 4.0;

const TEXT_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Legend options carried in the render context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    pub enabled: bool,
    pub ticks: usize,
    pub title: Option<String>,
    pub unit: Option<String>,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            ticks: 5,
            title: None,
            unit: None,
        }
    }
}

impl LegendOptions {
    /// Rotated caption: "title [unit]", "title" or "[unit]".
    pub fn caption(&self) -> Option<String> {
        match (self.title.as_deref(), self.unit.as_deref()) {
            (Some(t), Some(u)) => Some(format!("{} [{}]", t, u)),
            (Some(t), None) => Some(t.to_string()),
            (None, Some(u)) => Some(format!("[{}]", u)),
            (None, None) => None,
        }
    }
}

/// Placement of the colorbar on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Cell size of the bitmap font.
    pub font_cell: f32,
}

impl LegendLayout {
    /// Bar at a fixed offset from the right edge, spanning the margin box
    /// vertically. None when the canvas is too small to hold a bar.
    pub fn for_canvas(width: u32, height: u32, margin_px: f64) -> Option<Self> {
        let x = width as f32 - LEGEND_RIGHT_OFFSET;
        let y = margin_px as f32;
        let bar_height = height as f32 - 2.0 * margin_px as f32;
        if x < 0.0 || bar_height < 20.0 {
            return None;
        }
        let font_cell = if width.min(height) >= 600 { 2.0 } else { 1.0 };
        Some(Self {
            x,
            y,
            width: LEGEND_BAR_WIDTH,
            height: bar_height,
            font_cell,
        })
    }

    /// Leftmost pixel column the legend paints, including the rotated
    /// caption when there is one.
    pub fn left_extent(&self, with_caption: bool) -> f32 {
        if with_caption {
            self.x - LABEL_GAP - text_height(self.font_cell)
        } else {
            self.x
        }
    }

    /// Pixel row for a normalized position (0 at the bottom, 1 at the top).
    pub fn y_for(&self, t: f64) -> f32 {
        self.y + self.height - (t as f32) * self.height
    }
}

/// Evenly spaced tick values from vmin to vmax, inclusive.
pub fn tick_values(vmin: f64, vmax: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![vmin],
        n => (0..n)
            .map(|i| vmin + (i as f64 / (n - 1) as f64) * (vmax - vmin))
            .collect(),
    }
}

/// Format a tick label: fixed notation with two decimals, scientific for
/// very large or very small magnitudes.
pub fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && (magnitude >= 1e4 || magnitude < 1e-2) {
        format!("{:.2e}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Draw the colorbar with gradient, frame, ticks, labels and caption.
pub fn draw_legend(
    pixmap: &mut Pixmap,
    layout: &LegendLayout,
    colormap: &Colormap,
    vmin: f64,
    vmax: f64,
    options: &LegendOptions,
) {
    let Some(bar) = Rect::from_xywh(layout.x, layout.y, layout.width, layout.height) else {
        return;
    };

    // Gradient runs from vmin at the bottom to vmax at the top.
    let stops: Vec<GradientStop> = (0..LEGEND_GRADIENT_STOPS)
        .map(|i| {
            let t = i as f64 / (LEGEND_GRADIENT_STOPS - 1) as f64;
            let [r, g, b, a] = colormap
                .evaluate(vmin + t * (vmax - vmin), vmin, vmax)
                .to_rgba8();
            GradientStop::new(t as f32, Color::from_rgba8(r, g, b, a))
        })
        .collect();

    let mut fill = Paint::default();
    match LinearGradient::new(
        Point::from_xy(layout.x, layout.y + layout.height),
        Point::from_xy(layout.x, layout.y),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) {
        Some(shader) => fill.shader = shader,
        None => {
            let [r, g, b, a] = colormap.first_color().to_rgba8();
            fill.set_color_rgba8(r, g, b, a);
        }
    }
    pixmap.fill_rect(bar, &fill, Transform::identity(), None);

    let mut line = Paint::default();
    line.set_color_rgba8(TEXT_COLOR[0], TEXT_COLOR[1], TEXT_COLOR[2], TEXT_COLOR[3]);
    line.anti_alias = true;
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };

    let frame = PathBuilder::from_rect(bar);
    pixmap.stroke_path(&frame, &line, &stroke, Transform::identity(), None);

    let label_height = text_height(layout.font_cell);
    let n = options.ticks;
    for (i, value) in tick_values(vmin, vmax, n).into_iter().enumerate() {
        let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
        let y = layout.y_for(t);
        let x0 = layout.x + layout.width;

        let mut pb = PathBuilder::new();
        pb.move_to(x0, y);
        pb.line_to(x0 + TICK_LENGTH, y);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &line, &stroke, Transform::identity(), None);
        }

        draw_text(
            pixmap,
            &format_tick(value),
            x0 + TICK_LENGTH + LABEL_GAP,
            y - label_height / 2.0,
            layout.font_cell,
            TEXT_COLOR,
            Orientation::Horizontal,
        );
    }

    if let Some(caption) = options.caption() {
        let caption_width = text_width(&caption, layout.font_cell);
        draw_text(
            pixmap,
            &caption,
            layout.x - LABEL_GAP - label_height,
            layout.y + layout.height / 2.0 + caption_width / 2.0,
            layout.font_cell,
            TEXT_COLOR,
            Orientation::Vertical,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tick_fixed() {
        assert_eq!(format_tick(0.0), "0.00");
        assert_eq!(format_tick(3.14159), "3.14");
        assert_eq!(format_tick(-250.0), "-250.00");
    }

    #[test]
    fn test_format_tick_scientific() {
        assert_eq!(format_tick(12345.0), "1.23e4");
        assert_eq!(format_tick(0.00125), "1.25e-3");
    }

    #[test]
    fn test_tick_values_are_inclusive() {
        assert_eq!(tick_values(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(tick_values(2.0, 3.0, 1), vec![2.0]);
        assert!(tick_values(2.0, 3.0, 0).is_empty());
    }

    #[test]
    fn test_caption() {
        let mut opts = LegendOptions::default();
        assert_eq!(opts.caption(), None);
        opts.unit = Some("kPa".into());
        assert_eq!(opts.caption().as_deref(), Some("[kPa]"));
        opts.title = Some("Pressure".into());
        assert_eq!(opts.caption().as_deref(), Some("Pressure [kPa]"));
    }
}
