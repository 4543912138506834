//! Rasterization of granular snapshots.
//!
//! - Colormap engine with named presets and JSON definitions
//! - Screen transform and scene rendering with tiny-skia
//! - Vertical colorbar legend drawn with an embedded bitmap font
//! - PNG encoding (indexed or RGBA)

pub mod colormap;
pub mod font;
pub mod legend;
pub mod png;
pub mod scene;
pub mod style;

pub use colormap::{ColorStop, Colormap, Rgb, DEFAULT_COLORMAP};
pub use legend::LegendOptions;
pub use scene::{
    render_scene, render_to_png, write_png, Margin, RenderContext, RenderSettings,
    ScreenTransform, ValueRange, WindowMode,
};
pub use style::{load_colormap, ColormapDefinition};
