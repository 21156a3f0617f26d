//! BoothKit Render Library
//!
//! Turns editor state into a backend-independent display list and
//! rasterizes templates for export.

mod loader;
mod raster;
mod renderer;
mod scene;

pub use loader::{DecodingImageLoader, decode};
pub use raster::{PngRenderResult, RasterRenderer, render_template};
pub use renderer::{LineStyle, OverlayStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{
    DisplayItem, DisplayList, DrawCommand, Layer, RecordingRenderer, build_display_list, initials_font_size,
    placeholder_corner_radius,
};
