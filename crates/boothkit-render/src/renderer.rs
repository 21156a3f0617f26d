//! Renderer trait abstraction.

use boothkit_core::editor::Editor;
use boothkit_core::images::ImageCache;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Export failed: {0}")]
    Export(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Stroke used for one kind of editor overlay.
#[derive(Debug, Clone)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    /// Dash pattern (on, off, ...); empty for a solid line.
    pub dash: Vec<f64>,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: Color, width: f64, dash: &[f64]) -> Self {
        Self {
            color,
            width,
            dash: dash.to_vec(),
        }
    }
}

/// Colors and strokes of the editor chrome drawn over the paper.
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub grid: LineStyle,
    pub margins: LineStyle,
    pub guides: LineStyle,
    pub selection: LineStyle,
    /// Initials drawn on placeholders.
    pub initials_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            // #e5e7eb at 50%
            grid: LineStyle::solid(Color::from_rgba8(0xe5, 0xe7, 0xeb, 128), 1.0),
            margins: LineStyle::dashed(Color::from_rgba8(0x3b, 0x82, 0xf6, 255), 2.0, &[5.0, 5.0]),
            // #ff6b6b at 80%
            guides: LineStyle::dashed(Color::from_rgba8(0xff, 0x6b, 0x6b, 204), 2.0, &[8.0, 4.0]),
            selection: LineStyle::solid(Color::from_rgba8(59, 130, 246, 255), 1.0),
            initials_color: Color::from_rgba8(0x11, 0x18, 0x27, 255),
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a Editor,
    /// Decoded images; shapes without a loaded bitmap draw their placeholder.
    pub images: &'a ImageCache,
    /// Surface size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    pub style: OverlayStyle,
    /// Draw editor chrome (grid, margins, guides, selection). Off for export.
    pub show_overlays: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a Editor, images: &'a ImageCache, viewport_size: Size) -> Self {
        Self {
            editor,
            images,
            viewport_size,
            scale_factor: 1.0,
            style: OverlayStyle::default(),
            show_overlays: true,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    /// Render only the template itself, as it would be printed.
    pub fn for_export(mut self) -> Self {
        self.show_overlays = false;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the color the surface is cleared with.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.editor.paper_color().into()
    }
}
