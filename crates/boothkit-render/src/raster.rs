//! CPU rasterizer used to export a template as an image.
//!
//! Display lists are painted with tiny-skia. Text is not rasterized, so
//! placeholders export as plain fills.

use crate::renderer::{LineStyle, RenderContext, RenderResult, Renderer, RendererError};
use crate::scene::{DisplayList, DrawCommand, build_display_list};
use boothkit_core::editor::Editor;
use boothkit_core::images::{Bitmap, ImageCache};
use kurbo::{Affine, PathEl, Rect, RoundedRect, Size};
use peniko::Color;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash, Transform,
};

/// Result of rendering to pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel, not premultiplied).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl PngRenderResult {
    /// RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba_data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode RGBA pixel data to PNG bytes.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Export(format!("Failed to write PNG header: {e}")))?;
            writer
                .write_image_data(&self.rgba_data)
                .map_err(|e| RendererError::Export(format!("Failed to write PNG data: {e}")))?;
        }
        Ok(png_data)
    }
}

/// Renderer that paints into a tiny-skia pixmap.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    pixmap: Pixmap,
}

impl RasterRenderer {
    /// Create a renderer for a `width` x `height` surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RendererError::RenderFailed(format!("invalid surface size {width}x{height}")))?;
        Ok(Self { pixmap })
    }

    /// Copy out the current pixels.
    pub fn result(&self) -> PngRenderResult {
        let rgba_data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        PngRenderResult {
            rgba_data,
            width: self.pixmap.width(),
            height: self.pixmap.height(),
        }
    }

    /// Paint a display list over the current contents.
    pub fn paint(&mut self, list: &DisplayList) {
        let transform = skia_transform(list.transform);
        for item in &list.items {
            match &item.command {
                DrawCommand::FillRect {
                    rect,
                    color,
                    corner_radius,
                } => self.fill_rect(*rect, *color, *corner_radius, transform),
                DrawCommand::Image { rect, bitmap } => self.draw_bitmap(*rect, bitmap, transform),
                DrawCommand::Line { from, to, style } => {
                    self.stroke(&kurbo::Line::new(*from, *to), style, transform);
                }
                DrawCommand::StrokeRect { rect, style } => self.stroke(rect, style, transform),
                DrawCommand::Text { text, .. } => {
                    log::trace!("raster: skipping text {text:?}");
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, radius: f64, transform: Transform) {
        let path = if radius > 0.0 {
            skia_path(&RoundedRect::from_rect(rect, radius))
        } else {
            skia_path(&rect)
        };
        let Some(path) = path else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;
        self.pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    fn draw_bitmap(&mut self, rect: Rect, bitmap: &Bitmap, transform: Transform) {
        let (bw, bh) = (bitmap.width(), bitmap.height());
        let Some(mut source) = Pixmap::new(bw, bh) else {
            return;
        };
        for (dst, px) in source.pixels_mut().iter_mut().zip(bitmap.pixels().chunks_exact(4)) {
            *dst = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        }
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        let placement = transform
            .pre_translate(rect.x0 as f32, rect.y0 as f32)
            .pre_scale((rect.width() / bw as f64) as f32, (rect.height() / bh as f64) as f32);
        self.pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, placement, None);
    }

    fn stroke(&mut self, shape: &impl kurbo::Shape, style: &LineStyle, transform: Transform) {
        let Some(path) = skia_path(shape) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(skia_color(style.color));
        // Sharp overlay lines
        paint.anti_alias = false;
        let dash = if style.dash.is_empty() {
            None
        } else {
            StrokeDash::new(style.dash.iter().map(|d| *d as f32).collect(), 0.0)
        };
        let stroke = Stroke {
            width: style.width as f32,
            dash,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }
}

impl Renderer for RasterRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.paint(&build_display_list(ctx));
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let c = color.to_rgba8();
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

/// Flatten a kurbo shape into a tiny-skia path.
fn skia_path(shape: &impl kurbo::Shape) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Render the template (no editor overlays) at `scale` pixels per paper unit.
pub fn render_template(editor: &Editor, images: &ImageCache, scale: f64) -> RenderResult<PngRenderResult> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(RendererError::RenderFailed(format!("invalid export scale {scale}")));
    }
    let paper = editor.paper();
    let width = (paper.width * scale).round() as u32;
    let height = (paper.height * scale).round() as u32;
    let ctx = RenderContext::new(editor, images, Size::new(width as f64, height as f64))
        .with_scale_factor(scale)
        .for_export();
    let mut renderer = RasterRenderer::new(width, height)?;
    renderer.build_scene(&ctx);
    log::debug!("rendered template at {width}x{height}");
    Ok(renderer.result())
}
