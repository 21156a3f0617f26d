//! Backend-independent display list for one frame.
//!
//! [`build_display_list`] turns the editor state into an ordered list of
//! draw commands in paper coordinates. Backends only have to know how to
//! fill rectangles, blit bitmaps, draw text and stroke lines.

use crate::renderer::{LineStyle, RenderContext, Renderer};
use boothkit_core::images::Bitmap;
use boothkit_core::shapes::Shape;
use boothkit_core::snap::MIN_GRID_SIZE;
use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;

/// Which part of the frame a command belongs to, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Paper,
    Shapes,
    Grid,
    Margins,
    Guides,
    Selection,
}

/// A single drawing operation in paper coordinates.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
        corner_radius: f64,
    },
    Image {
        rect: Rect,
        bitmap: Bitmap,
    },
    /// Bold text centered on `center`.
    Text {
        text: String,
        center: Point,
        font_size: f64,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        style: LineStyle,
    },
    StrokeRect {
        rect: Rect,
        style: LineStyle,
    },
}

#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub layer: Layer,
    pub command: DrawCommand,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone)]
pub struct DisplayList {
    /// Paper-to-surface transform.
    pub transform: Affine,
    /// Surface size in physical pixels.
    pub surface_size: Size,
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    fn new(transform: Affine, surface_size: Size) -> Self {
        Self {
            transform,
            surface_size,
            items: Vec::new(),
        }
    }

    fn push(&mut self, layer: Layer, command: DrawCommand) {
        self.items.push(DisplayItem { layer, command });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Commands on one layer, in draw order.
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.items
            .iter()
            .filter(move |item| item.layer == layer)
            .map(|item| &item.command)
    }

    pub fn count(&self, layer: Layer) -> usize {
        self.layer(layer).count()
    }
}

/// Corner radius of a placeholder fill.
pub fn placeholder_corner_radius(width: f64, height: f64) -> f64 {
    width.min(height) * 0.1
}

/// Font size of placeholder initials.
pub fn initials_font_size(width: f64, height: f64) -> f64 {
    (width.min(height) * 0.4).round()
}

/// Build the display list for the current editor frame.
pub fn build_display_list(ctx: &RenderContext) -> DisplayList {
    let editor = ctx.editor;
    let paper = editor.paper();
    let transform = if ctx.show_overlays {
        Affine::scale(ctx.scale_factor) * editor.viewport().transform()
    } else {
        Affine::scale(ctx.scale_factor)
    };
    let mut list = DisplayList::new(transform, ctx.viewport_size);

    list.push(
        Layer::Paper,
        DrawCommand::FillRect {
            rect: paper.bounds().to_rect(),
            color: editor.paper_color().into(),
            corner_radius: 0.0,
        },
    );

    for shape in editor.store().iter() {
        let rect = editor.display_bounds(shape).to_rect();
        push_shape(&mut list, ctx, shape, rect);
    }

    if !ctx.show_overlays {
        return list;
    }

    let config = &editor.config;
    let (width, height) = (paper.width, paper.height);

    let grid = config.snap.grid_size;
    if config.show_grid && grid >= MIN_GRID_SIZE {
        let mut x = 0.0;
        while x <= width {
            list.push(Layer::Grid, line(Point::new(x, 0.0), Point::new(x, height), &ctx.style.grid));
            x += grid;
        }
        let mut y = 0.0;
        while y <= height {
            list.push(Layer::Grid, line(Point::new(0.0, y), Point::new(width, y), &ctx.style.grid));
            y += grid;
        }
    }

    if config.show_margins {
        let m = config.snap.margin_size;
        let style = &ctx.style.margins;
        list.push(Layer::Margins, line(Point::new(0.0, m), Point::new(width, m), style));
        list.push(Layer::Margins, line(Point::new(0.0, height - m), Point::new(width, height - m), style));
        list.push(Layer::Margins, line(Point::new(m, 0.0), Point::new(m, height), style));
        list.push(Layer::Margins, line(Point::new(width - m, 0.0), Point::new(width - m, height), style));
    }

    if config.enable_snapping {
        let guides = editor.guides();
        if let Some(x) = guides.vertical {
            list.push(Layer::Guides, line(Point::new(x, 0.0), Point::new(x, height), &ctx.style.guides));
        }
        if let Some(y) = guides.horizontal {
            list.push(Layer::Guides, line(Point::new(0.0, y), Point::new(width, y), &ctx.style.guides));
        }
    }

    if let Some(shape) = editor.selection().and_then(|id| editor.store().get(id)) {
        list.push(
            Layer::Selection,
            DrawCommand::StrokeRect {
                rect: editor.display_bounds(shape).to_rect(),
                style: ctx.style.selection.clone(),
            },
        );
    }

    list
}

fn push_shape(list: &mut DisplayList, ctx: &RenderContext, shape: &Shape, rect: Rect) {
    if let Some(bitmap) = shape.source().and_then(|source| ctx.images.bitmap(source)) {
        list.push(
            Layer::Shapes,
            DrawCommand::Image {
                rect,
                bitmap: bitmap.clone(),
            },
        );
        return;
    }

    let (w, h) = (rect.width(), rect.height());
    let corner_radius = if shape.is_background() {
        0.0
    } else {
        placeholder_corner_radius(w, h)
    };
    list.push(
        Layer::Shapes,
        DrawCommand::FillRect {
            rect,
            color: shape.placeholder_color().into(),
            corner_radius,
        },
    );
    if !shape.is_background() {
        list.push(
            Layer::Shapes,
            DrawCommand::Text {
                text: shape.initials(),
                center: rect.center(),
                font_size: initials_font_size(w, h),
                color: ctx.style.initials_color,
            },
        );
    }
}

fn line(from: Point, to: Point, style: &LineStyle) -> DrawCommand {
    DrawCommand::Line {
        from,
        to,
        style: style.clone(),
    }
}

/// Renderer that keeps the last display list, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    last: Option<DisplayList>,
    frames: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently built frame.
    pub fn last_frame(&self) -> Option<&DisplayList> {
        self.last.as_ref()
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }
}

impl Renderer for RecordingRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.last = Some(build_display_list(ctx));
        self.frames += 1;
    }
}
