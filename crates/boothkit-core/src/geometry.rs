//! Axis-aligned bounding boxes on the paper canvas.
//!
//! Coordinates have their origin at the top-left of the paper with Y growing
//! downwards. All helpers are pure and total for boxes with positive size.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle described by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a box from a kurbo rectangle (normalized first).
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Convert to a kurbo rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// X coordinate of the right edge.
    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom_edge(&self) -> f64 {
        self.y + self.height
    }

    /// Same size, new top-left corner.
    pub fn with_origin(&self, x: f64, y: f64) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    /// Same size, moved by a delta.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        self.with_origin(self.x + dx, self.y + dy)
    }

    /// Check if the box lies entirely inside `bounds` (edges may touch).
    pub fn is_within(&self, bounds: &BoundingBox) -> bool {
        self.x >= bounds.x
            && self.y >= bounds.y
            && self.right_edge() <= bounds.right_edge()
            && self.bottom_edge() <= bounds.bottom_edge()
    }

    /// Check if the interiors of two boxes intersect.
    ///
    /// Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x < other.right_edge()
            && other.x < self.right_edge()
            && self.y < other.bottom_edge()
            && other.y < self.bottom_edge()
    }

    /// Move (and if necessary shrink) the box so it lies inside `bounds`.
    ///
    /// The size is limited to the size of `bounds` first, then the origin is
    /// pushed back inside. Applying it twice yields the same box.
    pub fn clamp_to(&self, bounds: &BoundingBox) -> BoundingBox {
        let width = self.width.min(bounds.width);
        let height = self.height.min(bounds.height);
        let x = self.x.min(bounds.right_edge() - width).max(bounds.x);
        let y = self.y.min(bounds.bottom_edge() - height).max(bounds.y);
        BoundingBox::new(x, y, width, height)
    }

    /// Round every field to whole pixels.
    pub fn round(&self) -> BoundingBox {
        BoundingBox::new(
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round(),
        )
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl From<BoundingBox> for Rect {
    fn from(bounds: BoundingBox) -> Self {
        bounds.to_rect()
    }
}

/// Check if a box sits inside the safe area `margin` away from every edge of
/// a `width` x `height` sheet.
pub fn is_within_margins(bounds: &BoundingBox, width: f64, height: f64, margin: f64) -> bool {
    bounds.x >= margin
        && bounds.y >= margin
        && bounds.right_edge() <= width - margin
        && bounds.bottom_edge() <= height - margin
}
