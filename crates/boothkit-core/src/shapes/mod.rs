//! Shapes placed on the paper: picture placeholders, bitmaps and the
//! background.

mod color;

pub use color::SerializableColor;

use crate::geometry::BoundingBox;
use crate::paper::Paper;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a shape within a store.
pub type ShapeId = String;

/// Reserved id of the background shape.
pub const BACKGROUND_ID: &str = "pic-background";

/// Size of a freshly uploaded picture.
pub const DEFAULT_PICTURE_WIDTH: f64 = 100.0;
pub const DEFAULT_PICTURE_HEIGHT: f64 = 100.0;

/// Smallest width/height a shape may be resized to.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Fill used for placeholders that don't carry their own color.
pub const DEFAULT_PLACEHOLDER_COLOR: SerializableColor = SerializableColor::rgb(0xe5, 0xe7, 0xeb);

/// Fill of the paper behind every shape.
pub const DEFAULT_PAPER_COLOR: SerializableColor = SerializableColor::white();

/// What a shape shows inside its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeContent {
    /// Solid fill with the label's initials on top.
    Placeholder { color: SerializableColor },
    /// An image loaded from an opaque source (path, URL or data URL).
    Bitmap { source: String },
}

impl Default for ShapeContent {
    fn default() -> Self {
        ShapeContent::Placeholder {
            color: DEFAULT_PLACEHOLDER_COLOR,
        }
    }
}

/// A positioned rectangle on the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub bounds: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub content: ShapeContent,
}

impl Shape {
    /// A placeholder shape with the given fill.
    pub fn placeholder(id: impl Into<ShapeId>, bounds: BoundingBox, color: SerializableColor) -> Self {
        Self {
            id: id.into(),
            bounds,
            label: None,
            content: ShapeContent::Placeholder { color },
        }
    }

    /// A shape showing the image at `source`.
    pub fn bitmap(id: impl Into<ShapeId>, bounds: BoundingBox, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bounds,
            label: None,
            content: ShapeContent::Bitmap {
                source: source.into(),
            },
        }
    }

    /// The background shape covering the whole paper.
    pub fn background(paper: Paper, content: ShapeContent) -> Self {
        Self {
            id: BACKGROUND_ID.to_string(),
            bounds: paper.bounds(),
            label: Some("Background".to_string()),
            content,
        }
    }

    /// Generate a fresh id for a user-added picture.
    pub fn new_picture_id() -> ShapeId {
        format!("pic-{}", Uuid::new_v4())
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_background(&self) -> bool {
        self.id == BACKGROUND_ID
    }

    /// Image source, if this shape shows a bitmap.
    pub fn source(&self) -> Option<&str> {
        match &self.content {
            ShapeContent::Bitmap { source } => Some(source),
            ShapeContent::Placeholder { .. } => None,
        }
    }

    /// Fill drawn while no bitmap is available.
    pub fn placeholder_color(&self) -> SerializableColor {
        match &self.content {
            ShapeContent::Placeholder { color } => *color,
            ShapeContent::Bitmap { .. } => DEFAULT_PLACEHOLDER_COLOR,
        }
    }

    /// Up to two uppercase initials taken from the label, `IMG` otherwise.
    pub fn initials(&self) -> String {
        let initials: String = self
            .label
            .as_deref()
            .unwrap_or("IMG")
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "IMG".to_string()
        } else {
            initials
        }
    }

    /// Check if a paper-space point falls inside the shape.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds.to_rect().inflate(tolerance, tolerance).contains(point)
    }
}
