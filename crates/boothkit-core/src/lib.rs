//! BoothKit Core Library
//!
//! Platform-agnostic geometry and editor state for photo-booth template
//! layouts: shapes on a fixed-size paper, snapping, even distribution and
//! the pan/zoom viewport.

pub mod config;
pub mod distribute;
pub mod editor;
pub mod geometry;
pub mod images;
pub mod input;
pub mod paper;
pub mod presets;
pub mod shapes;
pub mod snap;
pub mod store;
pub mod template;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use distribute::{DistributeOptions, GRID_MARGIN, GridLayout, distribute};
pub use editor::{DragState, Editor, EditorError};
pub use geometry::{BoundingBox, is_within_margins};
pub use images::{Bitmap, ImageCache, ImageError, ImageLoader, ImageSource, ImageStatus, MemoryImageLoader};
pub use input::{InputState, KeyEvent, MouseButton, PointerEvent};
pub use paper::{Orientation, Paper, paper_dimensions};
pub use presets::{PresetError, initial_pictures};
pub use shapes::{BACKGROUND_ID, SerializableColor, Shape, ShapeContent, ShapeId};
pub use snap::{AlignmentGuides, SnapConfig, SnapKind, SnapResult, snap, snap_to_grid};
pub use store::{BoxPatch, ShapeStore, StoreError, StoreResult};
pub use template::{Template, TemplateError, TemplateInfo};
pub use viewport::{Viewport, ZoomLimits};
