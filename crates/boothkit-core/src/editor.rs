//! Editor state container.
//!
//! `Editor` owns everything one editing session mutates: the shape store,
//! selection, the in-progress drag, alignment guides and the viewport. UI
//! code holds it by reference and goes through its methods; there is no
//! ambient global state.

use crate::config::EditorConfig;
use crate::distribute::{DistributeOptions, distribute};
use crate::geometry::BoundingBox;
use crate::input::{InputState, KeyEvent, MouseButton, PointerEvent};
use crate::paper::{Orientation, Paper};
use crate::presets::{PresetError, initial_pictures};
use crate::shapes::{
    DEFAULT_PAPER_COLOR, DEFAULT_PICTURE_HEIGHT, DEFAULT_PICTURE_WIDTH, DEFAULT_PLACEHOLDER_COLOR,
    MIN_SHAPE_SIZE, SerializableColor, Shape, ShapeContent, ShapeId,
};
use crate::snap::{AlignmentGuides, SnapResult, snap};
use crate::store::{ShapeStore, StoreError, StoreResult};
use crate::template::{Template, TemplateInfo, TemplateResult};
use crate::viewport::Viewport;
use kurbo::Point;
use std::collections::HashSet;
use thiserror::Error;

/// Key that cancels the current drag and clears the selection.
pub const CANCEL_KEY: &str = "Escape";

/// Errors from building an editor out of a preset layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error("preset layout rejected: {0}")]
    Store(#[from] StoreError),
}

/// A shape being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub id: ShapeId,
    /// Box when the drag started.
    pub origin: BoundingBox,
    /// Unsnapped box following the pointer.
    pub raw: BoundingBox,
    /// Snapped box shown to the user; committed on drop.
    pub preview: BoundingBox,
}

/// Runtime editor state.
#[derive(Debug, Clone)]
pub struct Editor {
    paper: Paper,
    pub config: EditorConfig,
    pub info: TemplateInfo,
    paper_color: SerializableColor,
    store: ShapeStore,
    viewport: Viewport,
    input: InputState,
    selection: Option<ShapeId>,
    drag: Option<DragState>,
    guides: AlignmentGuides,
}

impl Editor {
    /// Create an empty editor for a paper of `orientation`.
    pub fn new(orientation: Orientation, config: EditorConfig) -> Self {
        let paper = Paper::for_orientation(orientation);
        Self {
            paper,
            viewport: Viewport::new(paper, config.zoom),
            config,
            info: TemplateInfo {
                orientation,
                ..TemplateInfo::default()
            },
            paper_color: DEFAULT_PAPER_COLOR,
            store: ShapeStore::new(),
            input: InputState::new(),
            selection: None,
            drag: None,
            guides: AlignmentGuides::default(),
        }
    }

    /// Create an editor populated with the preset layout for `count` pictures.
    pub fn from_preset(count: usize, orientation: Orientation, config: EditorConfig) -> Result<Self, EditorError> {
        let mut editor = Self::new(orientation, config);
        let shapes = initial_pictures(count, orientation)?;
        editor.store.replace_all(shapes)?;
        Ok(editor)
    }

    /// Open a saved template.
    pub fn from_template(template: &Template, config: EditorConfig) -> TemplateResult<Self> {
        let mut editor = Self::new(template.info.orientation, config);
        editor.store = template.to_store()?;
        editor.info = template.info.clone();
        editor.paper_color = template.paper_color;
        Ok(editor)
    }

    /// Capture the current state as a template.
    pub fn to_template(&self) -> Template {
        let mut template = Template::new(self.info.clone());
        template.paper_color = self.paper_color;
        template.shapes = self.store.iter().cloned().collect();
        template
    }

    pub fn paper(&self) -> Paper {
        self.paper
    }

    pub fn paper_color(&self) -> SerializableColor {
        self.paper_color
    }

    pub fn set_paper_color(&mut self, color: SerializableColor) {
        self.paper_color = color;
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Alignment guides for the current frame.
    pub fn guides(&self) -> &AlignmentGuides {
        &self.guides
    }

    /// Box to draw for `shape`, taking an in-progress drag into account.
    pub fn display_bounds(&self, shape: &Shape) -> BoundingBox {
        match &self.drag {
            Some(drag) if drag.id == shape.id => drag.preview,
            _ => shape.bounds,
        }
    }

    /// Select a shape.
    pub fn select(&mut self, id: &str) -> StoreResult<()> {
        if !self.store.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.selection = Some(id.to_string());
        Ok(())
    }

    /// Clear the selection and any open guides. The viewport is untouched.
    pub fn deselect(&mut self) {
        self.selection = None;
        self.drag = None;
        self.guides.clear();
    }

    /// Start dragging shape `id` (selecting it).
    pub fn begin_drag(&mut self, id: &str) -> StoreResult<()> {
        let bounds = self
            .store
            .get(id)
            .map(|s| s.bounds)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.selection = Some(id.to_string());
        self.drag = Some(DragState {
            id: id.to_string(),
            origin: bounds,
            raw: bounds,
            preview: bounds,
        });
        self.guides.clear();
        Ok(())
    }

    /// Move the dragged shape by a paper-space delta.
    ///
    /// Updates the preview box and guides; nothing is committed to the store.
    /// Returns `None` when no drag is active.
    pub fn drag_by(&mut self, dx: f64, dy: f64) -> Option<SnapResult> {
        let drag = self.drag.as_mut()?;
        drag.raw = drag.raw.translate(dx, dy);
        let result = if self.config.enable_snapping {
            let others = self.store.other_bounds(&drag.id);
            snap(drag.raw, &others, self.paper, &self.config.snap)
        } else {
            SnapResult::none(drag.raw, self.paper)
        };
        log::trace!("drag {} raw={:?} preview={:?}", drag.id, drag.raw, result.bounds);
        drag.preview = result.bounds;
        self.guides = result.guides;
        Some(result)
    }

    /// Drop the dragged shape, committing its snapped box.
    ///
    /// Returns the committed box, or `None` when no drag was active.
    pub fn end_drag(&mut self) -> StoreResult<Option<BoundingBox>> {
        let Some(drag) = self.drag.take() else {
            return Ok(None);
        };
        self.guides.clear();
        let committed = self.store.update_by_id(&drag.id, drag.preview.into())?;
        log::debug!("dropped {} at ({}, {})", drag.id, committed.x, committed.y);
        Ok(Some(committed))
    }

    /// Abandon the drag; the store keeps the pre-drag box.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
        self.guides.clear();
    }

    /// Move shape `id` to `target` through the snap engine and commit.
    pub fn place_shape(&mut self, id: &str, target: BoundingBox) -> StoreResult<SnapResult> {
        if !self.store.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let result = if self.config.enable_snapping {
            snap(target, &self.store.other_bounds(id), self.paper, &self.config.snap)
        } else {
            SnapResult::none(target, self.paper)
        };
        self.store.update_by_id(id, result.bounds.into())?;
        Ok(result)
    }

    /// Resize shape `id`, keeping its origin.
    ///
    /// A size below the minimum on either axis is rejected and the current
    /// box is returned unchanged.
    pub fn resize_shape(&mut self, id: &str, width: f64, height: f64) -> StoreResult<BoundingBox> {
        let current = self
            .store
            .get(id)
            .map(|s| s.bounds)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !(width >= MIN_SHAPE_SIZE && height >= MIN_SHAPE_SIZE) {
            log::debug!("ignoring resize of {id} to {width}x{height}");
            return Ok(current);
        }
        let resized = BoundingBox::new(current.x, current.y, width, height).clamp_to(&self.paper.bounds());
        self.store.update_by_id(id, resized.into())
    }

    /// Re-tile every picture into an even grid in one commit.
    pub fn distribute(&mut self, columns: Option<usize>) -> StoreResult<()> {
        let options = DistributeOptions {
            columns,
            ..self.config.distribute
        };
        let pictures: Vec<Shape> = self.store.pictures().cloned().collect();
        let placed = distribute(&pictures, self.paper, &options);
        self.cancel_drag();
        self.store.replace_all(placed)
    }

    /// Show the image at `source` as the background.
    pub fn set_background_image(&mut self, source: impl Into<String>) {
        let content = ShapeContent::Bitmap {
            source: source.into(),
        };
        self.store.upsert_background(Shape::background(self.paper, content));
    }

    /// Fill the background with a solid color.
    pub fn set_background_color(&mut self, color: SerializableColor) {
        self.store
            .upsert_background(Shape::background(self.paper, ShapeContent::Placeholder { color }));
    }

    pub fn remove_background(&mut self) -> Option<Shape> {
        let id = self.store.background()?.id.clone();
        self.remove_shape(&id)
    }

    /// Add an uploaded image as a default-sized picture centered on the paper.
    pub fn add_picture(&mut self, source: impl Into<String>) -> StoreResult<ShapeId> {
        let id = Shape::new_picture_id();
        let shape = Shape::bitmap(id.clone(), self.centered_default_box(), source);
        self.store.add(shape)?;
        log::debug!("added picture {id}");
        Ok(id)
    }

    /// Add an empty placeholder picture centered on the paper.
    pub fn add_placeholder(&mut self, label: Option<String>) -> StoreResult<ShapeId> {
        let id = Shape::new_picture_id();
        let mut shape = Shape::placeholder(id.clone(), self.centered_default_box(), DEFAULT_PLACEHOLDER_COLOR);
        shape.label = label;
        self.store.add(shape)?;
        Ok(id)
    }

    /// Remove a shape, dropping selection and drag that refer to it.
    pub fn remove_shape(&mut self, id: &str) -> Option<Shape> {
        if self.selection.as_deref() == Some(id) {
            self.deselect();
        }
        self.store.remove(id)
    }

    /// Image sources referenced by the current shapes.
    pub fn image_sources(&self) -> HashSet<&str> {
        self.store.iter().filter_map(Shape::source).collect()
    }

    /// Topmost picture under a paper-space point. The background is never hit.
    pub fn hit_test(&self, point: Point) -> Option<&Shape> {
        self.store.pictures().filter(|s| s.hit_test(point, 0.0)).last()
    }

    /// Route a pointer event to panning, dragging or selection.
    ///
    /// Returns `true` when the frame needs to be redrawn.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        let previous = self.input.pointer_position;
        self.input.handle_pointer_event(event);

        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                if self.input.pan_engaged() {
                    self.viewport.begin_pan(position);
                    return false;
                }
                let paper_point = self.viewport.screen_to_paper(position);
                match self.hit_test(paper_point).map(|s| s.id.clone()) {
                    Some(id) => self.begin_drag(&id).is_ok(),
                    None => {
                        let had_selection = self.selection.is_some();
                        self.deselect();
                        had_selection
                    }
                }
            }
            PointerEvent::Move { position } => {
                if self.viewport.is_panning() {
                    return self.viewport.drag_pan(position);
                }
                if self.drag.is_some() && self.input.is_button_pressed(MouseButton::Left) {
                    let delta = self.viewport.screen_delta_to_paper(position - previous);
                    return self.drag_by(delta.x, delta.y).is_some();
                }
                false
            }
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => {
                if self.viewport.is_panning() {
                    self.viewport.end_pan();
                    return false;
                }
                match self.end_drag() {
                    Ok(committed) => committed.is_some(),
                    Err(e) => {
                        log::warn!("drop failed: {e}");
                        true
                    }
                }
            }
            PointerEvent::Wheel { .. } => {
                let before = self.viewport.zoom();
                let delta = self.input.take_wheel();
                self.viewport.zoom_by_wheel(delta.y) != before
            }
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => false,
        }
    }

    /// Route a key event. Returns `true` when the frame needs to be redrawn.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        self.input.handle_key_event(event);
        match event {
            KeyEvent::Pressed(key) if key == CANCEL_KEY => {
                let changed = self.selection.is_some() || self.drag.is_some();
                self.deselect();
                changed
            }
            KeyEvent::Released(key) if key == crate::input::PAN_KEY => {
                self.viewport.end_pan();
                false
            }
            _ => false,
        }
    }

    /// Return to a blank session on the same paper and config.
    pub fn reset(&mut self) {
        self.store.clear();
        self.info = TemplateInfo {
            orientation: self.info.orientation,
            ..TemplateInfo::default()
        };
        self.paper_color = DEFAULT_PAPER_COLOR;
        self.selection = None;
        self.drag = None;
        self.guides.clear();
        self.input.release_all();
        self.viewport.reset();
    }

    fn centered_default_box(&self) -> BoundingBox {
        BoundingBox::new(
            (self.paper.width - DEFAULT_PICTURE_WIDTH) / 2.0,
            (self.paper.height - DEFAULT_PICTURE_HEIGHT) / 2.0,
            DEFAULT_PICTURE_WIDTH,
            DEFAULT_PICTURE_HEIGHT,
        )
    }
}
