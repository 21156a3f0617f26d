//! Ordered shape collection with whole-snapshot commits.
//!
//! The store keeps its shapes in an `Arc<[Shape]>`. Every mutation builds a
//! new list and swaps it in, so anyone holding a [`Snapshot`] keeps seeing a
//! complete, consistent state. The background shape, when present, is always
//! the first entry.

use crate::geometry::BoundingBox;
use crate::shapes::{BACKGROUND_ID, Shape, ShapeContent, ShapeId};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Shape already exists: {0}")]
    DuplicateId(ShapeId),
    #[error("Shape not found: {0}")]
    NotFound(ShapeId),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An immutable view of the store at one point in time.
pub type Snapshot = Arc<[Shape]>;

/// Partial update of a bounding box; `None` fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl BoxPatch {
    /// Patch only the position.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch only the size.
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn apply(&self, bounds: BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.x.unwrap_or(bounds.x),
            self.y.unwrap_or(bounds.y),
            self.width.unwrap_or(bounds.width),
            self.height.unwrap_or(bounds.height),
        )
    }
}

impl From<BoundingBox> for BoxPatch {
    fn from(bounds: BoundingBox) -> Self {
        Self {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: Some(bounds.width),
            height: Some(bounds.height),
        }
    }
}

/// Ordered collection of shapes keyed by id.
#[derive(Debug, Clone)]
pub struct ShapeStore {
    shapes: Snapshot,
    revision: u64,
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            shapes: Arc::from(Vec::new()),
            revision: 0,
        }
    }

    /// Create a store from an initial list (background moved to the front).
    pub fn with_shapes(shapes: Vec<Shape>) -> StoreResult<Self> {
        ensure_unique(&shapes)?;
        let mut store = Self::new();
        let (background, mut pictures): (Vec<Shape>, Vec<Shape>) =
            shapes.into_iter().partition(Shape::is_background);
        if let Some(background) = background.into_iter().next() {
            pictures.insert(0, background);
        }
        store.commit(pictures);
        Ok(store)
    }

    /// The current snapshot (cheap to clone, never changes).
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.shapes)
    }

    /// Incremented on every committed mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Shapes in render order (background first).
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Shapes other than the background, in order.
    pub fn pictures(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| !s.is_background())
    }

    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn background(&self) -> Option<&Shape> {
        self.shapes.first().filter(|s| s.is_background())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Boxes of every shape except `id`, in store order.
    pub fn other_bounds(&self, id: &str) -> Vec<BoundingBox> {
        self.shapes
            .iter()
            .filter(|s| s.id != id)
            .map(|s| s.bounds)
            .collect()
    }

    /// Insert or replace the background shape.
    ///
    /// The shape's id is forced to [`BACKGROUND_ID`].
    pub fn upsert_background(&mut self, mut shape: Shape) {
        shape.id = BACKGROUND_ID.to_string();
        let mut next: Vec<Shape> = self.pictures().cloned().collect();
        next.insert(0, shape);
        self.commit(next);
    }

    /// Append a shape.
    pub fn add(&mut self, shape: Shape) -> StoreResult<()> {
        if self.contains(&shape.id) {
            return Err(StoreError::DuplicateId(shape.id));
        }
        if shape.is_background() {
            self.upsert_background(shape);
            return Ok(());
        }
        let mut next = self.shapes.to_vec();
        next.push(shape);
        self.commit(next);
        Ok(())
    }

    /// Merge `patch` into the box of shape `id` and return the new box.
    pub fn update_by_id(&mut self, id: &str, patch: BoxPatch) -> StoreResult<BoundingBox> {
        let mut updated = None;
        self.modify(id, |shape| {
            shape.bounds = patch.apply(shape.bounds);
            updated = Some(shape.bounds);
        })?;
        updated.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Replace what shape `id` shows.
    pub fn set_content(&mut self, id: &str, content: ShapeContent) -> StoreResult<()> {
        self.modify(id, |shape| shape.content = content)
    }

    /// Replace the label of shape `id`.
    pub fn set_label(&mut self, id: &str, label: Option<String>) -> StoreResult<()> {
        self.modify(id, |shape| shape.label = label)
    }

    /// Replace every non-background shape.
    ///
    /// The current background (if any) is kept and stays first; entries in
    /// `shapes` using the background id are ignored.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) -> StoreResult<()> {
        ensure_unique(&shapes)?;
        let mut next: Vec<Shape> = Vec::with_capacity(shapes.len() + 1);
        if let Some(background) = self.background() {
            next.push(background.clone());
        }
        for shape in shapes {
            if shape.is_background() {
                log::warn!("replace_all: ignoring entry with the reserved background id");
                continue;
            }
            next.push(shape);
        }
        self.commit(next);
        Ok(())
    }

    /// Remove a shape, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        let mut next = self.shapes.to_vec();
        let removed = next.remove(index);
        self.commit(next);
        Some(removed)
    }

    /// Remove every shape, background included.
    pub fn clear(&mut self) {
        self.commit(Vec::new());
    }

    fn modify(&mut self, id: &str, f: impl FnOnce(&mut Shape)) -> StoreResult<()> {
        let index = self
            .shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut next = self.shapes.to_vec();
        f(&mut next[index]);
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, shapes: Vec<Shape>) {
        self.shapes = Arc::from(shapes);
        self.revision += 1;
    }
}

fn ensure_unique(shapes: &[Shape]) -> StoreResult<()> {
    let mut seen = HashSet::with_capacity(shapes.len());
    for shape in shapes {
        if !seen.insert(shape.id.as_str()) {
            return Err(StoreError::DuplicateId(shape.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::Paper;
    use crate::shapes::DEFAULT_PLACEHOLDER_COLOR;

    fn pic(id: &str, x: f64) -> Shape {
        Shape::placeholder(id, BoundingBox::new(x, 10.0, 100.0, 100.0), DEFAULT_PLACEHOLDER_COLOR)
    }

    fn background() -> Shape {
        Shape::background(Paper::new(900.0, 600.0), ShapeContent::default())
    }

    fn ids(store: &ShapeStore) -> Vec<String> {
        store.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_add_and_get() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        store.add(pic("b", 200.0)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b").unwrap().bounds.x, 200.0);
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        let before = store.snapshot();
        let err = store.add(pic("a", 50.0)).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId("a".to_string()));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn test_upsert_background_is_first() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        store.upsert_background(background());
        assert_eq!(ids(&store), vec![BACKGROUND_ID, "a"]);

        let mut replacement = background();
        replacement.content = ShapeContent::Bitmap {
            source: "/bg.png".to_string(),
        };
        store.upsert_background(replacement);
        assert_eq!(store.len(), 2);
        assert_eq!(store.background().unwrap().source(), Some("/bg.png"));
    }

    #[test]
    fn test_upsert_background_forces_id() {
        let mut store = ShapeStore::new();
        store.upsert_background(pic("whatever", 0.0));
        assert!(store.background().is_some());
        assert!(!store.contains("whatever"));
    }

    #[test]
    fn test_add_background_id_goes_first() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        store.add(background()).unwrap();
        assert_eq!(ids(&store), vec![BACKGROUND_ID, "a"]);
    }

    #[test]
    fn test_update_by_id_merges() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        let updated = store.update_by_id("a", BoxPatch::position(40.0, 50.0)).unwrap();
        assert_eq!(updated, BoundingBox::new(40.0, 50.0, 100.0, 100.0));
        let resized = store.update_by_id("a", BoxPatch::size(20.0, 30.0)).unwrap();
        assert_eq!(resized, BoundingBox::new(40.0, 50.0, 20.0, 30.0));
    }

    #[test]
    fn test_update_missing_leaves_snapshot() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        let before = store.snapshot();
        let revision = store.revision();
        let err = store.update_by_id("nope", BoxPatch::position(1.0, 1.0)).unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope".to_string()));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_old_snapshot_unchanged_after_commit() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        let before = store.snapshot();
        store.update_by_id("a", BoxPatch::position(300.0, 300.0)).unwrap();
        assert_eq!(before[0].bounds.x, 0.0);
        assert_eq!(store.get("a").unwrap().bounds.x, 300.0);
    }

    #[test]
    fn test_replace_all_keeps_background() {
        let mut store = ShapeStore::new();
        store.upsert_background(background());
        store.add(pic("a", 0.0)).unwrap();

        let mut stray = background();
        stray.bounds = BoundingBox::new(1.0, 1.0, 1.0, 1.0);
        store
            .replace_all(vec![pic("x", 0.0), stray, pic("y", 10.0)])
            .unwrap();
        assert_eq!(ids(&store), vec![BACKGROUND_ID, "x", "y"]);
        assert_eq!(store.background().unwrap().bounds, Paper::new(900.0, 600.0).bounds());
    }

    #[test]
    fn test_replace_all_rejects_duplicates() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        let err = store.replace_all(vec![pic("x", 0.0), pic("x", 1.0)]).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId("x".to_string()));
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn test_with_shapes_moves_background_first() {
        let store = ShapeStore::with_shapes(vec![pic("a", 0.0), background()]).unwrap();
        assert_eq!(ids(&store), vec![BACKGROUND_ID, "a"]);
        assert_eq!(store.pictures().count(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        store.add(pic("b", 0.0)).unwrap();
        assert_eq!(store.remove("a").map(|s| s.id), Some("a".to_string()));
        assert!(store.remove("a").is_none());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_other_bounds_excludes_self() {
        let mut store = ShapeStore::new();
        store.upsert_background(background());
        store.add(pic("a", 0.0)).unwrap();
        store.add(pic("b", 200.0)).unwrap();
        let others = store.other_bounds("a");
        assert_eq!(others.len(), 2);
        assert_eq!(others[1].x, 200.0);
    }

    #[test]
    fn test_set_content_and_label() {
        let mut store = ShapeStore::new();
        store.add(pic("a", 0.0)).unwrap();
        store
            .set_content("a", ShapeContent::Bitmap { source: "x.png".into() })
            .unwrap();
        store.set_label("a", Some("Guest One".into())).unwrap();
        let shape = store.get("a").unwrap();
        assert_eq!(shape.source(), Some("x.png"));
        assert_eq!(shape.initials(), "GO");
        assert!(store.set_label("zz", None).is_err());
    }
}
