//! Template document: metadata plus the shapes of one layout.

use crate::paper::{Orientation, Paper};
use crate::shapes::{DEFAULT_PAPER_COLOR, SerializableColor, Shape};
use crate::store::{ShapeStore, StoreError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Descriptive fields of a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateInfo {
    pub template_name: String,
    pub event_name: String,
    pub orientation: Orientation,
    /// Reference to the event logo image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_logo: Option<String>,
}

impl TemplateInfo {
    pub fn new(template_name: impl Into<String>, event_name: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            template_name: template_name.into(),
            event_name: event_name.into(),
            orientation,
            event_logo: None,
        }
    }
}

/// A saved template layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(flatten)]
    pub info: TemplateInfo,
    #[serde(default = "default_paper_color")]
    pub paper_color: SerializableColor,
    /// Shapes in render order, background first when present.
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

fn default_paper_color() -> SerializableColor {
    DEFAULT_PAPER_COLOR
}

impl Template {
    /// Create an empty template.
    pub fn new(info: TemplateInfo) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            info,
            paper_color: DEFAULT_PAPER_COLOR,
            shapes: Vec::new(),
        }
    }

    /// Paper size implied by the orientation.
    pub fn paper(&self) -> Paper {
        Paper::for_orientation(self.info.orientation)
    }

    /// Build a shape store from the template's shapes.
    pub fn to_store(&self) -> TemplateResult<ShapeStore> {
        Ok(ShapeStore::with_shapes(self.shapes.clone())?)
    }

    /// Serialize the template to JSON.
    pub fn to_json(&self) -> TemplateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a template from JSON.
    pub fn from_json(json: &str) -> TemplateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> TemplateResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> TemplateResult<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("saved template {} to {}", self.id, path.display());
        Ok(())
    }
}
