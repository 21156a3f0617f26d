//! Editor configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Files are JSON.

use crate::distribute::DistributeOptions;
use crate::snap::{MIN_GRID_SIZE, SnapConfig};
use crate::viewport::ZoomLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub snap: SnapConfig,
    pub distribute: DistributeOptions,
    /// Master switch; when off, drops only clamp to the paper.
    pub enable_snapping: bool,
    pub show_grid: bool,
    pub show_margins: bool,
    pub zoom: ZoomLimits,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            distribute: DistributeOptions::default(),
            enable_snapping: true,
            show_grid: true,
            show_margins: true,
            zoom: ZoomLimits::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject values the engines cannot work with.
    ///
    /// Zero thresholds and grid sizes are allowed; they disable the stage.
    /// A non-zero grid must be at least [`MIN_GRID_SIZE`].
    pub fn validate(&self) -> ConfigResult<()> {
        let snap = &self.snap;
        if [snap.margin_size, snap.snap_threshold, snap.grid_size]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::Invalid(
                "snap sizes must be finite and non-negative".to_string(),
            ));
        }
        if snap.grid_size > 0.0 && snap.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid size {} is below the minimum of {MIN_GRID_SIZE}",
                snap.grid_size
            )));
        }
        if !self.distribute.margin.is_finite() || self.distribute.margin < 0.0 {
            return Err(ConfigError::Invalid(
                "distribute margin must be finite and non-negative".to_string(),
            ));
        }
        let zoom = &self.zoom;
        if !(zoom.min > 0.0 && zoom.min <= zoom.max && zoom.max.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..{} is invalid",
                zoom.min, zoom.max
            )));
        }
        if !(zoom.step > 1.0 && zoom.step.is_finite()) {
            return Err(ConfigError::Invalid("zoom step must be greater than 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.snap.margin_size, 40.0);
        assert_eq!(config.snap.snap_threshold, 10.0);
        assert_eq!(config.snap.grid_size, 20.0);
        assert_eq!(config.distribute.margin, 20.0);
        assert_eq!(config.zoom.min, 0.5);
        assert_eq!(config.zoom.max, 3.0);
        assert!(config.enable_snapping);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config =
            EditorConfig::from_json(r#"{"snap":{"grid_size":50.0},"show_grid":false}"#).unwrap();
        assert_eq!(config.snap.grid_size, 50.0);
        assert_eq!(config.snap.margin_size, 40.0);
        assert!(!config.show_grid);
        assert!(config.show_margins);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"snap":{"snap_threshold":-1.0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"zoom":{"min":2.0,"max":1.0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"zoom":{"step":1.0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_grid_size_floor() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"snap":{"grid_size":1e-6}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(EditorConfig::from_json(r#"{"snap":{"grid_size":0.0}}"#).is_ok());
        assert!(EditorConfig::from_json(r#"{"snap":{"grid_size":1.0}}"#).is_ok());
    }

    #[test]
    fn test_load_and_save() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"enable_snapping": false}}"#).unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert!(!config.enable_snapping);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);

        assert!(matches!(
            EditorConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
