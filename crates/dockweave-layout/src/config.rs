#![forbid(unsafe_code)]

//! Tunable layout parameters.
//!
//! A [`DockConfig`] can be built in code or loaded from TOML or JSON. Every
//! field is optional in the document and falls back to its default.
//!
//! ```toml
//! # dockweave.toml
//! round_off_tolerance = 0.1
//! default_dock_side = "Right"
//!
//! [minimum_pane_size]
//! width = 50.0
//! height = 50.0
//! ```
//!
//! ```rust,ignore
//! let config = DockConfig::from_toml_file("dockweave.toml")?;
//! let panel = DockingPanel::with_config(config);
//! ```

use std::path::Path;

use dockweave_core::{Side, Size};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest extent a visible pane is laid out at, per axis.
pub const DEFAULT_MINIMUM_PANE_SIZE: Size = Size::new(75.0, 75.0);

/// Size assumed when a measure pass is given an unbounded constraint.
pub const DEFAULT_UNBOUNDED_MEASURE_FALLBACK: Size = Size::new(800.0, 600.0);

/// Layout configuration for one [`DockingPanel`](crate::panel::DockingPanel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Floor applied to every visible pane's extent.
    pub minimum_pane_size: Size,

    /// Differences below this are treated as equal.
    pub round_off_tolerance: f64,

    /// Stand-in for an infinite measure constraint.
    pub unbounded_measure_fallback: Size,

    /// Check every arrange result for gaps and overflow. Only honored in
    /// debug builds.
    pub debug_validation: bool,

    /// Where panes added without any neighbor are docked.
    pub default_dock_side: Side,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            minimum_pane_size: DEFAULT_MINIMUM_PANE_SIZE,
            round_off_tolerance: 0.1,
            unbounded_measure_fallback: DEFAULT_UNBOUNDED_MEASURE_FALLBACK,
            debug_validation: true,
            default_dock_side: Side::Bottom,
        }
    }
}

impl DockConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Same config with a different minimum pane size.
    #[must_use]
    pub fn with_minimum_pane_size(mut self, size: Size) -> Self {
        self.minimum_pane_size = size;
        self
    }

    #[must_use]
    pub fn with_default_dock_side(mut self, side: Side) -> Self {
        self.default_dock_side = side;
        self
    }

    /// Whether post-arrange validation runs in this build.
    #[inline]
    pub fn validation_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.debug_validation
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("minimum_pane_size.width", self.minimum_pane_size.width),
            ("minimum_pane_size.height", self.minimum_pane_size.height),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        if !self.round_off_tolerance.is_finite() || self.round_off_tolerance < 0.0 {
            errors.push(format!(
                "round_off_tolerance must be finite and >= 0, got {}",
                self.round_off_tolerance
            ));
        }

        let fallback = self.unbounded_measure_fallback;
        if !fallback.is_finite() || fallback.width <= 0.0 || fallback.height <= 0.0 {
            errors.push(format!(
                "unbounded_measure_fallback must be finite and > 0, got {}x{}",
                fallback.width, fallback.height
            ));
        }

        errors
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates_clean() {
        assert!(DockConfig::default().validate().is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = DockConfig::from_toml_str(
            r#"
            default_dock_side = "Right"

            [minimum_pane_size]
            width = 50.0
            height = 40.0
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.default_dock_side, Side::Right);
        assert_eq!(config.minimum_pane_size, Size::new(50.0, 40.0));
        assert_eq!(config.round_off_tolerance, 0.1);
        assert!(config.debug_validation);
    }

    #[test]
    fn json_round_trips() {
        let config = DockConfig::default().with_default_dock_side(Side::Left);
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(DockConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn bad_values_are_collected() {
        let mut config = DockConfig::default();
        config.minimum_pane_size.width = -1.0;
        config.round_off_tolerance = f64::NAN;
        config.unbounded_measure_fallback = Size::new(0.0, 10.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn invalid_document_is_rejected() {
        let err = DockConfig::from_json_str(r#"{"round_off_tolerance": -2.0}"#)
            .expect_err("negative tolerance");
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));

        let err = DockConfig::from_toml_str("minimum_pane_size = 3").expect_err("wrong type");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn file_loaders_read_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dock.toml");
        std::fs::write(&path, "debug_validation = false\n").expect("write");
        let config = DockConfig::from_toml_file(&path).expect("load");
        assert!(!config.debug_validation);
        assert!(!config.validation_enabled());

        let missing = DockConfig::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
