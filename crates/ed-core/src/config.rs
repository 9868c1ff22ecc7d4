//! Drawing configuration.
//!
//! Loaded from JSON. Every field is optional and falls back to
//! `DrawingConfig::default()`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Laterality of the eye being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eye {
    #[default]
    Right,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    /// Doodle plane size. Doodle-local coordinates are centred on the plane.
    pub plane_width: f64,
    pub plane_height: f64,
    /// Canvas size in pixels.
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub eye: Eye,
    /// Mirror the whole plane horizontally when drawing a left eye.
    pub mirror_left_eye: bool,
    /// Handle hit radius in canvas pixels.
    pub handle_radius: f64,
    pub animation_ms: u32,
    pub undo_depth: usize,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            plane_width: 1001.0,
            plane_height: 1001.0,
            canvas_width: 500.0,
            canvas_height: 500.0,
            eye: Eye::Right,
            mirror_left_eye: false,
            handle_radius: 15.0,
            animation_ms: 200,
            undo_depth: 100,
        }
    }
}

impl DrawingConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("plane_width", self.plane_width),
            ("plane_height", self.plane_height),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.handle_radius.is_finite() && self.handle_radius >= 0.0) {
            return Err(ConfigError::InvalidConfig(format!(
                "handle_radius must be non-negative, got {}",
                self.handle_radius
            )));
        }
        Ok(())
    }

    /// The subset of the configuration doodles read while resolving.
    pub fn env(&self) -> DoodleEnv {
        DoodleEnv {
            plane_width: self.plane_width,
            plane_height: self.plane_height,
            eye: self.eye,
        }
    }
}

/// Read-only drawing context handed to shape code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoodleEnv {
    pub plane_width: f64,
    pub plane_height: f64,
    pub eye: Eye,
}

impl Default for DoodleEnv {
    fn default() -> Self {
        DrawingConfig::default().env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_uses_defaults() {
        let config = DrawingConfig::from_json(r#"{ "eye": "left", "animation_ms": 50 }"#).unwrap();
        assert_eq!(
            config,
            DrawingConfig {
                eye: Eye::Left,
                animation_ms: 50,
                ..DrawingConfig::default()
            }
        );
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DrawingConfig::from_json("{}").unwrap(), DrawingConfig::default());
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let err = DrawingConfig::from_json(r#"{ "plane_width": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(msg) if msg.contains("plane_width")));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            DrawingConfig::from_json("{ eye: "),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
