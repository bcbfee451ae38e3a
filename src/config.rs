//! Configuration types and validation for editing and signing
//! Created: 2025-06-11

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Size;
use crate::types::{DEFAULT_FIELD_SIZE, MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH};

/// Editor defaults for field creation, resize floors and zoom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub default_field_width: f64,
    pub default_field_height: f64,
    pub min_field_width: f64,
    pub min_field_height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

/// Appearance of rendered text fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Standard 14 font name
    pub font: String,
    pub font_size: f64,
    /// Left inset of the label inside its box
    pub padding: f64,
    pub border_width: f64,
}

/// Global signing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub editor: EditorConfig,
    pub text: TextStyle,
    /// Draw bordered boxes for `text` fields alongside signatures
    pub render_text_fields: bool,
    /// Recorded on audit records when the caller does not name the file
    pub default_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_field_width: DEFAULT_FIELD_SIZE.width,
            default_field_height: DEFAULT_FIELD_SIZE.height,
            min_field_width: MIN_FIELD_WIDTH,
            min_field_height: MIN_FIELD_HEIGHT,
            min_zoom: 0.5,
            max_zoom: 2.0,
            zoom_step: 0.1,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Helvetica".into(),
            font_size: 12.0,
            padding: 5.0,
            border_width: 1.0,
        }
    }
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            text: TextStyle::default(),
            render_text_fields: true,
            default_file_name: "document.pdf".into(),
        }
    }
}

impl EditorConfig {
    pub fn default_field_size(&self) -> Size {
        Size::new(self.default_field_width, self.default_field_height)
    }

    /// Every bound must be a finite number, so NaN never gets past here.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.min_field_width) || !positive(self.min_field_height) {
            return Err(Error::ConfigError("Minimum field size must be positive".into()));
        }
        if !(self.default_field_width >= self.min_field_width
            && self.default_field_height >= self.min_field_height)
        {
            return Err(Error::ConfigError(
                "Default field size is below the resize minimum".into(),
            ));
        }
        if !positive(self.min_zoom) || !positive(self.max_zoom) || self.min_zoom > self.max_zoom {
            return Err(Error::ConfigError("Zoom bounds are inverted or non-positive".into()));
        }
        if !positive(self.zoom_step) {
            return Err(Error::ConfigError("Zoom step must be positive".into()));
        }
        Ok(())
    }
}

impl TextStyle {
    pub fn validate(&self) -> Result<()> {
        if self.font.trim().is_empty() {
            return Err(Error::ConfigError("Text font name is empty".into()));
        }
        if self.font_size <= 0.0 {
            return Err(Error::ConfigError("Text font size must be positive".into()));
        }
        if self.padding < 0.0 || self.border_width < 0.0 {
            return Err(Error::ConfigError("Text padding and border must not be negative".into()));
        }
        Ok(())
    }
}

impl SigningConfig {
    pub fn validate(&self) -> Result<()> {
        self.editor.validate()?;
        self.text.validate()
    }

    /// Parses JSON, falling back to YAML.
    pub fn parse(content: &str) -> Result<Self> {
        let config: SigningConfig = serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| Error::ConfigError(format!("Config parsing error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| {
                Error::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
            })?;
        debug!("Loaded configuration from {}", path.display());
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SigningConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.editor.default_field_size(), Size::new(150.0, 40.0));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config =
            SigningConfig::parse("render_text_fields: false\ntext:\n  font_size: 9\n").unwrap();

        assert!(!config.render_text_fields);
        assert_eq!(config.text.font_size, 9.0);
        assert_eq!(config.text.font, "Helvetica");
        assert_eq!(config.editor.min_field_width, 50.0);
    }

    #[test]
    fn test_json_config() {
        let config = SigningConfig::parse(r#"{"editor": {"max_zoom": 3.0}}"#).unwrap();
        assert_eq!(config.editor.max_zoom, 3.0);
    }

    #[test]
    fn test_rejects_inverted_zoom() {
        let err = SigningConfig::parse(r#"{"editor": {"min_zoom": 2.5}}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_rejects_nan_zoom_bounds() {
        let config = EditorConfig {
            max_zoom: f64::NAN,
            ..EditorConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let config = EditorConfig {
            zoom_step: f64::NAN,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_default_below_minimum() {
        let mut config = SigningConfig::default();
        config.editor.default_field_height = 10.0;
        assert!(config.validate().is_err());
    }
}
