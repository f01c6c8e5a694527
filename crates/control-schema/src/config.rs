//! Library-wide settings.
//!
//! [`SchemaSettings`] holds the defaults that descriptor normalization fills in
//! when a descriptor leaves a key absent. Settings are installed once at
//! startup and read by every control during initialization:
//!
//! ```no_run
//! use control_schema::config::{self, SchemaSettings};
//!
//! let settings = SchemaSettings::from_toml_file("control-schema.toml")?;
//! config::install(settings);
//! # Ok::<(), control_schema::ConfigurationError>(())
//! ```
//!
//! A settings file only needs the keys it overrides:
//!
//! ```toml
//! min_width = "20em"
//! default_icon_name = "help"
//! appearance = "outline"
//! ```

use std::path::Path;
use std::sync::Arc;

use control_schema_core::logging::targets;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::content::{Appearance, TextAlign};
use crate::error::{ConfigurationError, Result};

/// Default minimum width of every control.
pub const DEFAULT_MIN_WIDTH: &str = "15em";

/// Default icon name used when an icon descriptor names none.
pub const DEFAULT_ICON_NAME: &str = "info";

/// Defaults applied during descriptor normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Minimum width given to descriptors without one.
    pub min_width: String,
    /// Icon name given to icon descriptors without one.
    pub default_icon_name: String,
    /// Appearance given to input descriptors without one.
    pub appearance: Appearance,
    /// Text alignment given to descriptors without one.
    pub text_align: TextAlign,
    /// Overrides each input kind's "always show a hint" behavior when set.
    pub always_hint: Option<bool>,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH.to_owned(),
            default_icon_name: DEFAULT_ICON_NAME.to_owned(),
            appearance: Appearance::default(),
            text_align: TextAlign::default(),
            always_hint: None,
        }
    }
}

impl SchemaSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigurationError::settings_io(path, source))?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loading settings");
        Self::from_toml_str(&text)
    }

    /// Parse settings from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(ConfigurationError::SettingsJson)
    }

    /// Serialize the settings as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

static SETTINGS: RwLock<Option<Arc<SchemaSettings>>> = RwLock::new(None);

/// Install the settings used by controls initialized from now on.
pub fn install(settings: SchemaSettings) {
    tracing::debug!(target: targets::CONFIG, ?settings, "installing settings");
    *SETTINGS.write() = Some(Arc::new(settings));
}

/// Restore the built-in defaults.
pub fn reset() {
    *SETTINGS.write() = None;
}

/// The settings currently in effect.
pub fn current() -> Arc<SchemaSettings> {
    SETTINGS
        .read()
        .clone()
        .unwrap_or_else(|| Arc::new(SchemaSettings::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SchemaSettings::default();
        assert_eq!(settings.min_width, "15em");
        assert_eq!(settings.default_icon_name, "info");
        assert_eq!(settings.appearance, Appearance::Standard);
        assert_eq!(settings.text_align, TextAlign::Left);
        assert_eq!(settings.always_hint, None);
    }

    #[test]
    fn test_partial_toml() {
        let settings = SchemaSettings::from_toml_str(
            r#"
            min_width = "20em"
            appearance = "outline"
            always_hint = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.min_width, "20em");
        assert_eq!(settings.appearance, Appearance::Outline);
        assert_eq!(settings.always_hint, Some(false));
        assert_eq!(settings.default_icon_name, "info");
    }

    #[test]
    fn test_json() {
        let settings =
            SchemaSettings::from_json_str(r#"{ "text_align": "right", "default_icon_name": "help" }"#)
                .unwrap();
        assert_eq!(settings.text_align, TextAlign::Right);
        assert_eq!(settings.default_icon_name, "help");
        assert_eq!(settings.min_width, "15em");
    }

    #[test]
    fn test_invalid_toml() {
        let result = SchemaSettings::from_toml_str("min_width = 3");
        assert!(matches!(result, Err(ConfigurationError::SettingsToml(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = SchemaSettings {
            min_width: "10em".into(),
            ..Default::default()
        };
        let parsed = SchemaSettings::from_toml_str(&settings.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
