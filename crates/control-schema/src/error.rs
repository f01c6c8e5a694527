//! Error types for control configuration.

use std::path::PathBuf;

use crate::content::ControlKind;

/// Result type alias for control operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Errors that prevent a control from initializing.
///
/// These are programmer errors in a control's descriptor or wiring. They are
/// not retried: the control that raised one is not registered anywhere.
/// User-facing rule failures are not errors; see
/// [`ValidationErrors`](control_schema_core::ValidationErrors).
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// No descriptor was assigned to the control.
    #[error("For the '{control}' control, the 'content' value can not be undefined")]
    MissingContent { control: &'static str },

    /// The descriptor has no name.
    #[error("For the '{control}' control, the 'content.name' value can not be undefined")]
    MissingName { control: &'static str },

    /// The descriptor has no control type.
    #[error("For the '{name}' control, the 'content.controlType' value can not be undefined")]
    MissingControlType { name: String },

    /// Neither the descriptor nor the control supplies a label.
    #[error(
        "For the '{name}' control, the 'content.label' value can not be undefined; \
         specify a label in the descriptor or a default label in the control"
    )]
    MissingLabel { name: String },

    /// No value tracker could be resolved for an input control.
    #[error(
        "For the '{name}' control, the 'content.formControl' value can not be undefined; \
         it must be a value tracker"
    )]
    MissingTracker { name: String },

    /// The supplied value has the wrong type for the control.
    #[error("For the '{name}' control, the 'content.value' value must be of {expected} type")]
    InvalidValueType { name: String, expected: &'static str },

    /// A child of a list section is not named after its position.
    #[error("The '{name}' control is added to a list and must be named '{expected}'")]
    ListNameMismatch { name: String, expected: String },

    /// A group section already has a child with this name.
    #[error("The parent section already has a control named '{name}'")]
    DuplicateName { name: String },

    /// The control was initialized twice.
    #[error("The '{name}' control is already initialized")]
    AlreadyInitialized { name: String },

    /// The descriptor's kind of content does not match its control type.
    #[error("The '{name}' control can not be created as {control_type:?} from this content")]
    ContentMismatch {
        name: String,
        control_type: ControlKind,
    },

    /// A descriptor document could not be decoded.
    #[error("Invalid control descriptor: {0}")]
    Descriptor(#[source] serde_json::Error),

    /// A settings file could not be read.
    #[error("Failed to read settings '{path}': {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML settings document could not be parsed.
    #[error("Invalid TOML settings: {0}")]
    SettingsToml(#[from] toml::de::Error),

    /// Settings could not be written as TOML.
    #[error("Failed to serialize settings: {0}")]
    SettingsTomlSerialize(#[from] toml::ser::Error),

    /// A JSON settings document could not be parsed.
    #[error("Invalid JSON settings: {0}")]
    SettingsJson(#[source] serde_json::Error),
}

impl ConfigurationError {
    /// Create a missing-label error.
    pub fn missing_label(name: impl Into<String>) -> Self {
        Self::MissingLabel { name: name.into() }
    }

    /// Create a missing-tracker error.
    pub fn missing_tracker(name: impl Into<String>) -> Self {
        Self::MissingTracker { name: name.into() }
    }

    /// Create an invalid-value-type error.
    pub fn invalid_value_type(name: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValueType {
            name: name.into(),
            expected,
        }
    }

    /// Create a settings I/O error.
    pub fn settings_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SettingsIo {
            path: path.into(),
            source,
        }
    }
}
