//! Error types for the form model.

/// Result type alias for form model operations.
pub type Result<T> = std::result::Result<T, SectionError>;

/// Errors raised when a value does not fit the shape of a form section.
///
/// These are configuration mistakes of the caller. Rule failures of a value
/// are reported through [`ValidationErrors`](crate::validator::ValidationErrors)
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    /// A child expected by the section was not supplied, or does not exist.
    #[error("Cannot find form control with name '{name}'")]
    MissingControl { name: String },

    /// The value has a different shape than the section.
    #[error("Expected a {expected} value, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A list index is outside the list.
    #[error("Index {index} is out of range for a list of {len} controls")]
    IndexOutOfRange { index: usize, len: usize },
}

impl SectionError {
    /// Create a missing-control error.
    pub fn missing_control(name: impl Into<String>) -> Self {
        Self::MissingControl { name: name.into() }
    }

    /// Create a shape-mismatch error.
    pub fn shape_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::ShapeMismatch { expected, found }
    }
}
