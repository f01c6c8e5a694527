//! URL input.

use std::sync::LazyLock;

use control_schema_core::validator::PatternValidator;
use control_schema_core::{ValidatorSet, ValueTracker};
use regex::Regex;
use serde_json::json;

use super::required_or;
use crate::input::{FieldKind, InputControl, MessageContext};

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(https?|ftp)://[a-z0-9\-._~%]+(:[0-9]+)?(/[^\s]*)?$")
        .expect("URL pattern compiles")
});

/// An input for web addresses.
pub type UrlInput = InputControl<UrlKind>;

/// Field policy of [`UrlInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlKind;

impl FieldKind for UrlKind {
    const CONTROL_NAME: &'static str = "UrlInput";

    fn default_label(&self) -> Option<&str> {
        Some("URL")
    }

    fn is_abbreviation(&self) -> bool {
        true
    }

    fn default_tracker(&self) -> Option<ValueTracker> {
        Some(ValueTracker::new(
            json!(""),
            ValidatorSet::new().with(PatternValidator::from_regex(URL_PATTERN.clone())),
        ))
    }

    fn error_message(&self, context: MessageContext<'_>) -> String {
        required_or(context, "The URL is wrong.")
    }
}
