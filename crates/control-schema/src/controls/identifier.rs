//! Identifier input: letters, hyphens and underscores.

use std::sync::LazyLock;

use control_schema_core::validator::PatternValidator;
use control_schema_core::{ValidatorSet, ValueTracker};
use regex::Regex;
use serde_json::json;

use super::required_or;
use crate::input::{FieldKind, InputControl, MessageContext};

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\-_]*$").expect("identifier pattern compiles"));

/// An input for identifiers.
pub type IdentifierInput = InputControl<IdentifierKind>;

/// Field policy of [`IdentifierInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierKind;

impl FieldKind for IdentifierKind {
    const CONTROL_NAME: &'static str = "IdentifierInput";

    fn default_label(&self) -> Option<&str> {
        Some("Identifier")
    }

    fn default_tracker(&self) -> Option<ValueTracker> {
        Some(ValueTracker::new(
            json!(""),
            ValidatorSet::new().with(PatternValidator::from_regex(IDENTIFIER_PATTERN.clone())),
        ))
    }

    fn error_message(&self, context: MessageContext<'_>) -> String {
        required_or(context, "The identifier is wrong.")
    }
}
