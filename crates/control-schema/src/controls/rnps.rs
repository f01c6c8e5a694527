//! RNPS input.
//!
//! An RNPS (Registro Nacional de Publicaciones Seriadas) is the 4-digit code
//! that authorizes a serial publication in Cuba. The control rejects input
//! longer than the code, and input that is not text, by rolling the tracker
//! back to the last accepted value.

use std::sync::LazyLock;

use control_schema_core::logging::targets;
use control_schema_core::validator::{EQUAL_LENGTH, EqualLengthValidator, PATTERN, PatternValidator, REQUIRED};
use control_schema_core::{ValidatorSet, ValueTracker};
use regex::Regex;
use serde_json::{Value, json};

use crate::content::InputContent;
use crate::error::{ConfigurationError, Result};
use crate::input::{FieldKind, InputControl, MessageContext};

/// Number of digits in an RNPS code.
pub const RNPS_LENGTH: usize = 4;

/// An input for RNPS codes.
pub type RnpsInput = InputControl<RnpsKind>;

/// Field policy of [`RnpsInput`].
#[derive(Debug, Clone, Default)]
pub struct RnpsKind {
    /// The last value whose length fit the code.
    old_value: Value,
}

impl RnpsKind {
    /// The value input is rolled back to.
    pub fn old_value(&self) -> &Value {
        &self.old_value
    }
}

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("digits pattern compiles"));

/// Whether an edit fits the code: a string of at most [`RNPS_LENGTH`]
/// characters, or nothing at all.
fn fits(value: &Value) -> bool {
    match value {
        Value::String(s) => s.chars().count() <= RNPS_LENGTH,
        Value::Null => true,
        _ => false,
    }
}

impl FieldKind for RnpsKind {
    const CONTROL_NAME: &'static str = "RnpsInput";

    fn default_label(&self) -> Option<&str> {
        Some("RNPS")
    }

    fn is_abbreviation(&self) -> bool {
        true
    }

    fn default_tracker(&self) -> Option<ValueTracker> {
        Some(ValueTracker::new(
            json!(""),
            ValidatorSet::new()
                .with(EqualLengthValidator::new(RNPS_LENGTH))
                .with(PatternValidator::from_regex(DIGITS.clone())),
        ))
    }

    fn configure(&mut self, content: &InputContent) -> Result<()> {
        match &content.field.value {
            Some(value) if !value.is_string() => Err(ConfigurationError::invalid_value_type(
                content.field.name(),
                "string",
            )),
            _ => Ok(()),
        }
    }

    fn after_initialize(&mut self, tracker: &ValueTracker) {
        self.old_value = tracker.value();
    }

    fn handle_specific_input(&mut self, tracker: &ValueTracker) {
        let value = tracker.value();
        if !fits(&value) {
            tracing::trace!(
                target: targets::INPUT,
                rejected = %value,
                restored = %self.old_value,
                "rolling back RNPS input"
            );
            tracker.set_value(self.old_value.clone());
        } else {
            self.old_value = value;
        }
    }

    fn error_message(&self, context: MessageContext<'_>) -> String {
        let errors = context.errors;
        if errors.is_empty() {
            return String::new();
        }

        let mut message = String::new();
        let length_error = errors.contains(EQUAL_LENGTH) || errors.contains(REQUIRED);
        if length_error {
            message.push_str(&format!("Its length must be {RNPS_LENGTH}"));
        }
        if errors.contains(PATTERN) {
            message.push_str(if length_error {
                ", and all positions have digits"
            } else {
                "All positions must have digits"
            });
        }
        message.push('.');
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ControlKind;

    fn rnps(content: InputContent) -> RnpsInput {
        let mut input = RnpsInput::from_content(content);
        input.initialize(None).unwrap();
        input
    }

    #[test]
    fn test_defaults() {
        let input = rnps(InputContent::new("code", ControlKind::Rnps));
        assert_eq!(input.required_message(), "You must write a valid RNPS.");
        assert_eq!(
            input.content().unwrap().start_hint.as_ref().unwrap().label.as_deref(),
            Some("Write a valid RNPS.")
        );
        assert!(!input.error_state());
        assert_eq!(input.kind().old_value(), &json!(""));
    }

    #[test]
    fn test_rollback_keeps_last_fitting_value() {
        let mut input = rnps(InputContent::new("code", ControlKind::Rnps));
        input.input(json!("12"));
        assert_eq!(input.value(), json!("12"));
        assert!(input.error_state());
        assert_eq!(input.error_message(), "Its length must be 4.");

        input.input(json!("1234"));
        assert!(!input.error_state());
        assert_eq!(input.content().unwrap().field.value, Some(json!("1234")));

        input.input(json!("12345"));
        assert_eq!(input.value(), json!("1234"));
        assert!(!input.error_state());
    }

    #[test]
    fn test_rollback_counts_characters() {
        let mut input = rnps(InputContent::new("code", ControlKind::Rnps));
        input.input(json!("ñññ"));
        assert_eq!(input.value(), json!("ñññ"));
        assert_eq!(
            input.error_message(),
            "Its length must be 4, and all positions have digits."
        );
    }

    #[test]
    fn test_pattern_message() {
        let mut input = rnps(InputContent::new("code", ControlKind::Rnps));
        input.input(json!("12a4"));
        assert_eq!(input.error_message(), "All positions must have digits.");
    }

    #[test]
    fn test_required_message_uses_length() {
        let mut input = rnps(InputContent::new("code", ControlKind::Rnps).with_required(true));
        input.input(json!(""));
        assert!(input.error_state());
        assert_eq!(input.error_message(), "Its length must be 4.");
    }

    #[test]
    fn test_initial_value_seeds_rollback() {
        let mut input = rnps(InputContent::new("code", ControlKind::Rnps).with_value(json!("4321")));
        assert_eq!(input.kind().old_value(), &json!("4321"));
        input.input(json!("43210"));
        assert_eq!(input.value(), json!("4321"));
    }

    #[test]
    fn test_rollback_rejects_numbers() {
        let mut input = rnps(InputContent::new("code", ControlKind::Rnps));
        input.input(json!("1234"));
        input.input(json!(123456789));
        assert_eq!(input.value(), json!("1234"));
        assert_eq!(input.kind().old_value(), &json!("1234"));
        assert_eq!(input.content().unwrap().field.value, Some(json!("1234")));
        assert!(!input.error_state());

        input.input(json!("12"));
        input.input(json!(1234));
        assert_eq!(input.value(), json!("12"));
        assert_eq!(input.error_message(), "Its length must be 4.");
    }

    #[test]
    fn test_numbers_fail_length_rule() {
        let tracker = RnpsKind::default().default_tracker().unwrap();
        tracker.set_value(json!(1234));
        assert!(tracker.has_error(EQUAL_LENGTH));
        assert!(!tracker.valid());
    }

    #[test]
    fn test_non_string_value_rejected() {
        let mut input =
            RnpsInput::from_content(InputContent::new("code", ControlKind::Rnps).with_value(json!(1234)));
        let err = input.initialize(None).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidValueType { expected: "string", .. }
        ));
    }
}
