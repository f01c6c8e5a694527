//! Email input.

use control_schema_core::validator::EmailValidator;
use control_schema_core::{ValidatorSet, ValueTracker};
use serde_json::json;

use super::required_or;
use crate::input::{FieldKind, InputControl, MessageContext};

/// An input for email addresses.
pub type EmailInput = InputControl<EmailKind>;

/// Field policy of [`EmailInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailKind;

impl FieldKind for EmailKind {
    const CONTROL_NAME: &'static str = "EmailInput";

    fn default_label(&self) -> Option<&str> {
        Some("Email")
    }

    fn default_tracker(&self) -> Option<ValueTracker> {
        Some(ValueTracker::new(
            json!(""),
            ValidatorSet::new().with(EmailValidator),
        ))
    }

    fn error_message(&self, context: MessageContext<'_>) -> String {
        required_or(context, "The email is wrong.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ControlKind, InputContent};

    #[test]
    fn test_email() {
        let mut input = EmailInput::from_content(
            InputContent::new("mail", ControlKind::Email).with_required(true),
        );
        input.initialize(None).unwrap();
        assert_eq!(input.required_message(), "You must write a valid email.");

        input.input(json!("editor@revista.cu"));
        assert!(!input.error_state());

        input.input(json!("editor@"));
        assert!(input.error_state());
        assert_eq!(input.error_message(), "The email is wrong.");

        input.input(json!(""));
        assert_eq!(input.error_message(), "You must write a valid email.");
    }
}
