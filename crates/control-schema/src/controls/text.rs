//! Free text input.

use control_schema_core::ValueTracker;
use serde_json::json;

use crate::input::{FieldKind, InputControl};

/// An input for free text.
pub type TextInput = InputControl<TextKind>;

/// Field policy of [`TextInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextKind;

impl FieldKind for TextKind {
    const CONTROL_NAME: &'static str = "TextInput";

    fn default_label(&self) -> Option<&str> {
        Some("Text")
    }

    fn always_hint(&self) -> bool {
        false
    }

    fn default_tracker(&self) -> Option<ValueTracker> {
        Some(ValueTracker::with_value(json!("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ControlKind, InputContent};

    #[test]
    fn test_text_has_no_generated_hint() {
        let mut input = TextInput::from_content(
            InputContent::new("title", ControlKind::Text).with_label("Title"),
        );
        input.initialize(None).unwrap();
        let content = input.content().unwrap();
        assert!(content.start_hint.is_none());
        assert!(content.end_hint.is_none());
        assert_eq!(input.required_message(), "You must write a valid title.");
    }

    #[test]
    fn test_required_text() {
        let mut input = TextInput::from_content(
            InputContent::new("title", ControlKind::Text).with_required(true),
        );
        input.initialize(None).unwrap();
        input.input(json!("Revista Cubana"));
        assert!(!input.error_state());
        input.input(json!(""));
        assert!(input.error_state());
        assert_eq!(input.error_message(), "You must write a valid text.");
    }
}
