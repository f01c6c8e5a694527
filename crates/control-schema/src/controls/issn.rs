//! ISSN input.
//!
//! An ISSN (International Standard Serial Number) is an 8-digit code that
//! identifies a serial publication, written `NNNN-NNNC`. The last character is
//! a mod-11 check digit, with `X` standing for 10. The code is edited through
//! an [`IssnComponent`], which owns the tracker the control adopts.

use std::sync::LazyLock;

use control_schema_core::validator::{CustomValidator, REQUIRED, is_empty_input_value, is_falsy};
use control_schema_core::{ValidatorSet, ValueTracker};
use regex::Regex;
use serde_json::{Value, json};

use crate::input::{FieldKind, InputControl, InternalComponent};

/// The value an ISSN field starts from when asked for a default.
pub const DEFAULT_ISSN: &str = "0000-0000";

/// Validation key for a malformed code or a wrong check digit.
pub const ISSN: &str = "issn";

static ISSN_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{3}[0-9X]$").expect("ISSN pattern compiles"));

/// Compute the check character for the first seven digits of an ISSN.
///
/// Returns `None` unless `digits` holds exactly seven ASCII digits.
pub fn issn_check_digit(digits: &str) -> Option<char> {
    if digits.len() != 7 {
        return None;
    }
    let mut sum = 0;
    for (i, c) in digits.chars().enumerate() {
        let digit = c.to_digit(10)?;
        sum += digit * (8 - i as u32);
    }
    match (11 - sum % 11) % 11 {
        10 => Some('X'),
        check => char::from_digit(check, 10),
    }
}

fn issn_is_valid(code: &str) -> bool {
    if !ISSN_FORMAT.is_match(code) {
        return false;
    }
    let digits: String = code.chars().filter(|c| *c != '-').take(7).collect();
    issn_check_digit(&digits) == code.chars().last()
}

fn issn_rule(value: &Value) -> Option<Value> {
    if is_empty_input_value(value) {
        return None;
    }
    match value.as_str() {
        Some(text) if issn_is_valid(text) => None,
        _ => Some(json!({ "actualValue": value })),
    }
}

/// The nested component that edits an ISSN.
#[derive(Debug, Clone)]
pub struct IssnComponent {
    tracker: ValueTracker,
}

impl IssnComponent {
    /// Create a component with an empty value.
    pub fn new() -> Self {
        Self::with_value("")
    }

    /// Create a component with an initial code.
    pub fn with_value(code: impl Into<String>) -> Self {
        Self {
            tracker: ValueTracker::new(
                Value::String(code.into()),
                ValidatorSet::new().with(CustomValidator::new(ISSN, issn_rule)),
            ),
        }
    }

    /// The value an ISSN field starts from when asked for a default.
    pub fn default_value() -> &'static str {
        DEFAULT_ISSN
    }
}

impl Default for IssnComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl InternalComponent for IssnComponent {
    fn tracker(&self) -> ValueTracker {
        self.tracker.clone()
    }

    fn set_value(&mut self, value: Value) {
        self.tracker.set_value(value);
    }

    fn empty(&self) -> bool {
        self.tracker
            .with_value_ref(|value| is_falsy(value) || value.as_str() == Some("-"))
    }

    fn error_state(&self) -> bool {
        self.tracker.invalid() && (self.tracker.dirty() || self.tracker.touched())
    }

    fn error_message(&self) -> String {
        let errors = self.tracker.errors();
        if errors.contains(REQUIRED) {
            "You must write a valid ISSN.".to_owned()
        } else if errors.contains(ISSN) {
            "The ISSN is wrong.".to_owned()
        } else {
            String::new()
        }
    }
}

/// An input for ISSN codes.
pub type IssnInput = InputControl<IssnKind>;

/// Field policy of [`IssnInput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IssnKind;

impl FieldKind for IssnKind {
    const CONTROL_NAME: &'static str = "IssnInput";

    fn default_label(&self) -> Option<&str> {
        Some("ISSN")
    }

    fn is_abbreviation(&self) -> bool {
        true
    }
}

impl IssnInput {
    /// Create an ISSN input edited through a fresh [`IssnComponent`].
    pub fn with_component(content: crate::content::InputContent) -> Self {
        let mut input = Self::from_content(content);
        input.set_internal_component(Box::new(IssnComponent::new()));
        input
    }
}
