//! Select input.
//!
//! The options come from the descriptor's `extraContent`:
//!
//! ```json
//! { "options": [{ "value": "cu", "label": "Cuba" }], "multiple": false }
//! ```
//!
//! A multiple select holds an array of option values.

use control_schema_core::ValueTracker;
use control_schema_core::logging::targets;
use serde::Deserialize;
use serde_json::Value;

use crate::content::{InputContent, SelectOption};
use crate::error::{ConfigurationError, Result};
use crate::input::{FieldKind, InputControl};

/// An input choosing among fixed options.
pub type SelectInput = InputControl<SelectKind>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SelectExtra {
    options: Vec<SelectOption>,
    multiple: bool,
}

/// Field policy of [`SelectInput`].
#[derive(Debug, Clone, Default)]
pub struct SelectKind {
    options: Vec<SelectOption>,
    multiple: bool,
}

impl SelectKind {
    /// Create a policy with explicit options, used when the descriptor has no
    /// `extraContent`.
    pub fn new(options: Vec<SelectOption>, multiple: bool) -> Self {
        Self { options, multiple }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }
}

impl FieldKind for SelectKind {
    const CONTROL_NAME: &'static str = "SelectInput";

    fn default_label(&self) -> Option<&str> {
        Some("Select")
    }

    fn always_hint(&self) -> bool {
        false
    }

    fn default_tracker(&self) -> Option<ValueTracker> {
        let empty = if self.multiple {
            Value::Array(Vec::new())
        } else {
            Value::Null
        };
        Some(ValueTracker::with_value(empty))
    }

    fn configure(&mut self, content: &InputContent) -> Result<()> {
        let Some(extra) = &content.field.extra_content else {
            return Ok(());
        };
        let extra = SelectExtra::deserialize(extra).map_err(ConfigurationError::Descriptor)?;
        tracing::trace!(
            target: targets::CONTROL,
            name = content.field.name(),
            options = extra.options.len(),
            multiple = extra.multiple,
            "select options configured"
        );
        self.options = extra.options;
        self.multiple = extra.multiple;
        Ok(())
    }
}

impl SelectInput {
    /// The options.
    pub fn options(&self) -> &[SelectOption] {
        self.kind().options()
    }

    /// The options whose values are currently selected, in option order.
    pub fn selected_options(&self) -> Vec<&SelectOption> {
        let value = self.value();
        self.options()
            .iter()
            .filter(|option| match &value {
                Value::Array(selected) if self.kind().is_multiple() => {
                    selected.contains(&option.value)
                }
                selected => *selected == option.value,
            })
            .collect()
    }
}
