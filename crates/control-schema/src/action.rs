//! Action controls.
//!
//! An [`ActionControl`] is a button. It is normalized like every other control
//! and registers with its parent container, but it has no value and takes no
//! place in the form section model.

use std::any::Any;
use std::fmt;

use control_schema_core::logging::{span_names, targets};
use control_schema_core::{FormNode, Signal};

use crate::config;
use crate::content::{ActionContent, ButtonType, ContentPosition, FieldContent, IconValue};
use crate::control::{FormControl, ParentLink, Registration};
use crate::error::{ConfigurationError, Result};
use crate::field::{FieldControlBase, Normalizable};

/// A button control.
///
/// # Signals
///
/// - `clicked()`: Emitted when the button is clicked while enabled
pub struct ActionControl {
    base: FieldControlBase<ActionContent>,

    /// Signal emitted when the button is clicked.
    pub clicked: Signal<()>,
}

impl ActionControl {
    /// Create an action without a descriptor.
    pub fn new() -> Self {
        Self {
            base: FieldControlBase::new("ActionControl"),
            clicked: Signal::new(),
        }
    }

    /// Create an action from a descriptor.
    pub fn from_content(content: ActionContent) -> Self {
        let mut action = Self::new();
        action.base.set_content(content);
        action
    }

    pub fn content(&self) -> Option<&ActionContent> {
        self.base.content()
    }

    pub fn content_mut(&mut self) -> Option<&mut ActionContent> {
        self.base.content_mut()
    }

    /// Initialize the action and register it with `parent`.
    pub fn initialize(&mut self, parent: Option<&ParentLink>) -> Result<()> {
        self.base.ensure_uninitialized()?;
        let settings = config::current();
        let _span = tracing::debug_span!(
            target: targets::CONTROL,
            span_names::INITIALIZE,
            name = self.base.name()
        )
        .entered();

        self.normalize(&settings)?;

        let content = self
            .base
            .content_mut()
            .ok_or(ConfigurationError::MissingContent {
                control: "ActionControl",
            })?;
        content.field.required.get_or_insert(false);
        content.button_type.get_or_insert_default();
        content.disabled.get_or_insert(false);
        if let Some(icon) = content.icon.as_mut() {
            if icon.position.is_none() {
                icon.position = Some(ContentPosition::Prefix);
            }
            icon.fill_defaults(&settings.default_icon_name);
        }
        let name = content.field.name().to_owned();

        if let Some(parent) = parent {
            let registration = parent.attach(&name, None)?;
            self.base.set_registration(registration);
        }

        self.base.mark_initialized();
        Ok(())
    }

    pub fn button_type(&self) -> ButtonType {
        self.content()
            .and_then(|content| content.button_type)
            .unwrap_or_default()
    }

    pub fn icon(&self) -> Option<&IconValue> {
        self.content().and_then(|content| content.icon.as_ref())
    }

    pub fn is_disabled(&self) -> bool {
        self.content()
            .and_then(|content| content.disabled)
            .unwrap_or(false)
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if let Some(content) = self.content_mut() {
            content.disabled = Some(disabled);
        }
    }

    /// Click the button. Returns `false`, without emitting, when disabled.
    pub fn click(&self) -> bool {
        if self.is_disabled() {
            tracing::trace!(target: targets::CONTROL, name = self.base.name(), "click on disabled action");
            return false;
        }
        self.clicked.emit(());
        true
    }
}

impl Default for ActionControl {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizable for ActionControl {
    type Content = ActionContent;

    fn base(&self) -> &FieldControlBase<ActionContent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldControlBase<ActionContent> {
        &mut self.base
    }

    fn default_label(&self) -> Option<&str> {
        Some("Action")
    }
}

impl FormControl for ActionControl {
    fn field_content(&self) -> Option<&FieldContent> {
        self.base.content().map(|content| &content.field)
    }

    fn field_content_mut(&mut self) -> Option<&mut FieldContent> {
        self.base.content_mut().map(|content| &mut content.field)
    }

    fn initialize(&mut self, parent: Option<&ParentLink>) -> Result<()> {
        ActionControl::initialize(self, parent)
    }

    fn is_initialized(&self) -> bool {
        self.base.is_initialized()
    }

    fn form_node(&self) -> Option<FormNode> {
        None
    }

    fn registration(&self) -> Option<&Registration> {
        self.base.registration()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for ActionControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionControl")
            .field("content", &self.base.content())
            .field("clicked", &self.clicked)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::IconSource;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults() {
        let mut action = ActionControl::from_content(
            ActionContent::new("save").with_icon(IconValue::named("save")),
        );
        action.initialize(None).unwrap();

        let content = action.content().unwrap();
        assert_eq!(content.field.label.as_deref(), Some("Action"));
        assert_eq!(content.field.aria_label.as_deref(), Some("Action"));
        assert_eq!(action.button_type(), ButtonType::Button);
        assert!(!action.is_disabled());
        let icon = action.icon().unwrap();
        assert_eq!(icon.position, Some(ContentPosition::Prefix));
        assert_eq!(icon.source, Some(IconSource::Internal));
        assert!(action.icon_has_position(Some(icon), ContentPosition::Prefix));
        assert!(action.form_node().is_none());
    }

    #[test]
    fn test_click() {
        let mut action = ActionControl::from_content(
            ActionContent::new("submit")
                .with_label("Send")
                .with_button_type(ButtonType::Submit),
        );
        action.initialize(None).unwrap();

        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        action.clicked.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(action.click());
        action.set_disabled(true);
        assert!(!action.click());
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert_eq!(action.button_type(), ButtonType::Submit);
    }

    #[test]
    fn test_missing_name() {
        let mut action = ActionControl::from_content(ActionContent::default());
        assert!(matches!(
            action.initialize(None),
            Err(ConfigurationError::MissingName { control: "ActionControl" })
        ));
    }
}
