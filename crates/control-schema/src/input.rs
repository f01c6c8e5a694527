//! The input control base.
//!
//! [`InputControl`] binds a descriptor to a [`ValueTracker`] and derives the
//! presentation state (emptiness, hint and error visibility, error message)
//! from it. The per-kind behavior lives in a [`FieldKind`] strategy; the
//! concrete controls in [`crate::controls`] are aliases of `InputControl` over
//! their kind.
//!
//! Initialization runs in a fixed order:
//!
//! 1. Normalize the descriptor (see [`crate::field`]).
//! 2. Resolve the tracker: the descriptor's, else the internal component's,
//!    else one made by the kind.
//! 3. Apply the descriptor's initial value, marking the tracker touched.
//! 4. Build the required message and default `required` to `false`.
//! 5. Default the appearance, icons and hints.
//! 6. Register with the parent, if any.
//!
//! # Example
//!
//! ```
//! use control_schema::content::{ControlKind, InputContent};
//! use control_schema::controls::IdentifierInput;
//! use serde_json::json;
//!
//! let mut input = IdentifierInput::from_content(InputContent::new("id", ControlKind::Identifier));
//! input.initialize(None).unwrap();
//!
//! input.input(json!("abc-1"));
//! assert!(input.error_state());
//! assert_eq!(input.error_message(), "The identifier is wrong.");
//! ```

use std::any::Any;
use std::fmt;

use control_schema_core::logging::{span_names, targets};
use control_schema_core::validator::{REQUIRED, RequiredValidator, is_falsy};
use control_schema_core::{FormNode, ValidationErrors, ValueTracker};
use serde_json::Value;

use crate::config::{self, SchemaSettings};
use crate::content::{
    Appearance, ContentPosition, FieldContent, HintPosition, HintValue, InputContent,
};
use crate::control::{FormControl, ParentLink, Registration, Trackable};
use crate::error::{ConfigurationError, Result};
use crate::field::{FieldControlBase, Normalizable};

/// A nested editing component that owns its own tracker.
///
/// Composite inputs (an ISSN split into two halves, for example) are edited
/// through an internal component. The input control adopts the component's
/// tracker and defers its derived state to it.
pub trait InternalComponent: Send + Sync {
    /// The tracker the component edits.
    fn tracker(&self) -> ValueTracker;

    /// Replace the component's value.
    fn set_value(&mut self, value: Value);

    fn empty(&self) -> bool;

    fn error_state(&self) -> bool;

    fn error_message(&self) -> String;
}

/// What the hook of a kind sees when building an error message.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    /// The tracker's current errors.
    pub errors: &'a ValidationErrors,
    /// The message for a missing required value.
    pub required_message: &'a str,
}

/// Per-kind behavior of an input control.
pub trait FieldKind: Send + Sync + 'static {
    /// The type name used in error messages, for example `"RnpsInput"`.
    const CONTROL_NAME: &'static str;

    /// The label used when the descriptor has none.
    fn default_label(&self) -> Option<&str>;

    /// Abbreviated labels keep their case in generated messages.
    fn is_abbreviation(&self) -> bool {
        false
    }

    /// Whether a start hint is generated when the descriptor has no hints.
    fn always_hint(&self) -> bool {
        true
    }

    /// A tracker for descriptors that do not supply one.
    fn default_tracker(&self) -> Option<ValueTracker> {
        None
    }

    /// Read kind-specific keys from the descriptor before the tracker is
    /// resolved.
    fn configure(&mut self, content: &InputContent) -> Result<()> {
        let _ = content;
        Ok(())
    }

    /// Called once the control is fully initialized.
    fn after_initialize(&mut self, tracker: &ValueTracker) {
        let _ = tracker;
    }

    /// Adjust the tracker after user input, before the value is committed.
    fn handle_specific_input(&mut self, tracker: &ValueTracker) {
        let _ = tracker;
    }

    /// The message for the tracker's current errors.
    fn error_message(&self, context: MessageContext<'_>) -> String {
        if context.errors.contains(REQUIRED) {
            context.required_message.to_owned()
        } else {
            String::new()
        }
    }
}

/// An input control of kind `K`.
pub struct InputControl<K: FieldKind> {
    base: FieldControlBase<InputContent>,
    kind: K,
    internal: Option<Box<dyn InternalComponent>>,
    required_message: String,
}

impl<K: FieldKind + Default> InputControl<K> {
    /// Create a control without a descriptor.
    pub fn new() -> Self {
        Self::with_kind(K::default())
    }

    /// Create a control from a descriptor.
    pub fn from_content(content: InputContent) -> Self {
        let mut control = Self::new();
        control.set_content(content);
        control
    }
}

impl<K: FieldKind + Default> Default for InputControl<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FieldKind> InputControl<K> {
    /// Create a control with an explicit kind value.
    pub fn with_kind(kind: K) -> Self {
        Self {
            base: FieldControlBase::new(K::CONTROL_NAME),
            kind,
            internal: None,
            required_message: String::new(),
        }
    }

    /// Assign the descriptor.
    pub fn set_content(&mut self, content: InputContent) {
        self.base.set_content(content);
    }

    /// Attach an internal component whose tracker this control adopts.
    pub fn set_internal_component(&mut self, component: Box<dyn InternalComponent>) {
        self.internal = Some(component);
    }

    /// Builder form of [`set_internal_component`](Self::set_internal_component).
    pub fn with_internal_component(mut self, component: impl InternalComponent + 'static) -> Self {
        self.set_internal_component(Box::new(component));
        self
    }

    pub fn content(&self) -> Option<&InputContent> {
        self.base.content()
    }

    pub fn content_mut(&mut self) -> Option<&mut InputContent> {
        self.base.content_mut()
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    pub fn internal_component(&self) -> Option<&dyn InternalComponent> {
        self.internal.as_deref()
    }

    /// The message shown when a required value is missing.
    pub fn required_message(&self) -> &str {
        &self.required_message
    }

    /// Initialize the control; see the [module docs](crate::input).
    pub fn initialize(&mut self, parent: Option<&ParentLink>) -> Result<()> {
        self.base.ensure_uninitialized()?;
        let settings = config::current();
        let _span = tracing::debug_span!(
            target: targets::CONTROL,
            span_names::INITIALIZE,
            control = K::CONTROL_NAME,
            name = self.base.name()
        )
        .entered();

        let normalized = self.normalize(&settings)?;
        let tracker = self.resolve_tracker()?;

        let content = self
            .base
            .content_mut()
            .ok_or(ConfigurationError::MissingContent {
                control: K::CONTROL_NAME,
            })?;
        let name = content.field.name().to_owned();

        if normalized.has_value {
            if let Some(value) = content.field.value.clone() {
                match self.internal.as_mut() {
                    Some(internal) => internal.set_value(value),
                    None => tracker.set_value(value),
                }
                tracker.mark_as_touched();
            }
        }

        let label = if self.kind.is_abbreviation() {
            normalized.label.clone()
        } else {
            normalized.label.to_lowercase()
        };
        self.required_message = format!("You must write a valid {label}.");

        let required = *content.field.required.get_or_insert(false);
        if required && !tracker.has_validator(REQUIRED) {
            tracker.add_validator(RequiredValidator);
        }

        Self::fill_presentation(
            content,
            &settings,
            &label,
            settings.always_hint.unwrap_or(self.kind.always_hint()),
        );

        if let Some(parent) = parent {
            let registration = parent.attach(&name, Some(FormNode::Leaf(tracker.clone())))?;
            self.base.set_registration(registration);
        }

        self.kind.after_initialize(&tracker);
        self.base.mark_initialized();
        tracing::debug!(target: targets::CONTROL, %name, "initialized input control");
        Ok(())
    }

    /// Resolve the tracker and store it in the descriptor.
    fn resolve_tracker(&mut self) -> Result<ValueTracker> {
        let content = self
            .base
            .content_mut()
            .ok_or(ConfigurationError::MissingContent {
                control: K::CONTROL_NAME,
            })?;
        self.kind.configure(content)?;

        let tracker = content
            .tracker
            .clone()
            .or_else(|| self.internal.as_ref().map(|internal| internal.tracker()))
            .or_else(|| self.kind.default_tracker())
            .ok_or_else(|| ConfigurationError::missing_tracker(content.field.name()))?;
        content.tracker = Some(tracker.clone());
        Ok(tracker)
    }

    fn fill_presentation(
        content: &mut InputContent,
        settings: &SchemaSettings,
        label: &str,
        always_hint: bool,
    ) {
        content.appearance.get_or_insert(settings.appearance);

        let icon_name = settings.default_icon_name.as_str();
        if let Some(icon) = content.prefix_icon.as_mut() {
            icon.fill_defaults_at(ContentPosition::Prefix, icon_name);
        }
        if let Some(icon) = content.suffix_icon.as_mut() {
            icon.fill_defaults_at(ContentPosition::Suffix, icon_name);
        }

        if always_hint && content.start_hint.is_none() && content.end_hint.is_none() {
            content.start_hint = Some(HintValue::new(
                Some(HintPosition::Start),
                format!("Write a valid {label}."),
            ));
        } else {
            if let Some(hint) = content.start_hint.as_mut() {
                hint.fill_defaults_at(HintPosition::Start);
            }
            if let Some(hint) = content.end_hint.as_mut() {
                hint.fill_defaults_at(HintPosition::End);
            }
        }
    }

    /// The bound tracker, once initialized.
    pub fn tracker(&self) -> Option<ValueTracker> {
        self.base.content().and_then(|content| content.tracker.clone())
    }

    /// The tracker's current value, or `null` before initialization.
    pub fn value(&self) -> Value {
        self.tracker().map(|t| t.value()).unwrap_or(Value::Null)
    }

    /// The resolved appearance.
    pub fn appearance(&self) -> Appearance {
        self.base
            .content()
            .and_then(|content| content.appearance)
            .unwrap_or_default()
    }

    /// Simulate the user typing `value`: the tracker takes the value, becomes
    /// dirty, and the input is handled.
    pub fn input(&mut self, value: Value) {
        match self.internal.as_mut() {
            Some(internal) => internal.set_value(value),
            None => match self.tracker() {
                Some(tracker) => tracker.set_value(value),
                None => {
                    tracing::warn!(
                        target: targets::INPUT,
                        control = K::CONTROL_NAME,
                        "input before initialization ignored"
                    );
                    return;
                }
            },
        }
        if let Some(tracker) = self.tracker() {
            tracker.mark_as_dirty();
        }
        self.handle_input();
    }

    /// Process the tracker's current value after an edit.
    ///
    /// The kind's hook runs first; then, unless the control is in the error
    /// state, the value is committed to the descriptor. The tracker is marked
    /// touched on the first call.
    pub fn handle_input(&mut self) {
        let Some(tracker) = self.tracker() else {
            tracing::warn!(
                target: targets::INPUT,
                control = K::CONTROL_NAME,
                "input before initialization ignored"
            );
            return;
        };
        let _span = tracing::trace_span!(
            target: targets::INPUT,
            span_names::HANDLE_INPUT,
            name = self.base.name()
        )
        .entered();

        self.kind.handle_specific_input(&tracker);

        if !self.error_state() {
            if let Some(content) = self.base.content_mut() {
                content.field.value = Some(tracker.value());
            }
        }
        if tracker.untouched() {
            tracker.mark_as_touched();
        }
    }

    /// True when no value has been entered.
    pub fn empty(&self) -> bool {
        match &self.internal {
            Some(internal) => internal.empty(),
            None => self.tracker().is_none_or(|t| t.with_value_ref(is_falsy)),
        }
    }

    /// True when the hint should be shown.
    pub fn hint_state(&self) -> bool {
        self.empty()
    }

    /// True when the value is invalid and the user has interacted with it.
    pub fn error_state(&self) -> bool {
        match &self.internal {
            Some(internal) => internal.error_state(),
            None => self
                .tracker()
                .is_some_and(|t| t.invalid() && (t.dirty() || t.touched())),
        }
    }

    /// The message for the current errors, or `""`.
    pub fn error_message(&self) -> String {
        if let Some(internal) = &self.internal {
            return internal.error_message();
        }
        let Some(tracker) = self.tracker() else {
            return String::new();
        };
        let errors = tracker.errors();
        self.kind.error_message(MessageContext {
            errors: &errors,
            required_message: &self.required_message,
        })
    }
}

impl<K: FieldKind> Normalizable for InputControl<K> {
    type Content = InputContent;

    fn base(&self) -> &FieldControlBase<InputContent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldControlBase<InputContent> {
        &mut self.base
    }

    fn default_label(&self) -> Option<&str> {
        self.kind.default_label()
    }
}

impl<K: FieldKind> FormControl for InputControl<K> {
    fn field_content(&self) -> Option<&FieldContent> {
        self.base.content().map(|content| &content.field)
    }

    fn field_content_mut(&mut self) -> Option<&mut FieldContent> {
        self.base.content_mut().map(|content| &mut content.field)
    }

    fn initialize(&mut self, parent: Option<&ParentLink>) -> Result<()> {
        InputControl::initialize(self, parent)
    }

    fn is_initialized(&self) -> bool {
        self.base.is_initialized()
    }

    fn form_node(&self) -> Option<FormNode> {
        self.tracker().map(FormNode::Leaf)
    }

    fn registration(&self) -> Option<&Registration> {
        self.base.registration()
    }

    fn as_trackable(&self) -> Option<&dyn Trackable> {
        Some(self)
    }

    fn as_trackable_mut(&mut self) -> Option<&mut dyn Trackable> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<K: FieldKind> Trackable for InputControl<K> {
    fn tracker(&self) -> Option<ValueTracker> {
        InputControl::tracker(self)
    }

    fn empty(&self) -> bool {
        InputControl::empty(self)
    }

    fn error_state(&self) -> bool {
        InputControl::error_state(self)
    }

    fn error_message(&self) -> String {
        InputControl::error_message(self)
    }

    fn handle_input(&mut self) {
        InputControl::handle_input(self)
    }
}

impl<K: FieldKind + fmt::Debug> fmt::Debug for InputControl<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputControl")
            .field("control", &K::CONTROL_NAME)
            .field("kind", &self.kind)
            .field("content", &self.base.content())
            .field("internal", &self.internal.is_some())
            .field("initialized", &self.base.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ControlKind, IconSource, IconValue};
    use control_schema_core::validator::MaxLengthValidator;
    use control_schema_core::{FormGroup, ValidatorSet};
    use serde_json::json;

    /// A kind with a default label and a max-length rule, for exercising the base.
    #[derive(Debug, Default)]
    struct NoteKind {
        handled: usize,
    }

    impl FieldKind for NoteKind {
        const CONTROL_NAME: &'static str = "NoteInput";

        fn default_label(&self) -> Option<&str> {
            Some("Note")
        }

        fn default_tracker(&self) -> Option<ValueTracker> {
            Some(ValueTracker::new(
                json!(""),
                ValidatorSet::new().with(MaxLengthValidator::new(5)),
            ))
        }

        fn handle_specific_input(&mut self, _tracker: &ValueTracker) {
            self.handled += 1;
        }
    }

    /// A kind without a tracker factory.
    #[derive(Debug, Default)]
    struct BareKind;

    impl FieldKind for BareKind {
        const CONTROL_NAME: &'static str = "BareInput";

        fn default_label(&self) -> Option<&str> {
            None
        }
    }

    type NoteInput = InputControl<NoteKind>;

    fn note(content: InputContent) -> NoteInput {
        let mut input = NoteInput::from_content(content);
        input.initialize(None).unwrap();
        input
    }

    #[test]
    fn test_initialize_fills_defaults() {
        let input = note(InputContent::new("note", ControlKind::Text));
        let content = input.content().unwrap();

        assert_eq!(content.field.required, Some(false));
        assert_eq!(content.appearance, Some(Appearance::Standard));
        assert_eq!(input.required_message(), "You must write a valid note.");
        let hint = content.start_hint.as_ref().unwrap();
        assert_eq!(hint.position, Some(HintPosition::Start));
        assert_eq!(hint.label.as_deref(), Some("Write a valid note."));
        assert!(content.end_hint.is_none());
        assert!(input.tracker().is_some());
        assert!(input.is_initialized());
    }

    #[test]
    fn test_hints_pinned_when_present() {
        let input = note(
            InputContent::new("note", ControlKind::Text)
                .with_end_hint(HintValue::new(Some(HintPosition::Start), "max 5")),
        );
        let content = input.content().unwrap();
        assert!(content.start_hint.is_none());
        let hint = content.end_hint.as_ref().unwrap();
        assert_eq!(hint.position, Some(HintPosition::End));
        assert_eq!(hint.label.as_deref(), Some("max 5"));
    }

    #[test]
    fn test_icons_pinned_to_slot() {
        let input = note(
            InputContent::new("note", ControlKind::Text)
                .with_prefix_icon(IconValue::default().with_position(ContentPosition::Suffix))
                .with_suffix_icon(IconValue::named("clear").with_source(IconSource::External)),
        );
        let content = input.content().unwrap();
        let prefix = content.prefix_icon.as_ref().unwrap();
        assert_eq!(prefix.position, Some(ContentPosition::Prefix));
        assert_eq!(prefix.source, Some(IconSource::Internal));
        assert_eq!(prefix.name.as_deref(), Some("info"));
        assert!(input.icon_has_position(Some(prefix), ContentPosition::Prefix));

        let suffix = content.suffix_icon.as_ref().unwrap();
        assert_eq!(suffix.position, Some(ContentPosition::Suffix));
        assert!(input.icon_has_source(Some(suffix), IconSource::External));
        assert!(!input.icon_has_source(None, IconSource::External));
    }

    #[test]
    fn test_initial_value_touches_tracker() {
        let input = note(InputContent::new("note", ControlKind::Text).with_value(json!("hi")));
        let tracker = input.tracker().unwrap();
        assert_eq!(tracker.value(), json!("hi"));
        assert!(tracker.touched());
        assert!(tracker.pristine());
        assert!(!input.empty());
    }

    #[test]
    fn test_required_adds_rule_once() {
        let tracker = ValueTracker::new(json!(""), ValidatorSet::new().with(RequiredValidator));
        let input = note(
            InputContent::new("note", ControlKind::Text)
                .with_required(true)
                .with_tracker(tracker.clone()),
        );
        assert!(input.tracker().unwrap().ptr_eq(&tracker));
        assert_eq!(tracker.validators().len(), 1);
        assert!(tracker.has_error(REQUIRED));
        // Pristine and untouched: no error shown yet.
        assert!(!input.error_state());
        assert!(input.hint_state());
    }

    #[test]
    fn test_input_commits_valid_values_only() {
        let mut input = note(InputContent::new("note", ControlKind::Text));
        input.input(json!("abc"));
        assert_eq!(input.content().unwrap().field.value, Some(json!("abc")));
        assert!(input.tracker().unwrap().touched());
        assert!(input.tracker().unwrap().dirty());

        input.input(json!("too long"));
        assert!(input.error_state());
        assert_eq!(input.content().unwrap().field.value, Some(json!("abc")));
        assert_eq!(input.error_message(), "");
        assert_eq!(input.kind().handled, 2);
    }

    #[test]
    fn test_required_message_on_empty_input() {
        let mut input = note(InputContent::new("note", ControlKind::Text).with_required(true));
        input.input(json!(""));
        assert!(input.error_state());
        assert_eq!(input.error_message(), "You must write a valid note.");
    }

    #[test]
    fn test_missing_tracker() {
        let mut input = InputControl::<BareKind>::from_content(
            InputContent::new("x", ControlKind::Text).with_label("X"),
        );
        let err = input.initialize(None).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingTracker { .. }));
        assert!(!input.is_initialized());
    }

    #[test]
    fn test_missing_content() {
        let mut input = NoteInput::new();
        let err = input.initialize(None).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingContent { control: "NoteInput" }));
    }

    #[test]
    fn test_initialize_twice() {
        let mut input = note(InputContent::new("note", ControlKind::Text));
        let err = input.initialize(None).unwrap_err();
        assert!(matches!(err, ConfigurationError::AlreadyInitialized { .. }));
    }

    #[test]
    fn test_registers_last() {
        let group = FormGroup::empty();
        let link = ParentLink::new(
            crate::control::ContainerId::next(),
            FormNode::Group(group.clone()),
        );

        let mut first = NoteInput::from_content(InputContent::new("note", ControlKind::Text));
        first.initialize(Some(&link)).unwrap();
        assert!(first.registration().is_some());

        let mut second = NoteInput::from_content(InputContent::new("note", ControlKind::Text));
        let err = second.initialize(Some(&link)).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateName { .. }));
        assert!(second.registration().is_none());
        assert_eq!(group.len(), 1);
        assert!(group.child("note").unwrap().ptr_eq(&first.form_node().unwrap()));
    }

    #[test]
    fn test_input_before_initialize_is_ignored() {
        let mut input = NoteInput::from_content(InputContent::new("note", ControlKind::Text));
        input.input(json!("abc"));
        assert!(input.empty());
        assert!(!input.error_state());
        assert_eq!(input.value(), Value::Null);
    }
}
