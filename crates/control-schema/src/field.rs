//! The field control base: descriptor normalization shared by every control.
//!
//! Normalization validates the mandatory descriptor keys and fills absent
//! optional keys with their defaults. It mutates the descriptor in place and
//! is the first step of every control's initialization.
//!
//! | Key | Rule |
//! |-----|------|
//! | `name` | must be non-empty |
//! | `controlType` | must be present |
//! | `label` | descriptor label, else the control's default label |
//! | `minWidth` | settings default (`"15em"`) |
//! | `width` | `minWidth` |
//! | `textAlign` | settings default (left) |
//! | `ariaLabel` | the resolved label |

use control_schema_core::logging::targets;

use crate::config::SchemaSettings;
use crate::content::{ContentPosition, HasFieldContent, HintPosition, HintValue, IconSource, IconValue};
use crate::control::Registration;
use crate::error::{ConfigurationError, Result};

/// The outcome of normalizing a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedField {
    /// The label the control displays: the descriptor's non-empty label, else
    /// the control's default label.
    pub label: String,
    /// Whether the descriptor carries an initial value.
    pub has_value: bool,
}

/// Normalize a descriptor in place.
///
/// `control` names the control in error messages. `default_label` is the
/// control's own label; without one the descriptor must carry a label.
pub fn normalize_field<C: HasFieldContent>(
    content: Option<&mut C>,
    control: &'static str,
    default_label: Option<&str>,
    settings: &SchemaSettings,
) -> Result<NormalizedField> {
    let content = content
        .ok_or(ConfigurationError::MissingContent { control })?
        .field_mut();

    let name = match content.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => return Err(ConfigurationError::MissingName { control }),
    };
    if content.control_type.is_none() {
        return Err(ConfigurationError::MissingControlType { name });
    }

    let label = match default_label {
        None => content
            .label
            .clone()
            .ok_or_else(|| ConfigurationError::missing_label(&name))?,
        Some(default_label) => {
            let label = match content.label.as_deref() {
                Some(label) if !label.is_empty() => label.to_owned(),
                _ => default_label.to_owned(),
            };
            if content.label.is_none() {
                content.label = Some(default_label.to_owned());
            }
            label
        }
    };

    let min_width = content
        .min_width
        .get_or_insert_with(|| settings.min_width.clone())
        .clone();
    content.width.get_or_insert(min_width);
    content.text_align.get_or_insert(settings.text_align);
    if content.aria_label.is_none() {
        content.aria_label = Some(label.clone());
    }

    tracing::trace!(target: targets::CONTROL, control, %name, %label, "normalized descriptor");

    Ok(NormalizedField {
        label,
        has_value: content.value.is_some(),
    })
}

/// Descriptor storage and registration state shared by every control.
#[derive(Debug)]
pub struct FieldControlBase<C> {
    control: &'static str,
    content: Option<C>,
    registration: Option<Registration>,
    initialized: bool,
}

impl<C: HasFieldContent> FieldControlBase<C> {
    /// Create an empty base for the control type named `control`.
    pub fn new(control: &'static str) -> Self {
        Self {
            control,
            content: None,
            registration: None,
            initialized: false,
        }
    }

    /// The control type name used in error messages.
    pub fn control(&self) -> &'static str {
        self.control
    }

    pub fn content(&self) -> Option<&C> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.content.as_mut()
    }

    pub fn set_content(&mut self, content: C) {
        self.content = Some(content);
    }

    /// The descriptor's name, or `""` before a descriptor is assigned.
    pub fn name(&self) -> &str {
        self.content.as_ref().map_or("", |c| c.field().name())
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    pub fn set_registration(&mut self, registration: Registration) {
        self.registration = Some(registration);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    /// Fail if the control was already initialized.
    pub fn ensure_uninitialized(&self) -> Result<()> {
        if self.initialized {
            return Err(ConfigurationError::AlreadyInitialized {
                name: self.name().to_owned(),
            });
        }
        Ok(())
    }

    /// Normalize the stored descriptor in place.
    pub fn normalize(
        &mut self,
        default_label: Option<&str>,
        settings: &SchemaSettings,
    ) -> Result<NormalizedField> {
        normalize_field(self.content.as_mut(), self.control, default_label, settings)
    }
}

/// A control whose descriptor is normalized by the field control base.
pub trait Normalizable {
    /// The descriptor layer of this control.
    type Content: HasFieldContent;

    fn base(&self) -> &FieldControlBase<Self::Content>;

    fn base_mut(&mut self) -> &mut FieldControlBase<Self::Content>;

    /// The label used when the descriptor has none.
    fn default_label(&self) -> Option<&str> {
        None
    }

    /// Normalize the descriptor with `settings`.
    fn normalize(&mut self, settings: &SchemaSettings) -> Result<NormalizedField> {
        let default_label = self.default_label().map(str::to_owned);
        self.base_mut().normalize(default_label.as_deref(), settings)
    }

    /// Returns true if the icon is present and sits at `position`.
    fn icon_has_position(&self, icon: Option<&IconValue>, position: ContentPosition) -> bool {
        icon.is_some_and(|icon| icon.position == Some(position))
    }

    /// Returns true if the icon is present and comes from `source`.
    fn icon_has_source(&self, icon: Option<&IconValue>, source: IconSource) -> bool {
        icon.is_some_and(|icon| icon.source == Some(source))
    }

    /// Returns true if the hint is present and sits at `position`.
    fn hint_has_position(&self, hint: Option<&HintValue>, position: HintPosition) -> bool {
        hint.is_some_and(|hint| hint.position == Some(position))
    }
}
