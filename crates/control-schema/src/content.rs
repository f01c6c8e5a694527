//! Content descriptors.
//!
//! A descriptor is the configuration record a control is built from. It is
//! deserializable from JSON (camelCase keys) and can also be assembled in code
//! with the `with_*` builders.
//!
//! Every descriptor embeds a [`FieldContent`] with the shared keys. Input
//! controls add a [`InputContent`] layer with the value tracker, icons, affixes
//! and hints; containers and actions have their own layers.
//!
//! Initialization fills absent optional keys in place, so after a control is
//! initialized its descriptor reads as fully specified.
//!
//! # Example
//!
//! ```
//! use control_schema::content::{ControlContent, ControlKind};
//! use serde_json::json;
//!
//! let content = ControlContent::from_json(json!({
//!     "name": "code",
//!     "controlType": "rnps",
//!     "required": true
//! }))
//! .unwrap();
//!
//! assert_eq!(content.field().control_type, Some(ControlKind::Rnps));
//! assert_eq!(content.field().required, Some(true));
//! ```

use control_schema_core::{SectionKind, ValueTracker};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ConfigurationError, Result};

/// The concrete control a descriptor is built into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    Identifier,
    Issn,
    Rnps,
    Email,
    Url,
    Select,
    Text,
    SimpleContainer,
    PanelContainer,
    Action,
}

impl ControlKind {
    /// Returns true for the input controls.
    pub fn is_input(self) -> bool {
        !self.is_container() && self != ControlKind::Action
    }

    /// Returns true for the container controls.
    pub fn is_container(self) -> bool {
        matches!(self, ControlKind::SimpleContainer | ControlKind::PanelContainer)
    }
}

/// Horizontal alignment of a control's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Visual variant of an input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Standard,
    Fill,
    Outline,
}

/// Where an icon or affix sits relative to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentPosition {
    Prefix,
    Suffix,
    None,
}

/// Where an icon comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconSource {
    /// Bundled with the application.
    #[default]
    Internal,
    /// Resolved from an icon font or remote set.
    External,
}

/// Where a hint sits under the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintPosition {
    Start,
    End,
    None,
}

/// The type of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    #[default]
    Button,
    Submit,
    Reset,
}

/// An icon shown next to an input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconValue {
    pub source: Option<IconSource>,
    pub position: Option<ContentPosition>,
    pub name: Option<String>,
}

impl IconValue {
    /// Create an icon with the given name and no source or position.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the source.
    pub fn with_source(mut self, source: IconSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the position.
    pub fn with_position(mut self, position: ContentPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Fill absent values: the source becomes internal and the name becomes
    /// `default_name`. The position is left alone.
    pub fn fill_defaults(&mut self, default_name: &str) {
        self.source.get_or_insert(IconSource::Internal);
        if self.name.is_none() {
            self.name = Some(default_name.to_owned());
        }
    }

    /// Pin the position to `position`, then fill the other defaults.
    pub fn fill_defaults_at(&mut self, position: ContentPosition, default_name: &str) {
        self.position = Some(position);
        self.fill_defaults(default_name);
    }
}

/// A hint shown under an input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintValue {
    pub position: Option<HintPosition>,
    pub label: Option<String>,
}

impl HintValue {
    /// Create a hint with the given text.
    pub fn new(position: Option<HintPosition>, label: impl Into<String>) -> Self {
        Self {
            position,
            label: Some(label.into()),
        }
    }

    /// Pin the position to `position`; a missing label becomes `""`.
    pub fn fill_defaults_at(&mut self, position: HintPosition) {
        self.position = Some(position);
        self.label.get_or_insert_with(String::new);
    }
}

/// One option of a select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    /// Create an option.
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Keys shared by every control descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldContent {
    /// Key under which the control's value appears in its parent section.
    pub name: Option<String>,
    /// Which concrete control to build.
    pub control_type: Option<ControlKind>,
    /// Display label.
    pub label: Option<String>,
    /// CSS-like length, for example `"15em"`.
    pub min_width: Option<String>,
    /// CSS-like length; defaults to the minimum width.
    pub width: Option<String>,
    /// Whether a value is mandatory.
    pub required: Option<bool>,
    pub text_align: Option<TextAlign>,
    /// Accessibility label; defaults to the label.
    pub aria_label: Option<String>,
    /// Initial value.
    pub value: Option<Value>,
    /// Kind-specific extra configuration.
    pub extra_content: Option<Value>,
}

impl FieldContent {
    /// Create a descriptor with a name and control type.
    pub fn new(name: impl Into<String>, control_type: ControlKind) -> Self {
        Self {
            name: Some(name.into()),
            control_type: Some(control_type),
            ..Default::default()
        }
    }

    /// The name, or `""` if absent.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The label, or `""` if absent.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }

    /// Whether the control is required. Absent means no.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_min_width(mut self, min_width: impl Into<String>) -> Self {
        self.min_width = Some(min_width.into());
        self
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_text_align(mut self, text_align: TextAlign) -> Self {
        self.text_align = Some(text_align);
        self
    }

    pub fn with_aria_label(mut self, aria_label: impl Into<String>) -> Self {
        self.aria_label = Some(aria_label.into());
        self
    }

    pub fn with_extra_content(mut self, extra_content: Value) -> Self {
        self.extra_content = Some(extra_content);
        self
    }
}

/// Access to the shared descriptor keys of any descriptor layer.
pub trait HasFieldContent {
    fn field(&self) -> &FieldContent;
    fn field_mut(&mut self) -> &mut FieldContent;
}

impl HasFieldContent for FieldContent {
    fn field(&self) -> &FieldContent {
        self
    }

    fn field_mut(&mut self) -> &mut FieldContent {
        self
    }
}

/// Descriptor of an input control.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputContent {
    #[serde(flatten)]
    pub field: FieldContent,
    /// The value tracker; resolved during initialization when absent.
    #[serde(skip)]
    pub tracker: Option<ValueTracker>,
    pub appearance: Option<Appearance>,
    pub prefix_icon: Option<IconValue>,
    pub suffix_icon: Option<IconValue>,
    pub prefix_text: Option<String>,
    pub suffix_text: Option<String>,
    pub start_hint: Option<HintValue>,
    pub end_hint: Option<HintValue>,
}

impl InputContent {
    /// Create an input descriptor with a name and control type.
    pub fn new(name: impl Into<String>, control_type: ControlKind) -> Self {
        Self::from_field(FieldContent::new(name, control_type))
    }

    /// Wrap shared keys in an input descriptor.
    pub fn from_field(field: FieldContent) -> Self {
        Self {
            field,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.field.required = Some(required);
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.field.value = Some(value.into());
        self
    }

    pub fn with_extra_content(mut self, extra_content: Value) -> Self {
        self.field.extra_content = Some(extra_content);
        self
    }

    /// Bind an existing tracker instead of letting the control create one.
    pub fn with_tracker(mut self, tracker: ValueTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn with_prefix_icon(mut self, icon: IconValue) -> Self {
        self.prefix_icon = Some(icon);
        self
    }

    pub fn with_suffix_icon(mut self, icon: IconValue) -> Self {
        self.suffix_icon = Some(icon);
        self
    }

    pub fn with_prefix_text(mut self, text: impl Into<String>) -> Self {
        self.prefix_text = Some(text.into());
        self
    }

    pub fn with_suffix_text(mut self, text: impl Into<String>) -> Self {
        self.suffix_text = Some(text.into());
        self
    }

    pub fn with_start_hint(mut self, hint: HintValue) -> Self {
        self.start_hint = Some(hint);
        self
    }

    pub fn with_end_hint(mut self, hint: HintValue) -> Self {
        self.end_hint = Some(hint);
        self
    }
}

impl HasFieldContent for InputContent {
    fn field(&self) -> &FieldContent {
        &self.field
    }

    fn field_mut(&mut self) -> &mut FieldContent {
        &mut self.field
    }
}

/// Descriptor of a container control.
///
/// The label is the container's title. `children` describes controls that are
/// built and added when the container initializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerContent {
    #[serde(flatten)]
    pub field: FieldContent,
    /// Shape of the container's section.
    pub section: Option<SectionKind>,
    /// Secondary text shown under the title of a panel.
    pub description: Option<String>,
    /// Whether a panel starts expanded.
    pub expanded: Option<bool>,
    pub children: Vec<ControlContent>,
}

impl ContainerContent {
    /// Create a container descriptor with a name and control type.
    pub fn new(name: impl Into<String>, control_type: ControlKind) -> Self {
        Self {
            field: FieldContent::new(name, control_type),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    pub fn with_section(mut self, section: SectionKind) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    /// Append a child descriptor.
    pub fn with_child(mut self, child: impl Into<ControlContent>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl HasFieldContent for ContainerContent {
    fn field(&self) -> &FieldContent {
        &self.field
    }

    fn field_mut(&mut self) -> &mut FieldContent {
        &mut self.field
    }
}

/// Descriptor of an action (button) control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionContent {
    #[serde(flatten)]
    pub field: FieldContent,
    pub button_type: Option<ButtonType>,
    pub icon: Option<IconValue>,
    pub disabled: Option<bool>,
}

impl ActionContent {
    /// Create an action descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldContent::new(name, ControlKind::Action),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    pub fn with_button_type(mut self, button_type: ButtonType) -> Self {
        self.button_type = Some(button_type);
        self
    }

    pub fn with_icon(mut self, icon: IconValue) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }
}

impl HasFieldContent for ActionContent {
    fn field(&self) -> &FieldContent {
        &self.field
    }

    fn field_mut(&mut self) -> &mut FieldContent {
        &mut self.field
    }
}

/// A descriptor of any control.
///
/// When deserialized, the `controlType` key selects the variant; a descriptor
/// without one is read as an input descriptor and rejected later, at
/// initialization.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ControlContent {
    Input(InputContent),
    Container(ContainerContent),
    Action(ActionContent),
}

impl ControlContent {
    /// Decode a descriptor from a JSON value.
    pub fn from_json(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(ConfigurationError::Descriptor)
    }

    /// Decode a descriptor from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(ConfigurationError::Descriptor)
    }

    /// The shared descriptor keys.
    pub fn field(&self) -> &FieldContent {
        match self {
            ControlContent::Input(content) => &content.field,
            ControlContent::Container(content) => &content.field,
            ControlContent::Action(content) => &content.field,
        }
    }
}

impl<'de> Deserialize<'de> for ControlContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("controlType") {
            Some(kind) if !kind.is_null() => {
                Some(ControlKind::deserialize(kind).map_err(D::Error::custom)?)
            }
            _ => None,
        };
        let content = match kind {
            Some(kind) if kind.is_container() => {
                ControlContent::Container(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            Some(ControlKind::Action) => {
                ControlContent::Action(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            _ => ControlContent::Input(serde_json::from_value(value).map_err(D::Error::custom)?),
        };
        Ok(content)
    }
}

impl From<InputContent> for ControlContent {
    fn from(content: InputContent) -> Self {
        ControlContent::Input(content)
    }
}

impl From<ContainerContent> for ControlContent {
    fn from(content: ContainerContent) -> Self {
        ControlContent::Container(content)
    }
}

impl From<ActionContent> for ControlContent {
    fn from(content: ActionContent) -> Self {
        ControlContent::Action(content)
    }
}
