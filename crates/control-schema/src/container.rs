//! Container controls.
//!
//! A [`ContainerControl`] holds an ordered list of child controls and owns the
//! form section node its children register into. The section is created empty
//! when the container is constructed, so children can be added before or after
//! the container itself is initialized.
//!
//! Containers come in two flavors, selected by the descriptor's control type:
//! a simple container and a panel, which adds a description and an
//! expanded/collapsed state. Either can hold a group (named children) or a
//! list (children named `"0"`, `"1"`, ...).
//!
//! # Example
//!
//! ```
//! use control_schema::container::ContainerControl;
//! use control_schema::content::{ContainerContent, ControlKind, InputContent};
//! use control_schema::controls::RnpsInput;
//! use control_schema_core::SectionKind;
//!
//! let mut codes = ContainerControl::from_content(
//!     ContainerContent::new("codes", ControlKind::SimpleContainer)
//!         .with_section(SectionKind::List),
//! );
//! codes.initialize(None).unwrap();
//!
//! for _ in 0..3 {
//!     let name = codes.next_list_name();
//!     codes
//!         .add_child(RnpsInput::from_content(InputContent::new(name, ControlKind::Rnps)))
//!         .unwrap();
//! }
//! assert_eq!(codes.value(), serde_json::json!(["", "", ""]));
//! ```

use std::any::Any;
use std::fmt;

use control_schema_core::logging::{span_names, targets};
use control_schema_core::{FormGroup, FormList, FormNode, SectionKind, Signal, clone_section};
use serde_json::Value;

use crate::config;
use crate::content::{ContainerContent, ControlContent, ControlKind, FieldContent};
use crate::control::{ContainerId, FormControl, ParentLink, Registration};
use crate::error::{ConfigurationError, Result};
use crate::factory::create_control;
use crate::field::{FieldControlBase, Normalizable};

/// A control that holds other controls.
///
/// # Signals
///
/// - `children_changed()`: Emitted when a child is added
pub struct ContainerControl {
    base: FieldControlBase<ContainerContent>,
    id: ContainerId,
    section: FormNode,
    children: Vec<Box<dyn FormControl>>,

    /// Signal emitted when a child is added.
    pub children_changed: Signal<()>,
}

impl ContainerControl {
    /// Create a container without a descriptor, with an empty section of the
    /// given shape.
    pub fn new(section_kind: SectionKind) -> Self {
        let section = match section_kind {
            SectionKind::Group => FormNode::Group(FormGroup::empty()),
            SectionKind::List => FormNode::List(FormList::empty()),
        };
        Self {
            base: FieldControlBase::new("ContainerControl"),
            id: ContainerId::next(),
            section,
            children: Vec::new(),
            children_changed: Signal::new(),
        }
    }

    /// Create a container from a descriptor. The section shape comes from the
    /// descriptor and defaults to a group.
    pub fn from_content(content: ContainerContent) -> Self {
        let mut container = Self::new(content.section.unwrap_or_default());
        container.set_content(content);
        container
    }

    /// Assign the descriptor.
    pub fn set_content(&mut self, content: ContainerContent) {
        self.base.set_content(content);
    }

    pub fn content(&self) -> Option<&ContainerContent> {
        self.base.content()
    }

    pub fn content_mut(&mut self) -> Option<&mut ContainerContent> {
        self.base.content_mut()
    }

    /// The container's id, which its children record as their parent.
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// The shape of the section.
    pub fn section_kind(&self) -> SectionKind {
        self.section.section_kind().unwrap_or_default()
    }

    /// Whether the descriptor selects a panel.
    pub fn is_panel(&self) -> bool {
        self.control_type() == Some(ControlKind::PanelContainer)
    }

    /// Initialize the container.
    ///
    /// Normalizes the descriptor, builds the children it describes, registers
    /// the container's section with `parent` and then adds the children. If a
    /// described child fails, the error is returned, the container is not
    /// registered and its section and child list stay as they were.
    pub fn initialize(&mut self, parent: Option<&ParentLink>) -> Result<()> {
        self.base.ensure_uninitialized()?;
        let settings = config::current();
        let _span = tracing::debug_span!(
            target: targets::CONTAINER,
            span_names::INITIALIZE,
            name = self.base.name()
        )
        .entered();

        self.normalize(&settings)?;

        let section_kind = self.section_kind();
        let is_panel = self.is_panel();
        let content = self
            .base
            .content_mut()
            .ok_or(ConfigurationError::MissingContent {
                control: "ContainerControl",
            })?;
        content.field.required.get_or_insert(false);
        match content.section {
            Some(kind) if kind != section_kind => {
                tracing::warn!(
                    target: targets::CONTAINER,
                    name = content.field.name(),
                    requested = %kind,
                    actual = %section_kind,
                    "section shape is fixed at construction; descriptor value replaced"
                );
                content.section = Some(section_kind);
            }
            Some(_) => {}
            None => content.section = Some(section_kind),
        }
        if is_panel {
            content.expanded.get_or_insert(true);
        }
        let name = content.field.name().to_owned();
        let described = content.children.clone();

        let (staged, staging) = self.build_described(described)?;

        if let Some(parent) = parent {
            let registration = parent.attach(&name, Some(self.section.clone()))?;
            self.base.set_registration(registration);
        }

        if !staged.is_empty() {
            self.adopt_staged(&staging);
            self.children.extend(staged);
            self.children_changed.emit(());
        }
        self.base.mark_initialized();
        tracing::debug!(
            target: targets::CONTAINER,
            %name,
            children = self.children.len(),
            "initialized container"
        );
        Ok(())
    }

    /// Build and initialize the described children against a copy of the
    /// section.
    ///
    /// The section itself is untouched; [`adopt_staged`](Self::adopt_staged)
    /// moves the children's nodes over once the whole container succeeds.
    fn build_described(
        &self,
        described: Vec<ControlContent>,
    ) -> Result<(Vec<Box<dyn FormControl>>, FormNode)> {
        let staging = self.section.deep_clone();
        if described.is_empty() {
            return Ok((Vec::new(), staging));
        }
        let link = ParentLink::new(self.id, staging.clone());
        let mut built = Vec::with_capacity(described.len());
        for content in described {
            let mut child = create_control(content)?;
            if let Err(err) = child.initialize(Some(&link)) {
                tracing::debug!(target: targets::CONTAINER, error = %err, "described child rejected");
                return Err(err);
            }
            built.push(child);
        }
        Ok((built, staging))
    }

    /// Move the nodes registered in `staging` after the copy was taken into
    /// the section.
    fn adopt_staged(&self, staging: &FormNode) {
        match (&self.section, staging) {
            (FormNode::Group(live), FormNode::Group(staged)) => {
                for (name, node) in staged.children() {
                    if !live.contains(&name) {
                        live.add_child(name, node);
                    }
                }
            }
            (FormNode::List(live), FormNode::List(staged)) => {
                for index in live.len()..staged.len() {
                    if let Some(node) = staged.at(index) {
                        live.push(node);
                    }
                }
            }
            _ => {}
        }
    }

    /// Initialize `child` against this container and append it.
    ///
    /// Returns the child's index in the container. On failure the child is
    /// dropped and neither the child list nor the section changes.
    pub fn add_child<C: FormControl>(&mut self, child: C) -> Result<usize> {
        self.add_boxed(Box::new(child))
    }

    /// Boxed form of [`add_child`](Self::add_child).
    pub fn add_boxed(&mut self, mut child: Box<dyn FormControl>) -> Result<usize> {
        let _span = tracing::trace_span!(
            target: targets::CONTAINER,
            span_names::REGISTER,
            container = %self.id
        )
        .entered();

        let link = ParentLink::new(self.id, self.section.clone());
        if let Err(err) = child.initialize(Some(&link)) {
            tracing::debug!(target: targets::CONTAINER, error = %err, "child rejected");
            return Err(err);
        }

        let index = self.children.len();
        self.children.push(child);
        self.children_changed.emit(());
        Ok(index)
    }

    /// The name the next child of a list container must have.
    ///
    /// For group containers this is the child count, which callers are free
    /// to ignore.
    pub fn next_list_name(&self) -> String {
        match &self.section {
            FormNode::List(list) => list.len().to_string(),
            _ => self.children.len().to_string(),
        }
    }

    pub fn child(&self, index: usize) -> Option<&dyn FormControl> {
        self.children.get(index).map(|child| child.as_ref())
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut dyn FormControl> {
        match self.children.get_mut(index) {
            Some(child) => Some(child.as_mut()),
            None => None,
        }
    }

    /// Find a direct child by name.
    pub fn child_by_name(&self, name: &str) -> Option<&dyn FormControl> {
        self.children
            .iter()
            .find(|child| child.name() == name)
            .map(|child| child.as_ref())
    }

    /// Find a direct child by name.
    pub fn child_by_name_mut(&mut self, name: &str) -> Option<&mut dyn FormControl> {
        match self.children.iter_mut().find(|child| child.name() == name) {
            Some(child) => Some(child.as_mut()),
            None => None,
        }
    }

    /// Downcast the child at `index` to a concrete control type.
    pub fn child_as<T: FormControl>(&self, index: usize) -> Option<&T> {
        self.children.get(index)?.as_any().downcast_ref::<T>()
    }

    /// Downcast the child at `index` to a concrete control type.
    pub fn child_as_mut<T: FormControl>(&mut self, index: usize) -> Option<&mut T> {
        self.children.get_mut(index)?.as_any_mut().downcast_mut::<T>()
    }

    /// Iterate over the children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &dyn FormControl> {
        self.children.iter().map(|child| child.as_ref())
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The section this container's children register into.
    pub fn form_section(&self) -> &FormNode {
        &self.section
    }

    /// The aggregated value of the section.
    pub fn value(&self) -> Value {
        self.section.value()
    }

    pub fn valid(&self) -> bool {
        self.section.valid()
    }

    /// An independent structural copy of the section.
    pub fn clone_section(&self) -> FormNode {
        clone_section(&self.section)
    }

    /// The panel description.
    pub fn description(&self) -> Option<&str> {
        self.content().and_then(|content| content.description.as_deref())
    }

    /// Whether the panel is expanded. Simple containers are always expanded.
    pub fn expanded(&self) -> bool {
        self.content()
            .and_then(|content| content.expanded)
            .unwrap_or(true)
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        if let Some(content) = self.content_mut() {
            content.expanded = Some(expanded);
        }
    }

    /// Flip the expanded state and return the new state.
    pub fn toggle_expanded(&mut self) -> bool {
        let expanded = !self.expanded();
        self.set_expanded(expanded);
        expanded
    }
}

impl Normalizable for ContainerControl {
    type Content = ContainerContent;

    fn base(&self) -> &FieldControlBase<ContainerContent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FieldControlBase<ContainerContent> {
        &mut self.base
    }

    fn default_label(&self) -> Option<&str> {
        if self.is_panel() {
            Some("Panel")
        } else {
            Some("Container")
        }
    }
}

impl FormControl for ContainerControl {
    fn field_content(&self) -> Option<&FieldContent> {
        self.base.content().map(|content| &content.field)
    }

    fn field_content_mut(&mut self) -> Option<&mut FieldContent> {
        self.base.content_mut().map(|content| &mut content.field)
    }

    fn initialize(&mut self, parent: Option<&ParentLink>) -> Result<()> {
        ContainerControl::initialize(self, parent)
    }

    fn is_initialized(&self) -> bool {
        self.base.is_initialized()
    }

    fn form_node(&self) -> Option<FormNode> {
        Some(self.section.clone())
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

impl fmt::Debug for ContainerControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerControl")
            .field("id", &self.id)
            .field("name", &self.base.name())
            .field("section", &self.section_kind())
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionControl;
    use crate::content::{ActionContent, InputContent};
    use crate::controls::{IdentifierInput, RnpsInput, TextInput};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use serde_json::json;

    fn group(name: &str) -> ContainerControl {
        let mut container = ContainerControl::from_content(ContainerContent::new(
            name,
            ControlKind::SimpleContainer,
        ));
        container.initialize(None).unwrap();
        container
    }

    #[test]
    fn test_defaults() {
        let container = group("journal");
        let content = container.content().unwrap();
        assert_eq!(content.field.label.as_deref(), Some("Container"));
        assert_eq!(content.field.width.as_deref(), Some("15em"));
        assert_eq!(content.section, Some(SectionKind::Group));
        assert_eq!(content.expanded, None);
        assert!(container.expanded());
        assert!(!container.is_panel());
    }

    #[test]
    fn test_group_children() {
        let mut container = group("journal");
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = changes.clone();
        container.children_changed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let index = container
            .add_child(TextInput::from_content(
                InputContent::new("title", ControlKind::Text).with_value(json!("Revista")),
            ))
            .unwrap();
        assert_eq!(index, 0);
        container
            .add_child(RnpsInput::from_content(InputContent::new("rnps", ControlKind::Rnps)))
            .unwrap();

        assert_eq!(container.child_count(), 2);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
        assert_eq!(container.value(), json!({ "title": "Revista", "rnps": "" }));
        assert!(!container.valid());

        let rnps = container.child_by_name("rnps").unwrap();
        assert_eq!(rnps.registration().unwrap().container(), container.id());
        assert!(container.child_as::<RnpsInput>(1).is_some());
        assert!(container.child_as::<TextInput>(1).is_none());
    }

    #[test]
    fn test_failed_child_leaves_no_trace() {
        let mut container = group("journal");
        container
            .add_child(IdentifierInput::from_content(InputContent::new("id", ControlKind::Identifier)))
            .unwrap();

        let err = container
            .add_child(IdentifierInput::from_content(InputContent::new("id", ControlKind::Identifier)))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateName { .. }));

        let err = container.add_child(TextInput::new()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingContent { .. }));

        assert_eq!(container.child_count(), 1);
        assert_eq!(container.form_section().as_group().unwrap().len(), 1);
    }

    #[test]
    fn test_list_names() {
        let mut list = ContainerControl::new(SectionKind::List);
        list.set_content(ContainerContent::new("codes", ControlKind::SimpleContainer));
        list.initialize(None).unwrap();
        assert_eq!(list.content().unwrap().section, Some(SectionKind::List));

        let err = list
            .add_child(RnpsInput::from_content(InputContent::new("first", ControlKind::Rnps)))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::ListNameMismatch { .. }));
        assert_eq!(list.next_list_name(), "0");

        list.add_child(RnpsInput::from_content(InputContent::new("0", ControlKind::Rnps)))
            .unwrap();
        assert_eq!(list.next_list_name(), "1");
    }

    #[test]
    fn test_actions_are_not_in_section() {
        let mut list = ContainerControl::new(SectionKind::List);
        list.add_child(ActionControl::from_content(ActionContent::new("save")))
            .unwrap();
        assert_eq!(list.child_count(), 1);
        assert_eq!(list.next_list_name(), "0");
        assert_eq!(list.value(), json!([]));
    }

    #[test]
    fn test_nested_containers() {
        let mut form = group("form");
        let mut address = ContainerControl::from_content(
            ContainerContent::new("address", ControlKind::PanelContainer)
                .with_description("Postal address"),
        );
        address
            .add_child(TextInput::from_content(
                InputContent::new("city", ControlKind::Text).with_value(json!("Pinar")),
            ))
            .unwrap();
        form.add_child(address).unwrap();

        assert_eq!(form.value(), json!({ "address": { "city": "Pinar" } }));
        let address = form.child_as::<ContainerControl>(0).unwrap();
        assert!(address.is_panel());
        assert_eq!(address.content().unwrap().field.label.as_deref(), Some("Panel"));
        assert_eq!(address.description(), Some("Postal address"));
        assert!(address.expanded());
    }

    #[test]
    fn test_panel_toggle() {
        let mut panel = ContainerControl::from_content(
            ContainerContent::new("extra", ControlKind::PanelContainer).with_expanded(false),
        );
        panel.initialize(None).unwrap();
        assert!(!panel.expanded());
        assert!(panel.toggle_expanded());
        assert!(panel.expanded());
    }

    #[test]
    fn test_described_children() {
        let content = ContainerContent::new("journal", ControlKind::SimpleContainer)
            .with_child(InputContent::new("id", ControlKind::Identifier))
            .with_child(InputContent::new("code", ControlKind::Rnps).with_value(json!("1234")));
        let mut container = ContainerControl::from_content(content);
        container.initialize(None).unwrap();

        assert_eq!(container.child_count(), 2);
        assert_eq!(container.value(), json!({ "id": "", "code": "1234" }));
        assert_eq!(container.content().unwrap().children.len(), 2);
    }

    #[test]
    fn test_failed_described_child_leaves_container_untouched() {
        let content = ContainerContent::new("journal", ControlKind::SimpleContainer)
            .with_child(InputContent::new("id", ControlKind::Identifier))
            .with_child(InputContent::new("code", ControlKind::Rnps).with_value(json!(1234)));
        let mut container = ContainerControl::from_content(content);

        for _ in 0..2 {
            let err = container.initialize(None).unwrap_err();
            assert!(matches!(err, ConfigurationError::InvalidValueType { .. }));
            assert_eq!(container.child_count(), 0);
            assert_eq!(container.value(), json!({}));
            assert!(!container.is_initialized());
        }
    }

    #[test]
    fn test_clone_section_is_independent() {
        let mut container = group("journal");
        container
            .add_child(TextInput::from_content(InputContent::new("title", ControlKind::Text)))
            .unwrap();
        let copy = container.clone_section();

        let title = container.child_as_mut::<TextInput>(0).unwrap();
        title.input(json!("Nueva"));
        assert_eq!(container.value(), json!({ "title": "Nueva" }));
        assert_eq!(copy.value(), json!({ "title": "" }));
    }
}
