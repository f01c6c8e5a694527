//! The control abstraction and parent registration.
//!
//! Every concrete control implements [`FormControl`]. Containers hold their
//! children as `Box<dyn FormControl>` and hand each child a [`ParentLink`]
//! while it initializes. Registering through the link is the last step of a
//! child's initialization, so a child that fails to initialize leaves no trace
//! in its parent's section.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use control_schema_core::logging::targets;
use control_schema_core::{FormNode, SectionKind, ValueTracker};

use crate::content::{ControlKind, FieldContent};
use crate::error::{ConfigurationError, Result};

/// Identifies a container control.
///
/// Children refer to their parent container by id rather than by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// Where a control registered itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    container: ContainerId,
    section_kind: SectionKind,
}

impl Registration {
    /// The parent container.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// The shape of the parent's section.
    pub fn section_kind(&self) -> SectionKind {
        self.section_kind
    }
}

/// A container's offer to register a child into its section.
#[derive(Debug, Clone)]
pub struct ParentLink {
    container: ContainerId,
    section: FormNode,
}

impl ParentLink {
    pub(crate) fn new(container: ContainerId, section: FormNode) -> Self {
        Self { container, section }
    }

    /// The parent container.
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// The shape of the parent's section.
    pub fn section_kind(&self) -> SectionKind {
        self.section.section_kind().unwrap_or_default()
    }

    /// The name the next list child must have, or `None` for groups.
    pub fn next_list_name(&self) -> Option<String> {
        self.section.as_list().map(|list| list.len().to_string())
    }

    /// Check that `name` is acceptable in the parent's section.
    ///
    /// Group children must have unique names; list children must be named
    /// after the index they will occupy.
    pub fn check_name(&self, name: &str) -> Result<()> {
        match &self.section {
            FormNode::List(list) => {
                let expected = list.len().to_string();
                if name != expected {
                    return Err(ConfigurationError::ListNameMismatch {
                        name: name.to_owned(),
                        expected,
                    });
                }
            }
            FormNode::Group(group) => {
                if group.contains(name) {
                    return Err(ConfigurationError::DuplicateName {
                        name: name.to_owned(),
                    });
                }
            }
            FormNode::Leaf(_) => {}
        }
        Ok(())
    }

    /// Register a control with the parent.
    ///
    /// `node` is the control's section node; controls without one (actions)
    /// register with the container only.
    pub fn attach(&self, name: &str, node: Option<FormNode>) -> Result<Registration> {
        if let Some(node) = node {
            self.check_name(name)?;
            match &self.section {
                FormNode::List(list) => {
                    list.push(node);
                }
                FormNode::Group(group) => {
                    group.add_child(name, node);
                }
                FormNode::Leaf(_) => {}
            }
        }
        tracing::debug!(
            target: targets::CONTAINER,
            container = %self.container,
            %name,
            "registered control"
        );
        Ok(Registration {
            container: self.container,
            section_kind: self.section_kind(),
        })
    }
}

/// A form control that can live in a container.
pub trait FormControl: Any + Send + Sync {
    /// The control type, once a descriptor is assigned.
    fn control_type(&self) -> Option<ControlKind> {
        self.field_content().and_then(|field| field.control_type)
    }

    /// The descriptor's name, or `""` before a descriptor is assigned.
    fn name(&self) -> &str {
        self.field_content().map_or("", FieldContent::name)
    }

    /// The shared descriptor keys, once a descriptor is assigned.
    fn field_content(&self) -> Option<&FieldContent>;

    fn field_content_mut(&mut self) -> Option<&mut FieldContent>;

    /// Normalize the descriptor, wire the control to its model and, when
    /// `parent` is given, register it with the parent as the last step.
    fn initialize(&mut self, parent: Option<&ParentLink>) -> Result<()>;

    /// Whether [`initialize`](Self::initialize) has succeeded.
    fn is_initialized(&self) -> bool;

    /// The control's node in the form section model, once initialized.
    fn form_node(&self) -> Option<FormNode>;

    /// Where the control registered, if it has a parent.
    fn registration(&self) -> Option<&Registration>;

    /// The control as a trackable input, if it is one.
    fn as_trackable(&self) -> Option<&dyn Trackable> {
        None
    }

    fn as_trackable_mut(&mut self) -> Option<&mut dyn Trackable> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn FormControl + 'a {
    /// Downcast to a concrete control type.
    pub fn downcast_ref<T: FormControl>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcast to a concrete control type.
    pub fn downcast_mut<T: FormControl>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl fmt::Debug for dyn FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormControl")
            .field("name", &self.name())
            .field("control_type", &self.control_type())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// A control bound to a value tracker, with derived presentation state.
pub trait Trackable {
    /// The bound tracker, once resolved.
    fn tracker(&self) -> Option<ValueTracker>;

    /// True when no value has been entered.
    fn empty(&self) -> bool;

    /// True when the hint should be shown instead of the error.
    fn hint_state(&self) -> bool {
        self.empty()
    }

    /// True when the value is invalid and the user has interacted with it.
    fn error_state(&self) -> bool;

    /// The message to show in the error state, or `""`.
    fn error_message(&self) -> String;

    /// Process the tracker's current value after the user edited it.
    fn handle_input(&mut self);
}
