//! The form section model.
//!
//! A form is a tree of [`FormNode`]s mirroring the control hierarchy:
//!
//! - [`FormNode::Leaf`]: a [`ValueTracker`] owned by one input control
//! - [`FormNode::Group`]: a [`FormGroup`] of named children
//! - [`FormNode::List`]: a [`FormList`] of positional children
//!
//! Groups and lists are handles, like trackers. A container control owns the
//! section it was built with and hands out clones of the handle to the
//! children that register into it. Sections are append-only: children are
//! added at registration time and never removed.
//!
//! Section value and validity are derived on demand from the children, so a
//! change in a leaf is visible in every ancestor without explicit propagation.
//!
//! # Example
//!
//! ```
//! use control_schema_core::{FormGroup, FormNode, ValueTracker};
//! use serde_json::json;
//!
//! let address = FormGroup::empty();
//! address.add_child("city", ValueTracker::with_value(json!("Pinar")));
//!
//! let form = FormGroup::empty();
//! form.add_child("name", ValueTracker::with_value(json!("Ana")));
//! form.add_child("address", address);
//!
//! assert_eq!(form.value(), json!({ "name": "Ana", "address": { "city": "Pinar" } }));
//!
//! let copy = FormNode::from(form.clone()).deep_clone();
//! copy.get("address.city").unwrap().set_value(json!("Havana")).unwrap();
//! assert_eq!(form.get("address").unwrap().value(), json!({ "city": "Pinar" }));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SectionError};
use crate::logging::targets;
use crate::tracker::{ControlStatus, ValueTracker};
use crate::validator::{ValidationErrors, ValidatorSet};

/// The shape of a section: named children or positional children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Children are looked up by name.
    #[default]
    Group,
    /// Children are ordered; a child's name is its index.
    List,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Group => write!(f, "group"),
            SectionKind::List => write!(f, "list"),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Status of a section from its own errors and its children's statuses.
fn section_status(own_errors: &ValidationErrors, children: &[FormNode]) -> ControlStatus {
    if !children.is_empty() && children.iter().all(FormNode::disabled) {
        return ControlStatus::Disabled;
    }
    if !own_errors.is_empty() {
        return ControlStatus::Invalid;
    }
    let any_invalid = children
        .iter()
        .any(|child| child.status() == ControlStatus::Invalid);
    if any_invalid {
        ControlStatus::Invalid
    } else {
        ControlStatus::Valid
    }
}

// =========================================================================
// FormNode
// =========================================================================

/// A node of the form section model.
#[derive(Clone)]
pub enum FormNode {
    /// A leaf value tracker.
    Leaf(ValueTracker),
    /// A group of named children.
    Group(FormGroup),
    /// A list of positional children.
    List(FormList),
}

impl FormNode {
    /// A short name for the node's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FormNode::Leaf(_) => "leaf",
            FormNode::Group(_) => "group",
            FormNode::List(_) => "list",
        }
    }

    /// The section kind, or `None` for a leaf.
    pub fn section_kind(&self) -> Option<SectionKind> {
        match self {
            FormNode::Leaf(_) => None,
            FormNode::Group(_) => Some(SectionKind::Group),
            FormNode::List(_) => Some(SectionKind::List),
        }
    }

    /// The tracker, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&ValueTracker> {
        match self {
            FormNode::Leaf(tracker) => Some(tracker),
            _ => None,
        }
    }

    /// The group, if this is a group.
    pub fn as_group(&self) -> Option<&FormGroup> {
        match self {
            FormNode::Group(group) => Some(group),
            _ => None,
        }
    }

    /// The list, if this is a list.
    pub fn as_list(&self) -> Option<&FormList> {
        match self {
            FormNode::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns true if both nodes are handles to the same underlying node.
    pub fn ptr_eq(&self, other: &FormNode) -> bool {
        match (self, other) {
            (FormNode::Leaf(a), FormNode::Leaf(b)) => a.ptr_eq(b),
            (FormNode::Group(a), FormNode::Group(b)) => a.ptr_eq(b),
            (FormNode::List(a), FormNode::List(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// The aggregated value of the node.
    pub fn value(&self) -> Value {
        match self {
            FormNode::Leaf(tracker) => tracker.value(),
            FormNode::Group(group) => group.value(),
            FormNode::List(list) => list.value(),
        }
    }

    /// The node's own rule failures (children are not included).
    pub fn errors(&self) -> ValidationErrors {
        match self {
            FormNode::Leaf(tracker) => tracker.errors(),
            FormNode::Group(group) => group.errors(),
            FormNode::List(list) => list.errors(),
        }
    }

    /// The node's validation status, including its descendants.
    pub fn status(&self) -> ControlStatus {
        match self {
            FormNode::Leaf(tracker) => tracker.status(),
            FormNode::Group(group) => group.status(),
            FormNode::List(list) => list.status(),
        }
    }

    /// Returns true if the status is [`ControlStatus::Valid`].
    pub fn valid(&self) -> bool {
        self.status() == ControlStatus::Valid
    }

    /// Returns true if the status is [`ControlStatus::Invalid`].
    pub fn invalid(&self) -> bool {
        self.status() == ControlStatus::Invalid
    }

    /// Returns true if the status is [`ControlStatus::Disabled`].
    pub fn disabled(&self) -> bool {
        self.status() == ControlStatus::Disabled
    }

    /// Returns true if the node or any descendant is dirty.
    pub fn dirty(&self) -> bool {
        match self {
            FormNode::Leaf(tracker) => tracker.dirty(),
            FormNode::Group(group) => group.dirty(),
            FormNode::List(list) => list.dirty(),
        }
    }

    /// Returns true if the node or any descendant is touched.
    pub fn touched(&self) -> bool {
        match self {
            FormNode::Leaf(tracker) => tracker.touched(),
            FormNode::Group(group) => group.touched(),
            FormNode::List(list) => list.touched(),
        }
    }

    /// Mark the node and every descendant touched.
    pub fn mark_all_as_touched(&self) {
        match self {
            FormNode::Leaf(tracker) => tracker.mark_as_touched(),
            FormNode::Group(group) => group.mark_all_as_touched(),
            FormNode::List(list) => list.mark_all_as_touched(),
        }
    }

    /// Set the value, requiring every child of a section to be supplied.
    pub fn set_value(&self, value: Value) -> Result<()> {
        match self {
            FormNode::Leaf(tracker) => {
                tracker.set_value(value);
                Ok(())
            }
            FormNode::Group(group) => group.set_value(value),
            FormNode::List(list) => list.set_value(value),
        }
    }

    /// Set the value of whichever children are supplied, ignoring the rest.
    pub fn patch_value(&self, value: Value) {
        match self {
            FormNode::Leaf(tracker) => tracker.patch_value(value),
            FormNode::Group(group) => group.patch_value(value),
            FormNode::List(list) => list.patch_value(value),
        }
    }

    /// Reset the node: leaves take the matching part of `value` (or `null`)
    /// and become pristine and untouched.
    pub fn reset(&self, value: Value) {
        match self {
            FormNode::Leaf(tracker) => tracker.reset(value),
            FormNode::Group(group) => group.reset(value),
            FormNode::List(list) => list.reset(value),
        }
    }

    /// Look up a descendant by a dotted path such as `"address.city"` or `"items.0"`.
    pub fn get(&self, path: &str) -> Option<FormNode> {
        let mut current = self.clone();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match &current {
                FormNode::Leaf(_) => return None,
                FormNode::Group(group) => group.child(segment)?,
                FormNode::List(list) => list.at(segment.parse().ok()?)?,
            };
        }
        Some(current)
    }

    /// Structurally clone the node.
    ///
    /// The copy has the same shape, the same names in the same order, and
    /// the same rules at every level, but shares no mutable state with the
    /// source. Leaves carry the source value; all interaction state starts
    /// pristine.
    pub fn deep_clone(&self) -> FormNode {
        match self {
            FormNode::Leaf(tracker) => FormNode::Leaf(tracker.deep_clone()),
            FormNode::Group(group) => FormNode::Group(group.deep_clone()),
            FormNode::List(list) => FormNode::List(list.deep_clone()),
        }
    }
}

impl From<ValueTracker> for FormNode {
    fn from(tracker: ValueTracker) -> Self {
        FormNode::Leaf(tracker)
    }
}

impl From<FormGroup> for FormNode {
    fn from(group: FormGroup) -> Self {
        FormNode::Group(group)
    }
}

impl From<FormList> for FormNode {
    fn from(list: FormList) -> Self {
        FormNode::List(list)
    }
}

impl fmt::Debug for FormNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormNode::Leaf(tracker) => tracker.fmt(f),
            FormNode::Group(group) => group.fmt(f),
            FormNode::List(list) => list.fmt(f),
        }
    }
}

/// Return a structural clone of `node`. See [`FormNode::deep_clone`].
pub fn clone_section(node: &FormNode) -> FormNode {
    tracing::debug!(target: targets::SECTION, kind = node.kind_name(), "cloning form section");
    node.deep_clone()
}

// =========================================================================
// FormGroup
// =========================================================================

struct GroupInner {
    validators: ValidatorSet,
    children: Vec<(String, FormNode)>,
}

/// A section of named children.
///
/// Names are unique and iteration follows insertion order.
#[derive(Clone)]
pub struct FormGroup {
    inner: Arc<RwLock<GroupInner>>,
}

impl FormGroup {
    /// Create an empty group validated by `validators`.
    pub fn new(validators: ValidatorSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(GroupInner {
                validators,
                children: Vec::new(),
            })),
        }
    }

    /// Create an empty group without rules.
    pub fn empty() -> Self {
        Self::new(ValidatorSet::new())
    }

    /// Returns true if both handles refer to the same group.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Add a child under `name`.
    ///
    /// An existing child with the same name is kept and `false` is returned.
    pub fn add_child(&self, name: impl Into<String>, node: impl Into<FormNode>) -> bool {
        let name = name.into();
        let mut inner = self.inner.write();
        if inner.children.iter().any(|(existing, _)| *existing == name) {
            tracing::warn!(target: targets::SECTION, %name, "group already has a child with this name");
            return false;
        }
        tracing::trace!(target: targets::SECTION, %name, "adding child to group");
        inner.children.push((name, node.into()));
        true
    }

    /// Get the child registered under `name`.
    pub fn child(&self, name: &str) -> Option<FormNode> {
        self.inner
            .read()
            .children
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node.clone())
    }

    /// Look up a descendant by dotted path.
    pub fn get(&self, path: &str) -> Option<FormNode> {
        FormNode::Group(self.clone()).get(path)
    }

    /// Returns true if a child is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .children
            .iter()
            .any(|(existing, _)| existing == name)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.inner.read().children.len()
    }

    /// Returns true if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.inner.read().children.is_empty()
    }

    /// Child names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .children
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Snapshot of the `(name, child)` pairs in insertion order.
    pub fn children(&self) -> Vec<(String, FormNode)> {
        self.inner.read().children.clone()
    }

    /// The group's own rules.
    pub fn validators(&self) -> ValidatorSet {
        self.inner.read().validators.clone()
    }

    /// The aggregated value: an object of the enabled children's values.
    pub fn value(&self) -> Value {
        let mut map = Map::new();
        for (name, child) in self.children() {
            if !child.disabled() {
                map.insert(name, child.value());
            }
        }
        Value::Object(map)
    }

    /// Failures of the group's own rules against the aggregated value.
    pub fn errors(&self) -> ValidationErrors {
        let validators = self.validators();
        validators.run(&self.value())
    }

    /// The group's status, including its children.
    pub fn status(&self) -> ControlStatus {
        let children: Vec<FormNode> = self.children().into_iter().map(|(_, c)| c).collect();
        section_status(&self.errors(), &children)
    }

    /// Returns true if the status is [`ControlStatus::Valid`].
    pub fn valid(&self) -> bool {
        self.status() == ControlStatus::Valid
    }

    /// Returns true if any child is dirty.
    pub fn dirty(&self) -> bool {
        self.children().iter().any(|(_, child)| child.dirty())
    }

    /// Returns true if any child is touched.
    pub fn touched(&self) -> bool {
        self.children().iter().any(|(_, child)| child.touched())
    }

    /// Mark every descendant touched.
    pub fn mark_all_as_touched(&self) {
        for (_, child) in self.children() {
            child.mark_all_as_touched();
        }
    }

    /// Set every child from an object that names all of them.
    ///
    /// The value is checked before anything is modified: a missing or
    /// unknown name leaves the group unchanged.
    pub fn set_value(&self, value: Value) -> Result<()> {
        let Value::Object(mut map) = value else {
            return Err(SectionError::shape_mismatch("object", json_kind(&value)));
        };
        let children = self.children();
        for (name, _) in &children {
            if !map.contains_key(name) {
                return Err(SectionError::missing_control(name.clone()));
            }
        }
        if let Some(unknown) = map
            .keys()
            .find(|key| !children.iter().any(|(name, _)| name == *key))
        {
            return Err(SectionError::missing_control(unknown.clone()));
        }
        for (name, child) in children {
            if let Some(child_value) = map.remove(&name) {
                child.set_value(child_value)?;
            }
        }
        Ok(())
    }

    /// Set the children named in an object, ignoring everything else.
    pub fn patch_value(&self, value: Value) {
        let Value::Object(mut map) = value else {
            return;
        };
        for (name, child) in self.children() {
            if let Some(child_value) = map.remove(&name) {
                child.patch_value(child_value);
            }
        }
    }

    /// Reset every child from the matching entry of `value` (or `null`).
    pub fn reset(&self, value: Value) {
        let mut map = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (name, child) in self.children() {
            child.reset(map.remove(&name).unwrap_or(Value::Null));
        }
    }

    /// Structurally clone the group. See [`FormNode::deep_clone`].
    pub fn deep_clone(&self) -> FormGroup {
        let copy = FormGroup::new(self.validators());
        for (name, child) in self.children() {
            copy.add_child(name, child.deep_clone());
        }
        copy
    }
}

impl Default for FormGroup {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, child) in self.children() {
            map.entry(&name, &child);
        }
        map.finish()
    }
}

// =========================================================================
// FormList
// =========================================================================

struct ListInner {
    validators: ValidatorSet,
    children: Vec<FormNode>,
}

/// A section of positional children.
#[derive(Clone)]
pub struct FormList {
    inner: Arc<RwLock<ListInner>>,
}

impl FormList {
    /// Create an empty list validated by `validators`.
    pub fn new(validators: ValidatorSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ListInner {
                validators,
                children: Vec::new(),
            })),
        }
    }

    /// Create an empty list without rules.
    pub fn empty() -> Self {
        Self::new(ValidatorSet::new())
    }

    /// Returns true if both handles refer to the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Append a child and return its index.
    pub fn push(&self, node: impl Into<FormNode>) -> usize {
        let mut inner = self.inner.write();
        inner.children.push(node.into());
        let index = inner.children.len() - 1;
        tracing::trace!(target: targets::SECTION, index, "appending child to list");
        index
    }

    /// Get the child at `index`.
    pub fn at(&self, index: usize) -> Option<FormNode> {
        self.inner.read().children.get(index).cloned()
    }

    /// Look up a descendant by dotted path.
    pub fn get(&self, path: &str) -> Option<FormNode> {
        FormNode::List(self.clone()).get(path)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.inner.read().children.len()
    }

    /// Returns true if the list has no children.
    pub fn is_empty(&self) -> bool {
        self.inner.read().children.is_empty()
    }

    /// Snapshot of the children in order.
    pub fn children(&self) -> Vec<FormNode> {
        self.inner.read().children.clone()
    }

    /// The list's own rules.
    pub fn validators(&self) -> ValidatorSet {
        self.inner.read().validators.clone()
    }

    /// The aggregated value: an array of the enabled children's values.
    pub fn value(&self) -> Value {
        Value::Array(
            self.children()
                .iter()
                .filter(|child| !child.disabled())
                .map(FormNode::value)
                .collect(),
        )
    }

    /// Failures of the list's own rules against the aggregated value.
    pub fn errors(&self) -> ValidationErrors {
        let validators = self.validators();
        validators.run(&self.value())
    }

    /// The list's status, including its children.
    pub fn status(&self) -> ControlStatus {
        section_status(&self.errors(), &self.children())
    }

    /// Returns true if the status is [`ControlStatus::Valid`].
    pub fn valid(&self) -> bool {
        self.status() == ControlStatus::Valid
    }

    /// Returns true if any child is dirty.
    pub fn dirty(&self) -> bool {
        self.children().iter().any(FormNode::dirty)
    }

    /// Returns true if any child is touched.
    pub fn touched(&self) -> bool {
        self.children().iter().any(FormNode::touched)
    }

    /// Mark every descendant touched.
    pub fn mark_all_as_touched(&self) {
        for child in self.children() {
            child.mark_all_as_touched();
        }
    }

    /// Set every child from an array with exactly one entry per child.
    pub fn set_value(&self, value: Value) -> Result<()> {
        let Value::Array(items) = value else {
            return Err(SectionError::shape_mismatch("array", json_kind(&value)));
        };
        let children = self.children();
        if items.len() < children.len() {
            return Err(SectionError::missing_control(items.len().to_string()));
        }
        if items.len() > children.len() {
            return Err(SectionError::IndexOutOfRange {
                index: children.len(),
                len: children.len(),
            });
        }
        for (child, item) in children.into_iter().zip(items) {
            child.set_value(item)?;
        }
        Ok(())
    }

    /// Set the children that have a matching array entry, ignoring the rest.
    pub fn patch_value(&self, value: Value) {
        let Value::Array(items) = value else {
            return;
        };
        for (child, item) in self.children().into_iter().zip(items) {
            child.patch_value(item);
        }
    }

    /// Reset every child from the matching array entry (or `null`).
    pub fn reset(&self, value: Value) {
        let mut items = match value {
            Value::Array(items) => items.into_iter(),
            _ => Vec::new().into_iter(),
        };
        for child in self.children() {
            child.reset(items.next().unwrap_or(Value::Null));
        }
    }

    /// Structurally clone the list. See [`FormNode::deep_clone`].
    pub fn deep_clone(&self) -> FormList {
        let copy = FormList::new(self.validators());
        for child in self.children() {
            copy.push(child.deep_clone());
        }
        copy
    }
}

impl Default for FormList {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for FormList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.children()).finish()
    }
}
