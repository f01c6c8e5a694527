//! Integration tests for the form section model.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use control_schema_core::validator::{EqualLengthValidator, RequiredValidator};
use control_schema_core::{
    ControlStatus, FormGroup, FormList, FormNode, SectionError, ValidatorSet, ValueTracker,
    clone_section,
};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample() -> (FormGroup, ValueTracker, ValueTracker) {
    init_tracing();
    let a = ValueTracker::with_value(json!("a"));
    let c = ValueTracker::new(json!("c"), ValidatorSet::new().with(RequiredValidator));
    let b = FormGroup::empty();
    b.add_child("c", c.clone());
    let root = FormGroup::empty();
    root.add_child("a", a.clone());
    root.add_child("b", b);
    (root, a, c)
}

#[test]
fn test_clone_preserves_shape_and_is_independent() {
    let (root, a, c) = sample();
    let copy = clone_section(&FormNode::Group(root.clone()));

    let copy_group = copy.as_group().unwrap();
    assert_eq!(copy_group.names(), ["a", "b"]);
    let copy_b = copy.get("b").unwrap();
    assert_eq!(copy_b.as_group().unwrap().names(), ["c"]);
    assert!(copy.get("a").unwrap().as_leaf().is_some());

    copy.get("b.c").unwrap().set_value(json!("changed")).unwrap();
    copy.get("a").unwrap().set_value(json!("")).unwrap();
    assert_eq!(c.value(), json!("c"));
    assert_eq!(a.value(), json!("a"));
    assert_eq!(root.value(), json!({ "a": "a", "b": { "c": "c" } }));
    assert_eq!(copy.value(), json!({ "a": "", "b": { "c": "changed" } }));

    // Rules are copied too.
    copy.get("b.c").unwrap().set_value(json!("")).unwrap();
    assert!(copy.invalid());
    assert!(root.valid());
}

#[test]
fn test_leaf_changes_reach_ancestors() {
    let (root, _, c) = sample();
    assert_eq!(root.status(), ControlStatus::Valid);
    c.set_value(json!(""));
    assert_eq!(root.status(), ControlStatus::Invalid);
    assert!(root.errors().is_empty());
    assert!(root.get("b").unwrap().invalid());
}

#[test]
fn test_set_value_is_strict() {
    let (root, _, _) = sample();
    let err = root.set_value(json!({ "a": "x" })).unwrap_err();
    assert!(matches!(err, SectionError::MissingControl { .. }));

    let err = root.set_value(json!(["x"])).unwrap_err();
    assert!(matches!(err, SectionError::ShapeMismatch { .. }));

    root.patch_value(json!({ "b": { "c": "patched" } }));
    assert_eq!(root.value(), json!({ "a": "a", "b": { "c": "patched" } }));
}

#[test]
fn test_list_of_codes() {
    let codes = FormList::empty();
    let changes = Arc::new(AtomicUsize::new(0));
    for code in ["1234", "5678", "9012"] {
        let tracker = ValueTracker::new(
            json!(code),
            ValidatorSet::new().with(EqualLengthValidator::new(4)),
        );
        let counter = changes.clone();
        tracker.value_changes().connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(codes.push(tracker), codes.len() - 1);
    }

    codes.at(1).unwrap().set_value(json!("56")).unwrap();
    assert_eq!(changes.load(Ordering::SeqCst), 1);
    assert!(!codes.valid());
    assert_eq!(codes.get("1").unwrap().value(), json!("56"));
    assert_eq!(codes.value(), json!(["1234", "56", "9012"]));
}

#[test]
fn test_disabled_children_are_excluded() {
    let (root, a, _) = sample();
    a.disable();
    assert_eq!(root.value(), json!({ "b": { "c": "c" } }));
    a.set_value(json!(null));
    assert!(root.valid());
}
