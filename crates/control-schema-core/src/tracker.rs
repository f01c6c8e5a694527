//! Value trackers.
//!
//! A [`ValueTracker`] holds the current value of one leaf control, the rules
//! it is validated against, and the interaction state the rendering layer
//! needs to decide when to show errors (`dirty`, `touched`).
//!
//! `ValueTracker` is a handle: cloning it shares the underlying state, which
//! is how a control and the form section it is registered in observe the
//! same value. Use [`ValueTracker::deep_clone`] for an independent copy.
//!
//! # Example
//!
//! ```
//! use control_schema_core::{ValueTracker, ValidatorSet};
//! use control_schema_core::validator::RequiredValidator;
//! use serde_json::json;
//!
//! let tracker = ValueTracker::new(json!(""), ValidatorSet::new().with(RequiredValidator));
//! assert!(tracker.invalid());
//!
//! tracker.set_value(json!("hello"));
//! assert!(tracker.valid());
//! assert!(tracker.pristine());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::logging::targets;
use crate::signal::Signal;
use crate::validator::{ValidationErrors, Validator, ValidatorSet};

/// The validation status of a tracker or section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlStatus {
    /// Every rule accepts the current value.
    Valid,
    /// At least one rule rejects the current value.
    Invalid,
    /// The control is excluded from validation and from its section's value.
    Disabled,
}

impl fmt::Display for ControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlStatus::Valid => write!(f, "VALID"),
            ControlStatus::Invalid => write!(f, "INVALID"),
            ControlStatus::Disabled => write!(f, "DISABLED"),
        }
    }
}

struct TrackerState {
    value: Value,
    validators: ValidatorSet,
    errors: ValidationErrors,
    dirty: bool,
    touched: bool,
    disabled: bool,
}

impl TrackerState {
    fn revalidate(&mut self) {
        self.errors = if self.disabled {
            ValidationErrors::new()
        } else {
            self.validators.run(&self.value)
        };
    }

    fn status(&self) -> ControlStatus {
        if self.disabled {
            ControlStatus::Disabled
        } else if self.errors.is_empty() {
            ControlStatus::Valid
        } else {
            ControlStatus::Invalid
        }
    }
}

struct TrackerShared {
    state: RwLock<TrackerState>,
    value_changes: Signal<Value>,
    status_changes: Signal<ControlStatus>,
}

/// Tracks the value and validity state of a single leaf control.
///
/// # Signals
///
/// - `value_changes`: Emitted with the new value after every value update
/// - `status_changes`: Emitted with the status after every revalidation
#[derive(Clone)]
pub struct ValueTracker {
    shared: Arc<TrackerShared>,
}

impl ValueTracker {
    /// Create a tracker with an initial value and a rule set.
    ///
    /// The value is validated immediately; the tracker starts pristine and untouched.
    pub fn new(value: Value, validators: ValidatorSet) -> Self {
        let mut state = TrackerState {
            value,
            validators,
            errors: ValidationErrors::new(),
            dirty: false,
            touched: false,
            disabled: false,
        };
        state.revalidate();

        Self {
            shared: Arc::new(TrackerShared {
                state: RwLock::new(state),
                value_changes: Signal::new(),
                status_changes: Signal::new(),
            }),
        }
    }

    /// Create a tracker without rules.
    pub fn with_value(value: Value) -> Self {
        Self::new(value, ValidatorSet::new())
    }

    /// Create an independent tracker with the same value and rules.
    ///
    /// The copy starts pristine and untouched and has no signal connections.
    pub fn deep_clone(&self) -> Self {
        let state = self.shared.state.read();
        let copy = Self::new(state.value.clone(), state.validators.clone());
        if state.disabled {
            copy.disable();
        }
        copy
    }

    /// Returns true if both handles refer to the same tracker.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    // =========================================================================
    // Value
    // =========================================================================

    /// Get the current value.
    pub fn value(&self) -> Value {
        self.shared.state.read().value.clone()
    }

    /// Access the current value without cloning.
    pub fn with_value_ref<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Value) -> R,
    {
        f(&self.shared.state.read().value)
    }

    /// Set the value, revalidate, and notify listeners.
    ///
    /// Setting a value programmatically does not mark the tracker dirty.
    pub fn set_value(&self, value: Value) {
        let status = {
            let mut state = self.shared.state.write();
            state.value = value.clone();
            state.revalidate();
            state.status()
        };
        tracing::trace!(target: targets::TRACKER, %status, "tracker value set");
        self.shared.value_changes.emit(value);
        self.shared.status_changes.emit(status);
    }

    /// Same as [`set_value`](Self::set_value); a leaf has no partial shape.
    pub fn patch_value(&self, value: Value) {
        self.set_value(value);
    }

    /// Reset to the given value and mark the tracker pristine and untouched.
    pub fn reset(&self, value: Value) {
        {
            let mut state = self.shared.state.write();
            state.dirty = false;
            state.touched = false;
        }
        self.set_value(value);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// The failures of the current value.
    pub fn errors(&self) -> ValidationErrors {
        self.shared.state.read().errors.clone()
    }

    /// Returns true if the rule with `key` currently fails.
    pub fn has_error(&self, key: &str) -> bool {
        self.shared.state.read().errors.contains(key)
    }

    /// The current validation status.
    pub fn status(&self) -> ControlStatus {
        self.shared.state.read().status()
    }

    /// Returns true if the status is [`ControlStatus::Valid`].
    pub fn valid(&self) -> bool {
        self.status() == ControlStatus::Valid
    }

    /// Returns true if the status is [`ControlStatus::Invalid`].
    pub fn invalid(&self) -> bool {
        self.status() == ControlStatus::Invalid
    }

    /// Add a rule and revalidate the current value.
    pub fn add_validator(&self, validator: impl Validator + 'static) {
        let status = {
            let mut state = self.shared.state.write();
            state.validators.push(validator);
            state.revalidate();
            state.status()
        };
        self.shared.status_changes.emit(status);
    }

    /// Returns true if a rule with the given key is attached.
    pub fn has_validator(&self, key: &str) -> bool {
        self.shared.state.read().validators.has(key)
    }

    /// The attached rules.
    pub fn validators(&self) -> ValidatorSet {
        self.shared.state.read().validators.clone()
    }

    // =========================================================================
    // Interaction state
    // =========================================================================

    /// Returns true if the user changed the value in the UI.
    pub fn dirty(&self) -> bool {
        self.shared.state.read().dirty
    }

    /// Returns true if the user has not changed the value in the UI.
    pub fn pristine(&self) -> bool {
        !self.dirty()
    }

    /// Returns true if the control was visited (blurred or edited).
    pub fn touched(&self) -> bool {
        self.shared.state.read().touched
    }

    /// Returns true if the control was never visited.
    pub fn untouched(&self) -> bool {
        !self.touched()
    }

    /// Mark the tracker dirty.
    pub fn mark_as_dirty(&self) {
        self.shared.state.write().dirty = true;
    }

    /// Mark the tracker pristine.
    pub fn mark_as_pristine(&self) {
        self.shared.state.write().dirty = false;
    }

    /// Mark the tracker touched. Only this tracker is affected.
    pub fn mark_as_touched(&self) {
        self.shared.state.write().touched = true;
    }

    /// Mark the tracker untouched.
    pub fn mark_as_untouched(&self) {
        self.shared.state.write().touched = false;
    }

    /// Returns true if the tracker is disabled.
    pub fn disabled(&self) -> bool {
        self.shared.state.read().disabled
    }

    /// Disable the tracker: its errors are cleared and it is excluded from
    /// its section's value and validity.
    pub fn disable(&self) {
        self.set_disabled(true);
    }

    /// Re-enable the tracker and revalidate.
    pub fn enable(&self) {
        self.set_disabled(false);
    }

    fn set_disabled(&self, disabled: bool) {
        let status = {
            let mut state = self.shared.state.write();
            state.disabled = disabled;
            state.revalidate();
            state.status()
        };
        self.shared.status_changes.emit(status);
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Signal emitted with the new value after every value update.
    pub fn value_changes(&self) -> &Signal<Value> {
        &self.shared.value_changes
    }

    /// Signal emitted with the status after every revalidation.
    pub fn status_changes(&self) -> &Signal<ControlStatus> {
        &self.shared.status_changes
    }
}

impl Default for ValueTracker {
    /// An empty-string tracker without rules.
    fn default() -> Self {
        Self::with_value(Value::String(String::new()))
    }
}

impl fmt::Debug for ValueTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.read();
        f.debug_struct("ValueTracker")
            .field("value", &state.value)
            .field("status", &state.status())
            .field("validators", &state.validators)
            .field("dirty", &state.dirty)
            .field("touched", &state.touched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{PatternValidator, RequiredValidator, REQUIRED};
    use parking_lot::Mutex;
    use serde_json::json;

    #[test]
    fn test_new_tracker_is_pristine_and_validated() {
        let tracker = ValueTracker::new(json!(""), ValidatorSet::new().with(RequiredValidator));
        assert!(tracker.invalid());
        assert!(tracker.has_error(REQUIRED));
        assert!(tracker.pristine());
        assert!(tracker.untouched());
    }

    #[test]
    fn test_set_value_revalidates_and_emits() {
        let tracker = ValueTracker::new(
            json!(""),
            ValidatorSet::new().with(PatternValidator::new("^[a-z]*$").unwrap()),
        );
        let values = Arc::new(Mutex::new(Vec::new()));
        let statuses = Arc::new(Mutex::new(Vec::new()));

        let values_clone = values.clone();
        tracker
            .value_changes()
            .connect(move |v| values_clone.lock().push(v.clone()));
        let statuses_clone = statuses.clone();
        tracker
            .status_changes()
            .connect(move |s| statuses_clone.lock().push(*s));

        tracker.set_value(json!("abc"));
        tracker.set_value(json!("abc1"));

        assert_eq!(*values.lock(), vec![json!("abc"), json!("abc1")]);
        assert_eq!(
            *statuses.lock(),
            vec![ControlStatus::Valid, ControlStatus::Invalid]
        );
        assert!(tracker.pristine());
    }

    #[test]
    fn test_handles_share_state() {
        let tracker = ValueTracker::with_value(json!("a"));
        let handle = tracker.clone();
        handle.set_value(json!("b"));
        handle.mark_as_touched();

        assert_eq!(tracker.value(), json!("b"));
        assert!(tracker.touched());
        assert!(tracker.ptr_eq(&handle));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let tracker = ValueTracker::new(json!("a"), ValidatorSet::new().with(RequiredValidator));
        tracker.mark_as_touched();

        let copy = tracker.deep_clone();
        assert!(!copy.ptr_eq(&tracker));
        assert_eq!(copy.value(), json!("a"));
        assert!(copy.has_validator(REQUIRED));
        assert!(copy.untouched());

        copy.set_value(json!("b"));
        assert_eq!(tracker.value(), json!("a"));
    }

    #[test]
    fn test_disable_clears_errors() {
        let tracker = ValueTracker::new(json!(""), ValidatorSet::new().with(RequiredValidator));
        tracker.disable();
        assert_eq!(tracker.status(), ControlStatus::Disabled);
        assert!(tracker.errors().is_empty());
        assert!(!tracker.valid());
        assert!(!tracker.invalid());

        tracker.enable();
        assert!(tracker.invalid());
    }

    #[test]
    fn test_reset() {
        let tracker = ValueTracker::with_value(json!("a"));
        tracker.mark_as_dirty();
        tracker.mark_as_touched();
        tracker.reset(json!(""));
        assert_eq!(tracker.value(), json!(""));
        assert!(tracker.pristine());
        assert!(tracker.untouched());
    }

    #[test]
    fn test_add_validator_revalidates() {
        let tracker = ValueTracker::with_value(json!(""));
        assert!(tracker.valid());
        tracker.add_validator(RequiredValidator);
        assert!(tracker.invalid());
        assert!(tracker.has_validator(REQUIRED));
    }
}
