//! Validation rules for value trackers.
//!
//! A [`Validator`] inspects a tracker value and either accepts it or reports a
//! [`ValidationError`] under a well-known key (`required`, `pattern`, ...).
//! The failures of every rule attached to a tracker are collected in a
//! [`ValidationErrors`] set, which controls turn into human-readable messages.
//!
//! Validation failures are plain data. They are queried by the rendering
//! layer on every repaint and are never raised as `Err`.
//!
//! # Built-in Validators
//!
//! - [`RequiredValidator`]: The value must not be empty
//! - [`PatternValidator`]: The value must match a regular expression
//! - [`EqualLengthValidator`]: The value must have an exact length
//! - [`MinLengthValidator`] / [`MaxLengthValidator`]: Length bounds
//! - [`EmailValidator`]: The value must look like an email address
//! - [`CustomValidator`]: Any closure
//!
//! # Example
//!
//! ```
//! use control_schema_core::validator::{PatternValidator, Validator};
//! use serde_json::json;
//!
//! let digits = PatternValidator::new("^[0-9]*$").unwrap();
//! assert!(digits.validate(&json!("1234")).is_none());
//! assert_eq!(digits.validate(&json!("12a4")).unwrap().key(), "pattern");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Value, json};

/// Key reported by [`RequiredValidator`].
pub const REQUIRED: &str = "required";
/// Key reported by [`PatternValidator`].
pub const PATTERN: &str = "pattern";
/// Key reported by [`EqualLengthValidator`].
pub const EQUAL_LENGTH: &str = "equalLength";
/// Key reported by [`MinLengthValidator`].
pub const MIN_LENGTH: &str = "minlength";
/// Key reported by [`MaxLengthValidator`].
pub const MAX_LENGTH: &str = "maxlength";
/// Key reported by [`EmailValidator`].
pub const EMAIL: &str = "email";

/// Returns true if the value counts as "nothing entered".
///
/// `null`, the empty string and the empty array are empty. Every rule except
/// [`RequiredValidator`] accepts empty values, leaving that decision to
/// `required`.
pub fn is_empty_input_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Returns true if the value is falsy: `null`, `false`, `0`, `NaN` or `""`.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// The length of a value that has one (strings count characters).
fn value_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// The text a pattern is tested against.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A single rule failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    key: String,
    details: Value,
}

impl ValidationError {
    /// Create a failure for the given rule key with extra details.
    pub fn new(key: impl Into<String>, details: Value) -> Self {
        Self {
            key: key.into(),
            details,
        }
    }

    /// The key of the rule that failed.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rule-specific details (required length, actual value, ...).
    pub fn details(&self) -> &Value {
        &self.details
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.details)
    }
}

/// The set of rule failures of a tracker, keyed by rule key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Value>,
}

impl ValidationErrors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. A later failure under the same key replaces the earlier one.
    pub fn insert(&mut self, error: ValidationError) {
        self.errors.insert(error.key, error.details);
    }

    /// Returns true if the rule with the given key failed.
    pub fn contains(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    /// Details of the failure recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.errors.get(key)
    }

    /// Number of failed rules.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no rule failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Keys of the failed rules, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Iterate over `(key, details)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the set as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.errors.clone().into_iter().collect())
    }
}

/// Trait for validation rules.
///
/// Validators must be `Send + Sync` so that rule sets can be shared between
/// a tracker and its clones.
pub trait Validator: Send + Sync {
    /// The key under which failures of this rule are reported.
    fn key(&self) -> &str;

    /// Validate a value, returning the failure if the value is not acceptable.
    fn validate(&self, value: &Value) -> Option<ValidationError>;
}

impl<V: Validator + ?Sized> Validator for Arc<V> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        (**self).validate(value)
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn key(&self) -> &str {
        (**self).key()
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        (**self).validate(value)
    }
}

/// An ordered, shareable collection of rules.
///
/// Cloning a set shares the rules themselves; rules are immutable once added.
#[derive(Clone, Default)]
pub struct ValidatorSet {
    rules: Vec<Arc<dyn Validator>>,
}

impl ValidatorSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, builder style.
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.push(validator);
        self
    }

    /// Add a rule.
    pub fn push(&mut self, validator: impl Validator + 'static) {
        self.rules.push(Arc::new(validator));
    }

    /// Add an already shared rule.
    pub fn push_shared(&mut self, validator: Arc<dyn Validator>) {
        self.rules.push(validator);
    }

    /// Returns true if a rule with the given key is present.
    pub fn has(&self, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.key() == key)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Keys of the rules, in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.key()).collect()
    }

    /// Run every rule against `value` and collect the failures.
    pub fn run(&self, value: &Value) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for rule in &self.rules {
            if let Some(error) = rule.validate(value) {
                errors.insert(error);
            }
        }
        errors
    }
}

impl fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// The value must not be empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl Validator for RequiredValidator {
    fn key(&self) -> &str {
        REQUIRED
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        is_empty_input_value(value).then(|| ValidationError::new(REQUIRED, Value::Bool(true)))
    }
}

/// The value must match a regular expression.
///
/// Patterns given as strings are anchored at both ends unless they already
/// are. Empty values are accepted.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
}

impl PatternValidator {
    /// Create a pattern validator from a pattern string.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let mut anchored = String::with_capacity(pattern.len() + 2);
        if !pattern.starts_with('^') {
            anchored.push('^');
        }
        anchored.push_str(pattern);
        if !pattern.ends_with('$') {
            anchored.push('$');
        }
        Ok(Self {
            pattern: Regex::new(&anchored)?,
        })
    }

    /// Create a pattern validator from an already compiled expression, used as is.
    pub fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Get the pattern string.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Validator for PatternValidator {
    fn key(&self) -> &str {
        PATTERN
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        if is_empty_input_value(value) {
            return None;
        }
        let text = value_text(value)?;
        if self.pattern.is_match(&text) {
            None
        } else {
            Some(ValidationError::new(
                PATTERN,
                json!({ "requiredPattern": self.pattern.as_str(), "actualValue": text }),
            ))
        }
    }
}

/// The value must have exactly `length` characters (or items).
///
/// Non-empty values without a length, such as numbers, always fail.
#[derive(Debug, Clone, Copy)]
pub struct EqualLengthValidator {
    length: usize,
}

impl EqualLengthValidator {
    /// Create a validator for the given exact length.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// The required length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Validator for EqualLengthValidator {
    fn key(&self) -> &str {
        EQUAL_LENGTH
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        if is_empty_input_value(value) {
            return None;
        }
        let Some(actual) = value_length(value) else {
            return Some(ValidationError::new(
                EQUAL_LENGTH,
                json!({ "requiredLength": self.length, "actualValue": value }),
            ));
        };
        (actual != self.length).then(|| {
            ValidationError::new(
                EQUAL_LENGTH,
                json!({ "requiredLength": self.length, "actualLength": actual }),
            )
        })
    }
}

/// The value must have at least `length` characters (or items).
#[derive(Debug, Clone, Copy)]
pub struct MinLengthValidator {
    length: usize,
}

impl MinLengthValidator {
    /// Create a validator for the given minimum length.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Validator for MinLengthValidator {
    fn key(&self) -> &str {
        MIN_LENGTH
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        if is_empty_input_value(value) {
            return None;
        }
        let actual = value_length(value)?;
        (actual < self.length).then(|| {
            ValidationError::new(
                MIN_LENGTH,
                json!({ "requiredLength": self.length, "actualLength": actual }),
            )
        })
    }
}

/// The value must have at most `length` characters (or items).
#[derive(Debug, Clone, Copy)]
pub struct MaxLengthValidator {
    length: usize,
}

impl MaxLengthValidator {
    /// Create a validator for the given maximum length.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Validator for MaxLengthValidator {
    fn key(&self) -> &str {
        MAX_LENGTH
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        let actual = value_length(value)?;
        (actual > self.length).then(|| {
            ValidationError::new(
                MAX_LENGTH,
                json!({ "requiredLength": self.length, "actualLength": actual }),
            )
        })
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// The value must look like an email address.
///
/// Addresses are limited to 254 characters overall and 64 characters in the
/// local part. Empty values are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl EmailValidator {
    fn accepts(text: &str) -> bool {
        let local_len = text.split('@').next().map_or(0, str::len);
        (1..=254).contains(&text.len())
            && (1..=64).contains(&local_len)
            && EMAIL_PATTERN.is_match(text)
    }
}

impl Validator for EmailValidator {
    fn key(&self) -> &str {
        EMAIL
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        if is_empty_input_value(value) {
            return None;
        }
        let accepted = value.as_str().is_some_and(Self::accepts);
        (!accepted).then(|| ValidationError::new(EMAIL, Value::Bool(true)))
    }
}

/// A custom validator that uses a closure for validation.
///
/// The closure returns `Some(details)` when the value fails the rule.
///
/// # Example
///
/// ```
/// use control_schema_core::validator::{CustomValidator, Validator};
/// use serde_json::{Value, json};
///
/// let even = CustomValidator::new("even", |value| {
///     let n = value.as_i64()?;
///     (n % 2 != 0).then(|| json!({ "actual": n }))
/// });
/// assert!(even.validate(&json!(4)).is_none());
/// assert!(even.validate(&json!(3)).is_some());
/// ```
pub struct CustomValidator<F>
where
    F: Fn(&Value) -> Option<Value> + Send + Sync,
{
    key: String,
    validate_fn: F,
}

impl<F> CustomValidator<F>
where
    F: Fn(&Value) -> Option<Value> + Send + Sync,
{
    /// Create a new custom validator reporting failures under `key`.
    pub fn new(key: impl Into<String>, validate_fn: F) -> Self {
        Self {
            key: key.into(),
            validate_fn,
        }
    }
}

impl<F> Validator for CustomValidator<F>
where
    F: Fn(&Value) -> Option<Value> + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn validate(&self, value: &Value) -> Option<ValidationError> {
        (self.validate_fn)(value).map(|details| ValidationError::new(self.key.clone(), details))
    }
}

impl<F> fmt::Debug for CustomValidator<F>
where
    F: Fn(&Value) -> Option<Value> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator")
            .field("key", &self.key)
            .finish()
    }
}
