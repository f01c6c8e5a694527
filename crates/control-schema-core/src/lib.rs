//! Core systems for Control Schema.
//!
//! This crate provides the reactive form model that form controls bind to:
//!
//! - **Signal/Slot System**: Synchronous change notification
//! - **Validators**: Keyed validation rules and error sets
//! - **Value Trackers**: Per-leaf value, rules, and dirty/touched state
//! - **Form Sections**: Group/list trees of trackers with structural cloning
//!   and on-demand value aggregation
//!
//! # Example
//!
//! ```
//! use control_schema_core::{FormList, FormNode, ValueTracker, ValidatorSet};
//! use control_schema_core::validator::EqualLengthValidator;
//! use serde_json::json;
//!
//! let codes = FormList::empty();
//! let code = ValueTracker::new(json!("1234"), ValidatorSet::new().with(EqualLengthValidator::new(4)));
//! codes.push(code.clone());
//!
//! code.set_value(json!("12"));
//! assert!(!codes.valid());
//!
//! let snapshot = FormNode::List(codes.clone()).deep_clone();
//! code.set_value(json!("5678"));
//! assert_eq!(snapshot.value(), json!(["12"]));
//! assert_eq!(codes.value(), json!(["5678"]));
//! ```

mod error;
pub mod logging;
pub mod section;
pub mod signal;
pub mod tracker;
pub mod validator;

pub use error::{Result, SectionError};
pub use logging::{FormTreeDebug, TreeFormatOptions, TreeStyle};
pub use section::{FormGroup, FormList, FormNode, SectionKind, clone_section};
pub use signal::{ConnectionId, Signal};
pub use tracker::{ControlStatus, ValueTracker};
pub use validator::{ValidationError, ValidationErrors, Validator, ValidatorSet};
