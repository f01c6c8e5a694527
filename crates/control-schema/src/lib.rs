//! Control Schema: form controls described by data and bound to a reactive
//! form model.
//!
//! A form is described by content descriptors (see [`content`]). Each
//! descriptor is turned into a control: an input bound to a
//! [`ValueTracker`](control_schema_core::ValueTracker), a container owning a
//! section of the form model, or an action button. Initializing a control
//! normalizes its descriptor and registers it with its parent container, so
//! the form model tree mirrors the control tree.
//!
//! # Modules
//!
//! - [`content`]: descriptors, icons, hints, enums
//! - [`field`]: descriptor normalization shared by all controls
//! - [`input`]: the input control base and per-kind strategy
//! - [`controls`]: identifier, ISSN, RNPS, email, URL, select and text inputs
//! - [`container`]: simple and panel containers
//! - [`action`]: buttons
//! - [`config`]: library-wide defaults
//!
//! # Example
//!
//! ```
//! use control_schema::prelude::*;
//! use serde_json::json;
//!
//! let mut journal = ContainerControl::from_content(
//!     ContainerContent::new("journal", ControlKind::SimpleContainer).with_label("Journal"),
//! );
//! journal.initialize(None)?;
//! journal.add_child(IdentifierInput::from_content(InputContent::new("id", ControlKind::Identifier)))?;
//! journal.add_child(RnpsInput::from_content(
//!     InputContent::new("rnps", ControlKind::Rnps).with_value(json!("2106")),
//! ))?;
//!
//! assert_eq!(journal.value(), json!({ "id": "", "rnps": "2106" }));
//! assert!(journal.valid());
//! # Ok::<(), control_schema::ConfigurationError>(())
//! ```

pub mod action;
pub mod config;
pub mod container;
pub mod content;
pub mod control;
pub mod controls;
mod error;
pub mod factory;
pub mod field;
pub mod icon;
pub mod input;

pub use control::{ContainerId, FormControl, ParentLink, Registration, Trackable};
pub use error::{ConfigurationError, Result};
pub use factory::{build_form, create_control};
pub use field::{FieldControlBase, Normalizable, NormalizedField};
pub use input::{FieldKind, InputControl, InternalComponent};

/// Commonly used types.
pub mod prelude {
    pub use crate::action::ActionControl;
    pub use crate::container::ContainerControl;
    pub use crate::content::{
        ActionContent, Appearance, ButtonType, ContainerContent, ContentPosition, ControlContent,
        ControlKind, FieldContent, HintPosition, HintValue, IconSource, IconValue, InputContent,
        SelectOption, TextAlign,
    };
    pub use crate::controls::{
        EmailInput, IdentifierInput, IssnComponent, IssnInput, RnpsInput, SelectInput, TextInput,
        UrlInput,
    };
    pub use crate::{
        ConfigurationError, FormControl, InternalComponent, Normalizable, Result, Trackable,
    };
    pub use control_schema_core::{
        FormGroup, FormList, FormNode, SectionKind, ValidatorSet, ValueTracker,
    };
}
