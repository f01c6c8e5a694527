//! Concrete input controls.
//!
//! Each control is an [`InputControl`](crate::input::InputControl) over a
//! [`FieldKind`](crate::input::FieldKind) that supplies its default label,
//! default tracker rules and error messages.

mod email;
mod identifier;
mod issn;
mod rnps;
mod select;
mod text;
mod url;

pub use email::{EmailInput, EmailKind};
pub use identifier::{IdentifierInput, IdentifierKind};
pub use issn::{DEFAULT_ISSN, IssnComponent, IssnInput, IssnKind, issn_check_digit};
pub use rnps::{RNPS_LENGTH, RnpsInput, RnpsKind};
pub use select::{SelectInput, SelectKind};
pub use text::{TextInput, TextKind};
pub use url::{UrlInput, UrlKind};

use control_schema_core::validator::REQUIRED;

use crate::input::MessageContext;

/// The required message when `required` failed, `wrong` for any other
/// failure, `""` when the value is valid.
fn required_or(context: MessageContext<'_>, wrong: &str) -> String {
    if context.errors.is_empty() {
        String::new()
    } else if context.errors.contains(REQUIRED) {
        context.required_message.to_owned()
    } else {
        wrong.to_owned()
    }
}
