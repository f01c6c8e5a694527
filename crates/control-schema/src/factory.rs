//! Building controls from descriptors.

use control_schema_core::logging::targets;

use crate::action::ActionControl;
use crate::container::ContainerControl;
use crate::content::{ControlContent, ControlKind};
use crate::control::FormControl;
use crate::controls::{
    EmailInput, IdentifierInput, IssnInput, RnpsInput, SelectInput, TextInput, UrlInput,
};
use crate::error::{ConfigurationError, Result};

/// Build the control a descriptor's control type selects.
///
/// The control is created but not initialized; adding it to a container, or
/// calling [`FormControl::initialize`], does that.
pub fn create_control(content: ControlContent) -> Result<Box<dyn FormControl>> {
    let name = content.field().name().to_owned();
    let Some(kind) = content.field().control_type else {
        return Err(ConfigurationError::MissingControlType { name });
    };
    tracing::trace!(target: targets::CONTROL, %name, ?kind, "creating control");

    let control: Box<dyn FormControl> = match (kind, content) {
        (ControlKind::Identifier, ControlContent::Input(c)) => {
            Box::new(IdentifierInput::from_content(c))
        }
        (ControlKind::Issn, ControlContent::Input(c)) => Box::new(IssnInput::with_component(c)),
        (ControlKind::Rnps, ControlContent::Input(c)) => Box::new(RnpsInput::from_content(c)),
        (ControlKind::Email, ControlContent::Input(c)) => Box::new(EmailInput::from_content(c)),
        (ControlKind::Url, ControlContent::Input(c)) => Box::new(UrlInput::from_content(c)),
        (ControlKind::Select, ControlContent::Input(c)) => Box::new(SelectInput::from_content(c)),
        (ControlKind::Text, ControlContent::Input(c)) => Box::new(TextInput::from_content(c)),
        (
            ControlKind::SimpleContainer | ControlKind::PanelContainer,
            ControlContent::Container(c),
        ) => Box::new(ContainerControl::from_content(c)),
        (ControlKind::Action, ControlContent::Action(c)) => Box::new(ActionControl::from_content(c)),
        (control_type, _) => {
            return Err(ConfigurationError::ContentMismatch {
                name,
                control_type,
            });
        }
    };
    Ok(control)
}

/// Build and initialize a standalone form from a JSON descriptor.
pub fn build_form(descriptor: serde_json::Value) -> Result<Box<dyn FormControl>> {
    let mut control = create_control(ControlContent::from_json(descriptor)?)?;
    control.initialize(None)?;
    Ok(control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ActionContent, InputContent};
    use crate::input::InternalComponent;
    use serde_json::json;

    #[test]
    fn test_creates_each_kind() {
        let cases = [
            (ControlKind::Identifier, "Identifier"),
            (ControlKind::Issn, "ISSN"),
            (ControlKind::Rnps, "RNPS"),
            (ControlKind::Email, "Email"),
            (ControlKind::Url, "URL"),
            (ControlKind::Select, "Select"),
            (ControlKind::Text, "Text"),
        ];
        for (kind, label) in cases {
            let mut control = create_control(InputContent::new("x", kind).into()).unwrap();
            control.initialize(None).unwrap();
            assert_eq!(control.control_type(), Some(kind));
            assert_eq!(control.field_content().unwrap().label(), label);
            assert!(control.as_trackable().is_some());
        }
    }

    #[test]
    fn test_issn_gets_component() {
        let control = create_control(InputContent::new("issn", ControlKind::Issn).into()).unwrap();
        let issn = control.downcast_ref::<IssnInput>().unwrap();
        assert!(issn.internal_component().is_some_and(|c| c.empty()));
    }

    #[test]
    fn test_mismatched_content() {
        assert!(create_control(ActionContent::new("x").into()).is_ok());

        let mut content = InputContent::new("x", ControlKind::Action);
        content.field.label = Some("Go".into());
        let err = create_control(content.into()).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::ContentMismatch { control_type: ControlKind::Action, .. }
        ));
    }

    #[test]
    fn test_missing_control_type() {
        let content = ControlContent::from_json(json!({ "name": "x" })).unwrap();
        assert!(matches!(
            create_control(content),
            Err(ConfigurationError::MissingControlType { .. })
        ));
    }

    #[test]
    fn test_build_form() {
        let form = build_form(json!({
            "name": "journal",
            "controlType": "simpleContainer",
            "children": [
                { "name": "title", "controlType": "text", "value": "Revista" },
                { "name": "save", "controlType": "action", "buttonType": "submit" }
            ]
        }))
        .unwrap();
        assert!(form.is_initialized());
        assert_eq!(form.form_node().unwrap().value(), json!({ "title": "Revista" }));
    }
}
