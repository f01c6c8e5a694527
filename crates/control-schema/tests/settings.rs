//! Installed settings change the defaults filled in during initialization.
//!
//! Settings are process-wide, so everything that installs them lives in this
//! one test binary.

use std::io::Write;

use control_schema::config::{self, SchemaSettings};
use control_schema::prelude::*;

#[test]
fn test_installed_settings_apply() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
min_width = "20em"
default_icon_name = "help"
appearance = "outline"
text_align = "center"
always_hint = false
"#
    )
    .unwrap();

    let settings = SchemaSettings::from_toml_file(file.path()).unwrap();
    config::install(settings);

    let mut code = RnpsInput::from_content(
        InputContent::new("code", ControlKind::Rnps).with_prefix_icon(IconValue::default()),
    );
    code.initialize(None).unwrap();
    let content = code.content().unwrap();
    assert_eq!(content.field.width.as_deref(), Some("20em"));
    assert_eq!(content.field.text_align, Some(TextAlign::Center));
    assert_eq!(content.appearance, Some(Appearance::Outline));
    assert_eq!(
        content.prefix_icon.as_ref().unwrap().name.as_deref(),
        Some("help")
    );
    assert!(content.start_hint.is_none());

    config::reset();
    let mut code = RnpsInput::from_content(InputContent::new("code", ControlKind::Rnps));
    code.initialize(None).unwrap();
    assert_eq!(code.content().unwrap().field.width.as_deref(), Some("15em"));
    assert!(code.content().unwrap().start_hint.is_some());
}

#[test]
fn test_missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = SchemaSettings::from_toml_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigurationError::SettingsIo { .. })));
}
