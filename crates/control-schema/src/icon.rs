//! Icon resolution.
//!
//! Internal icons are image assets registered by name; external icons are
//! names in an icon font and resolve to themselves. Icon descriptors without a
//! name fall back to the default icon name from the settings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use control_schema_core::logging::targets;

use crate::config::{self, SchemaSettings};
use crate::content::{IconSource, IconValue};

/// What an icon descriptor resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIcon {
    /// A registered image asset.
    Asset(PathBuf),
    /// A glyph of the icon font, by name.
    Font(String),
}

/// Registry of internal icons.
#[derive(Debug, Clone)]
pub struct IconService {
    default_icon_name: String,
    assets: HashMap<String, PathBuf>,
}

impl IconService {
    /// Create a service using the settings currently installed.
    pub fn new() -> Self {
        Self::from_settings(&config::current())
    }

    /// Create a service using `settings`.
    pub fn from_settings(settings: &SchemaSettings) -> Self {
        Self {
            default_icon_name: settings.default_icon_name.clone(),
            assets: HashMap::new(),
        }
    }

    /// The icon name used when a descriptor names none.
    pub fn default_icon_name(&self) -> &str {
        &self.default_icon_name
    }

    /// Register `names` as internal icons stored as `<dir>/<name>.svg`.
    pub fn register_icons<I, S>(&mut self, dir: impl AsRef<Path>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dir = dir.as_ref();
        for name in names {
            let name = name.into();
            let path = dir.join(format!("{name}.svg"));
            tracing::trace!(target: targets::CONTROL, %name, path = %path.display(), "registered icon");
            self.assets.insert(name, path);
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Resolve an icon descriptor.
    ///
    /// Returns `None` for an internal icon that was never registered.
    pub fn resolve(&self, icon: &IconValue) -> Option<ResolvedIcon> {
        let name = icon.name.as_deref().unwrap_or(&self.default_icon_name);
        match icon.source.unwrap_or_default() {
            IconSource::Internal => {
                let path = self.assets.get(name);
                if path.is_none() {
                    tracing::warn!(target: targets::CONTROL, %name, "internal icon is not registered");
                }
                path.cloned().map(ResolvedIcon::Asset)
            }
            IconSource::External => Some(ResolvedIcon::Font(name.to_owned())),
        }
    }
}

impl Default for IconService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> IconService {
        let mut service = IconService::from_settings(&SchemaSettings::default());
        service.register_icons("assets/icons", ["info", "issn"]);
        service
    }

    #[test]
    fn test_internal_icons() {
        let service = service();
        assert!(service.is_registered("issn"));
        assert_eq!(
            service.resolve(&IconValue::named("issn")),
            Some(ResolvedIcon::Asset(PathBuf::from("assets/icons/issn.svg")))
        );
        assert_eq!(service.resolve(&IconValue::named("missing")), None);
    }

    #[test]
    fn test_default_name() {
        let service = service();
        assert_eq!(service.default_icon_name(), "info");
        assert_eq!(
            service.resolve(&IconValue::default()),
            Some(ResolvedIcon::Asset(PathBuf::from("assets/icons/info.svg")))
        );
    }

    #[test]
    fn test_external_icons() {
        let service = service();
        let icon = IconValue::named("search").with_source(IconSource::External);
        assert_eq!(service.resolve(&icon), Some(ResolvedIcon::Font("search".into())));
    }
}
