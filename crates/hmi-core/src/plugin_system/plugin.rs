use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

use crate::plugin_system::version::Version;

/// Registry-level descriptor of a discoverable plugin module.
///
/// Value-like and immutable once registered. Identity is the name: two
/// descriptors with the same name are the same plugin, whatever their
/// version or location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plugin {
    name: String,
    version: Version,
    /// Where the loader finds the module (library path, factory key, ...)
    location: String,
}

impl Plugin {
    pub fn new(name: impl Into<String>, version: Version, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version,
            location: location.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl PartialEq for Plugin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Plugin {}

impl Hash for Plugin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} ({})", self.name, self.version, self.location)
    }
}

impl From<(&str, Version, &str)> for Plugin {
    fn from((name, version, location): (&str, Version, &str)) -> Self {
        Plugin::new(name, version, location)
    }
}
