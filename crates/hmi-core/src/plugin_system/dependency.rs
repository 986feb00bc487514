use std::fmt;
use serde::{Deserialize, Serialize};

use crate::plugin_system::version::Version;

/// Represents a dependency on another plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDependency {
    /// The name of the required plugin
    #[serde(rename = "name", alias = "plugin_name")]
    pub plugin_name: String,

    /// Lowest acceptable version of the dependency
    #[serde(default)]
    pub min_version: Version,

    /// Whether this is a hard requirement or optional dependency
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl PluginDependency {
    /// Create a new required dependency with a minimum version
    pub fn required(plugin_name: &str, min_version: Version) -> Self {
        Self {
            plugin_name: plugin_name.to_string(),
            min_version,
            required: true,
        }
    }

    /// Create a new required dependency with any version
    pub fn required_any(plugin_name: &str) -> Self {
        Self::required(plugin_name, Version::ZERO)
    }

    /// Create a new optional dependency with a minimum version
    pub fn optional(plugin_name: &str, min_version: Version) -> Self {
        Self {
            plugin_name: plugin_name.to_string(),
            min_version,
            required: false,
        }
    }

    /// Create a new optional dependency with any version
    pub fn optional_any(plugin_name: &str) -> Self {
        Self::optional(plugin_name, Version::ZERO)
    }

    /// Check if this dependency accepts the given registered version
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        version.satisfies(&self.min_version)
    }
}

impl fmt::Display for PluginDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requirement_type = if self.required { "Requires" } else { "Optional" };
        if self.min_version == Version::ZERO {
            write!(f, "{} plugin: {} (any version)", requirement_type, self.plugin_name)
        } else {
            write!(
                f,
                "{} plugin: {} (version >= {})",
                requirement_type, self.plugin_name, self.min_version
            )
        }
    }
}

impl From<(&str, Version)> for PluginDependency {
    fn from((name, min_version): (&str, Version)) -> Self {
        PluginDependency::required(name, min_version)
    }
}
