use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::base::Result;
use crate::plugin_system::dependency::PluginDependency;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::loader::{DeclaredPlugin, StaticLoader};
use crate::plugin_system::plugin::Plugin;
use crate::plugin_system::traits::IPlugin;
use crate::plugin_system::version::Version;

/// Supported manifest file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// One discovered plugin as written in a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub version: Version,
    /// Defaults to the plugin name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<PluginDependency>,
}

impl ManifestEntry {
    pub fn descriptor(&self) -> Plugin {
        let location = self.location.clone().unwrap_or_else(|| self.name.clone());
        Plugin::new(self.name.clone(), self.version, location)
    }
}

/// Ordered list of discovered plugins.
///
/// ```toml
/// [[plugin]]
/// name = "core-logging"
/// version = "0.1.0"
///
/// [[plugin]]
/// name = "alarms"
/// version = "1.2"
/// dependencies = [{ name = "core-logging", min_version = "0.1" }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    #[serde(default, rename = "plugin", alias = "plugins")]
    pub plugins: Vec<ManifestEntry>,
}

impl PluginManifest {
    /// Parse manifest text in the given format. `path` is only used for
    /// error reporting.
    pub fn parse(data: &str, format: ConfigFormat, path: &Path) -> Result<Self> {
        let parsed: std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> = match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| e.into()),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| e.into()),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| e.into()),
        };
        parsed.map_err(|e| {
            PluginSystemError::ManifestError {
                path: path.to_path_buf(),
                message: format!("Failed to parse {} manifest: {}", format.extension(), e),
                source: Some(e),
            }
            .into()
        })
    }

    /// Read and parse a manifest file, picking the format from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| PluginSystemError::ManifestError {
            path: path.to_path_buf(),
            message: "Unknown or unsupported manifest format".to_string(),
            source: None,
        })?;
        let data = std::fs::read_to_string(path).map_err(|e| PluginSystemError::ManifestError {
            path: PathBuf::from(path),
            message: format!("Failed to read manifest: {}", e),
            source: Some(Box::new(e)),
        })?;
        Self::parse(&data, format, path)
    }

    /// Descriptors in manifest order, ready for registration
    pub fn descriptors(&self) -> Vec<Plugin> {
        self.plugins.iter().map(ManifestEntry::descriptor).collect()
    }

    /// Loader producing a [`DeclaredPlugin`] per entry, keyed by name
    pub fn declared_loader(&self) -> StaticLoader {
        let mut loader = StaticLoader::new();
        for entry in &self.plugins {
            let dependencies = entry.dependencies.clone();
            loader.register(&entry.name, move |_| {
                Ok(Arc::new(DeclaredPlugin::new(dependencies.clone())) as Arc<dyn IPlugin>)
            });
        }
        loader
    }
}
