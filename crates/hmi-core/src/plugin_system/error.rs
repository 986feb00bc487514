//! # HMI Core Plugin System Errors
//!
//! Defines [`PluginSystemError`], the error type raised while registering,
//! resolving, initializing and unloading plugins. Each variant maps onto one
//! [`ErrorKind`] through [`ToErrorInfo`], with the offending plugin as the
//! payload's context, so callers can dispatch on `ErrorException::info()`
//! without matching on this enum.
use std::path::PathBuf;

use crate::base::{ErrorException, ErrorInfo, ErrorKind, ToErrorInfo};
use crate::plugin_system::version::{Version, VersionError};

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error(
        "Plugin '{dependent}' v{dependent_version} requires '{dependency}' version >= {required}, but version {found} is registered"
    )]
    VersionMismatch {
        dependent: String,
        dependent_version: Version,
        dependency: String,
        required: Version,
        found: Version,
    },

    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("Plugin '{dependent}' requires plugin '{dependency}', which is not registered")]
    UnknownDependency { dependent: String, dependency: String },

    #[error("Plugin initialization failed for '{plugin_id}': {source}")]
    InitializationFailure {
        plugin_id: String,
        #[source]
        source: ErrorException,
    },

    #[error("Plugin '{plugin_id}' could not be loaded from '{location}': {source}")]
    LoadFailure {
        plugin_id: String,
        location: String,
        #[source]
        source: ErrorException,
    },

    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(String),

    #[error("Plugin manifest error for '{path}': {message}")]
    ManifestError {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Version parsing error: {0}")]
    VersionParsing(#[from] VersionError),
}

impl PluginSystemError {
    /// Name of the plugin the failure is attributed to, if any
    pub fn plugin_id(&self) -> Option<&str> {
        match self {
            PluginSystemError::VersionMismatch { dependent, .. } => Some(dependent),
            PluginSystemError::CyclicDependency(cycle) => cycle.first().map(String::as_str),
            PluginSystemError::UnknownDependency { dependent, .. } => Some(dependent),
            PluginSystemError::InitializationFailure { plugin_id, .. } => Some(plugin_id),
            PluginSystemError::LoadFailure { plugin_id, .. } => Some(plugin_id),
            PluginSystemError::DuplicatePlugin(name) => Some(name),
            PluginSystemError::ManifestError { .. } => None,
            PluginSystemError::VersionParsing(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PluginSystemError::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            PluginSystemError::CyclicDependency(_) => ErrorKind::CyclicDependency,
            PluginSystemError::UnknownDependency { .. } => ErrorKind::UnknownDependency,
            PluginSystemError::InitializationFailure { .. } => ErrorKind::InitializationFailure,
            PluginSystemError::LoadFailure { .. } => ErrorKind::LoadFailure,
            PluginSystemError::DuplicatePlugin(_) => ErrorKind::DuplicatePlugin,
            PluginSystemError::ManifestError { .. } => ErrorKind::Parse,
            PluginSystemError::VersionParsing(_) => ErrorKind::Parse,
        }
    }
}

impl ToErrorInfo for PluginSystemError {
    fn error_info(&self) -> ErrorInfo {
        let info = ErrorInfo::new(self.kind(), self.to_string());
        match self {
            PluginSystemError::ManifestError { path, .. } => info.with_context(path.display().to_string()),
            _ => match self.plugin_id() {
                Some(id) => info.with_context(id),
                None => info,
            },
        }
    }
}
