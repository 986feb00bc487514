use std::fmt;
use serde::{Deserialize, Serialize};

/// Discriminated category of a failure.
///
/// The first four variants form the resolution taxonomy. The remaining ones
/// cover the collaborators around the registry, and `Custom` lets a plugin
/// report a kind of its own without a new carrier type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A dependency's registered version is below the declared minimum
    VersionMismatch,
    /// The dependency graph contains a cycle
    CyclicDependency,
    /// A plugin's own setup failed
    InitializationFailure,
    /// A required dependency was never registered
    UnknownDependency,
    /// A plugin name was registered twice
    DuplicatePlugin,
    /// The loader could not construct an instance for a plugin location
    LoadFailure,
    /// Persistence failure (settings store, manifest file)
    Storage,
    /// Malformed text (versions, manifests, stored values)
    Parse,
    /// Module-defined kind
    Custom(String),
}

impl ErrorKind {
    /// Creates a module-defined kind
    pub fn custom(name: impl Into<String>) -> Self {
        ErrorKind::Custom(name.into())
    }

    /// Short stable identifier, used in reports and CLI output
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::VersionMismatch => "VersionMismatch",
            ErrorKind::CyclicDependency => "CyclicDependency",
            ErrorKind::InitializationFailure => "InitializationFailure",
            ErrorKind::UnknownDependency => "UnknownDependency",
            ErrorKind::DuplicatePlugin => "DuplicatePlugin",
            ErrorKind::LoadFailure => "LoadFailure",
            ErrorKind::Storage => "Storage",
            ErrorKind::Parse => "Parse",
            ErrorKind::Custom(name) => name,
        }
    }

    /// Whether this kind belongs to dependency resolution
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::VersionMismatch
                | ErrorKind::CyclicDependency
                | ErrorKind::UnknownDependency
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description of one failure occurrence.
///
/// Built at the site where the failure happens and never mutated afterwards;
/// there are no setters, only the consuming `with_context` builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    kind: ErrorKind,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl ErrorInfo {
    /// Create a new error description without context
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Attach the identifier of the originating operation or node
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "[{}] {} (in '{}')", self.kind, self.message, context),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Conversion from a concrete error value into the common [`ErrorInfo`] shape.
///
/// Each error type supplies its own mapping; [`ErrorException`](super::ErrorException)
/// accepts any implementor, so new failure kinds never need a new carrier.
pub trait ToErrorInfo {
    fn error_info(&self) -> ErrorInfo;
}

impl ToErrorInfo for ErrorInfo {
    fn error_info(&self) -> ErrorInfo {
        self.clone()
    }
}

impl ToErrorInfo for std::io::Error {
    fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(ErrorKind::Storage, self.to_string())
    }
}

impl ToErrorInfo for serde_json::Error {
    fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(ErrorKind::Parse, self.to_string()).with_context("json")
    }
}

impl ToErrorInfo for semver::Error {
    fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(ErrorKind::Parse, self.to_string()).with_context("version")
    }
}
