//! # HMI Core Storage Errors
//!
//! Defines [`StorageError`], raised by key/value stores when reading,
//! decoding or persisting their contents.
use std::path::PathBuf;
use thiserror::Error;

use crate::base::{ErrorInfo, ErrorKind, ToErrorInfo};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Deserialization from '{path}' failed: {source}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization of '{key}' failed: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store file '{0}' does not contain a JSON object")]
    NotAnObject(PathBuf),
}

impl StorageError {
    pub fn io(source: std::io::Error, operation: &str, path: impl Into<PathBuf>) -> Self {
        StorageError::Io {
            path: path.into(),
            operation: operation.to_string(),
            source,
        }
    }
}

impl ToErrorInfo for StorageError {
    fn error_info(&self) -> ErrorInfo {
        match self {
            StorageError::Io { path, .. } => {
                ErrorInfo::new(ErrorKind::Storage, self.to_string()).with_context(path.display().to_string())
            }
            StorageError::Deserialization { path, .. } | StorageError::NotAnObject(path) => {
                ErrorInfo::new(ErrorKind::Parse, self.to_string()).with_context(path.display().to_string())
            }
            StorageError::Serialization { key, .. } => {
                ErrorInfo::new(ErrorKind::Parse, self.to_string()).with_context(key.clone())
            }
        }
    }
}
