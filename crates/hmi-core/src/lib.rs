//! # HMI Core
//!
//! Plugin dependency resolution and structured error propagation for HMI
//! applications.
//!
//! ## Key Modules
//!
//! - **[`base`]**: [`ErrorInfo`], [`ErrorException`], [`DataBlock`] and the
//!   logging collaborator.
//! - **[`plugin_system`]**: plugin descriptors, the [`IPlugin`] capability
//!   interface and the [`PluginRegistry`] resolver.
//! - **[`storage`]**: key/value persistence for settings-style collaborators.
pub mod base;
pub mod plugin_system;
pub mod storage;

// Re-export key public types/traits for easier use by the binary and plugins
pub use base::{DataBlock, ErrorException, ErrorInfo, ErrorKind, LogSink, Result, ToErrorInfo};
pub use plugin_system::{
    DefaultPluginManager, IPlugin, NodeState, Plugin, PluginDependency, PluginManager, PluginManifest, PluginNode,
    PluginRegistry, PluginSystemError, StaticLoader, Version,
};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, Settings};
