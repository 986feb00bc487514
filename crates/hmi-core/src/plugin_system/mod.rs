//! # HMI Core Plugin System
//!
//! Models plugins as nodes of a dependency graph and turns a set of
//! discovered plugins into a safe initialization order, or into one precise,
//! attributable error.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`version`]**: the [`Version`] triple and its parsing.
//! - **[`dependency`]**: [`PluginDependency`], a `(name, min_version)` edge
//!   declaration, optionally non-required.
//! - **[`plugin`]**: [`Plugin`], the registry-level descriptor
//!   (name, version, location).
//! - **[`traits`]**: [`IPlugin`], the capability interface of a loaded module
//!   (`dependencies`, `initialize`, `finalize`).
//! - **[`loader`]**: [`PluginLoader`] and the [`StaticLoader`] used for
//!   plugins linked into the binary.
//! - **[`node`]**: [`PluginNodeData`] / [`PluginNode`], the graph node body
//!   shared between the registry index and dependents' edge lists.
//! - **[`registry`]**: [`PluginRegistry`], the resolver (version checks, cycle
//!   detection, ordering, initialization with rollback, unload).
//! - **[`manager`]**: [`PluginManager`], async access to one registry with
//!   resolution attempts serialized.
//! - **[`manifest`]**: [`PluginManifest`], discovery input read from
//!   JSON/TOML/YAML files.
//! - **[`error`]**: [`PluginSystemError`](error::PluginSystemError).
pub mod dependency;
pub mod error;
pub mod loader;
pub mod manager;
pub mod manifest;
pub mod node;
pub mod plugin;
pub mod registry;
pub mod traits;
pub mod version;

pub use dependency::PluginDependency;
pub use error::PluginSystemError;
pub use loader::{DeclaredPlugin, PluginFactory, PluginLoader, StaticLoader};
pub use manager::{DefaultPluginManager, PluginManager};
pub use manifest::{ConfigFormat, ManifestEntry, PluginManifest};
pub use node::{NodeState, PluginNode, PluginNodeData};
pub use plugin::Plugin;
pub use registry::PluginRegistry;
pub use traits::IPlugin;
pub use version::{Version, VersionError};
// Test module declaration
#[cfg(test)]
mod tests;
