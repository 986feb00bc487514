//! # HMI Core Storage
//!
//! Key/value persistence consumed by settings-style collaborators. The plugin
//! resolver itself never touches storage.
//!
//! - **[`store`]**: the [`KeyValueStore`] trait, [`MemoryStore`] and the
//!   atomically synced [`JsonFileStore`].
//! - **[`settings`]**: [`Settings`], a category-scoped, typed view over a store.
//! - **[`error`]**: [`StorageError`].
pub mod error;
pub mod settings;
pub mod store;

pub use error::StorageError;
pub use settings::Settings;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

// Test module declaration
#[cfg(test)]
mod tests;
