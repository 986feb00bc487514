use std::fmt::Debug;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::Mutex; // Serializes resolution attempts per registry

use crate::base::{LogSink, Result};
use crate::plugin_system::{IPlugin, NodeState, Plugin, PluginLoader, PluginRegistry};

/// Shared front for a [`PluginRegistry`].
///
/// Every call takes the registry lock for its whole duration, so concurrent
/// callers never interleave resolution steps.
#[async_trait]
pub trait PluginManager: Send + Sync {
    /// Register a discovered plugin
    async fn register(&self, plugin: Plugin) -> Result<()>;

    /// Resolve and initialize every registered plugin
    async fn resolve(&self) -> Result<Vec<Arc<dyn IPlugin>>>;

    /// Compute the initialization order without initializing
    async fn plan(&self) -> Result<Vec<String>>;

    /// Finalize all initialized plugins, returning the finalization order
    async fn unload(&self) -> Vec<String>;

    /// Names of initialized plugins in initialization order
    async fn load_order(&self) -> Vec<String>;

    /// Lifecycle state of a plugin
    async fn state(&self, name: &str) -> NodeState;

    /// Initialized instance of a plugin
    async fn instance(&self, name: &str) -> Option<Arc<dyn IPlugin>>;

    /// Names of plugins that depend on `name`
    async fn dependents_of(&self, name: &str) -> Vec<String>;
}

/// Default implementation of plugin manager
#[derive(Clone)]
pub struct DefaultPluginManager {
    registry: Arc<Mutex<PluginRegistry>>,
}

impl DefaultPluginManager {
    pub fn new(loader: Arc<dyn PluginLoader>) -> Self {
        Self::from_registry(PluginRegistry::new(loader))
    }

    pub fn with_log_sink(loader: Arc<dyn PluginLoader>, sink: Arc<dyn LogSink>) -> Self {
        Self::from_registry(PluginRegistry::with_log_sink(loader, sink))
    }

    pub fn from_registry(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    /// Get reference to the plugin registry Arc<Mutex>
    pub fn registry(&self) -> &Arc<Mutex<PluginRegistry>> {
        &self.registry
    }
}

impl Debug for DefaultPluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Avoid locking in Debug
        f.debug_struct("DefaultPluginManager").finish_non_exhaustive()
    }
}

#[async_trait]
impl PluginManager for DefaultPluginManager {
    async fn register(&self, plugin: Plugin) -> Result<()> {
        let mut registry = self.registry.lock().await;
        registry.register(plugin).map(|_| ())
    }

    async fn resolve(&self) -> Result<Vec<Arc<dyn IPlugin>>> {
        let mut registry = self.registry.lock().await;
        registry.resolve()
    }

    async fn plan(&self) -> Result<Vec<String>> {
        let mut registry = self.registry.lock().await;
        registry.plan()
    }

    async fn unload(&self) -> Vec<String> {
        let mut registry = self.registry.lock().await;
        registry.unload()
    }

    async fn load_order(&self) -> Vec<String> {
        self.registry.lock().await.load_order()
    }

    async fn state(&self, name: &str) -> NodeState {
        self.registry.lock().await.state(name)
    }

    async fn instance(&self, name: &str) -> Option<Arc<dyn IPlugin>> {
        self.registry.lock().await.instance(name)
    }

    async fn dependents_of(&self, name: &str) -> Vec<String> {
        self.registry.lock().await.dependents_of(name)
    }
}
