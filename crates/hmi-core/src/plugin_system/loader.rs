use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::base::{ErrorException, ErrorKind, Result};
use crate::plugin_system::dependency::PluginDependency;
use crate::plugin_system::plugin::Plugin;
use crate::plugin_system::traits::IPlugin;

/// Materializes an [`IPlugin`] for a registered descriptor.
///
/// Construction only; the registry calls `initialize` later, in dependency
/// order.
pub trait PluginLoader: Send + Sync {
    fn load(&self, plugin: &Plugin) -> Result<Arc<dyn IPlugin>>;
}

/// Factory closure used by [`StaticLoader`]
pub type PluginFactory = Arc<dyn Fn(&Plugin) -> Result<Arc<dyn IPlugin>> + Send + Sync>;

/// Loader for plugins linked into the binary.
///
/// Factories are looked up by plugin name first, then by location, so one
/// factory can serve several descriptors sharing a location key.
#[derive(Clone, Default)]
pub struct StaticLoader {
    factories: HashMap<String, PluginFactory>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a plugin name or location key.
    /// A later registration under the same key replaces the earlier one.
    pub fn register<F>(&mut self, key: &str, factory: F) -> &mut Self
    where
        F: Fn(&Plugin) -> Result<Arc<dyn IPlugin>> + Send + Sync + 'static,
    {
        self.factories.insert(key.to_string(), Arc::new(factory));
        self
    }

    /// Register a factory that clones out a fixed instance
    pub fn register_instance(&mut self, key: &str, instance: Arc<dyn IPlugin>) -> &mut Self {
        self.register(key, move |_| Ok(Arc::clone(&instance)))
    }

    pub fn has_factory(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Merge another loader's factories into this one
    pub fn extend(&mut self, other: StaticLoader) -> &mut Self {
        self.factories.extend(other.factories);
        self
    }
}

impl PluginLoader for StaticLoader {
    fn load(&self, plugin: &Plugin) -> Result<Arc<dyn IPlugin>> {
        let factory = self
            .factories
            .get(plugin.name())
            .or_else(|| self.factories.get(plugin.location()))
            .ok_or_else(|| {
                ErrorException::with_kind(
                    ErrorKind::LoadFailure,
                    format!("No factory registered for '{}' or location '{}'", plugin.name(), plugin.location()),
                )
            })?;
        factory(plugin)
    }
}

impl fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.factories.keys().collect();
        keys.sort();
        f.debug_struct("StaticLoader").field("factories", &keys).finish()
    }
}

/// Plugin whose only behavior is its declared dependency list.
///
/// Stands in for modules described purely by a manifest; initialization and
/// teardown just flip a flag.
#[derive(Debug, Default)]
pub struct DeclaredPlugin {
    dependencies: Vec<PluginDependency>,
    initialized: Mutex<bool>,
}

impl DeclaredPlugin {
    pub fn new(dependencies: Vec<PluginDependency>) -> Self {
        Self {
            dependencies,
            initialized: Mutex::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.lock().map(|flag| *flag).unwrap_or(false)
    }

    fn set_initialized(&self, value: bool) {
        match self.initialized.lock() {
            Ok(mut flag) => *flag = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

impl IPlugin for DeclaredPlugin {
    fn dependencies(&self) -> Vec<PluginDependency> {
        self.dependencies.clone()
    }

    fn initialize(&self) -> Result<()> {
        self.set_initialized(true);
        Ok(())
    }

    fn finalize(&self) {
        self.set_initialized(false);
    }
}
