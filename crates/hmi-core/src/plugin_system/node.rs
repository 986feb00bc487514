use std::fmt;
use std::sync::{Arc, Mutex};

use crate::base::DataBlock;
use crate::plugin_system::plugin::Plugin;
use crate::plugin_system::traits::IPlugin;
use crate::plugin_system::version::Version;

/// Lifecycle of a plugin within one resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    Unregistered,
    Registered,
    VersionChecked,
    Initialized,
    Finalized,
    /// Terminal for the current attempt
    Failed,
}

type InstanceSlot = Arc<Mutex<Option<Arc<dyn IPlugin>>>>;

/// Body of a graph node: a registered plugin plus the minimum version the
/// referencing edge accepts.
///
/// The registry keeps one node per plugin (minimum `0.0.0`); every dependency
/// edge gets its own node derived with [`edge`](Self::edge), which shares the
/// plugin and the instance slot with the registry's node.
pub struct PluginNodeData {
    plugin: Arc<Plugin>,
    min_version: Version,
    instance: InstanceSlot,
}

/// Shared handle to a node body
pub type PluginNode = DataBlock<PluginNodeData>;

impl PluginNodeData {
    pub fn new(plugin: Arc<Plugin>, min_version: Version) -> Self {
        Self {
            plugin,
            min_version,
            instance: Arc::new(Mutex::new(None)),
        }
    }

    /// Node for a dependency edge onto the same plugin
    pub fn edge(&self, min_version: Version) -> Self {
        Self {
            plugin: Arc::clone(&self.plugin),
            min_version,
            instance: Arc::clone(&self.instance),
        }
    }

    pub fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    pub fn min_version(&self) -> &Version {
        &self.min_version
    }

    /// Whether the registered plugin meets this node's minimum
    pub fn is_satisfied(&self) -> bool {
        self.plugin.version().satisfies(&self.min_version)
    }

    /// The initialized instance, or `None` before initialization and after unload
    pub fn plugin_instance(&self) -> Option<Arc<dyn IPlugin>> {
        match self.instance.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn set_instance(&self, instance: Arc<dyn IPlugin>) {
        match self.instance.lock() {
            Ok(mut slot) => *slot = Some(instance),
            Err(poisoned) => *poisoned.into_inner() = Some(instance),
        }
    }

    pub(crate) fn take_instance(&self) -> Option<Arc<dyn IPlugin>> {
        match self.instance.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl fmt::Debug for PluginNodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginNodeData")
            .field("plugin", &self.plugin.name())
            .field("version", self.plugin.version())
            .field("min_version", &self.min_version)
            .field("initialized", &self.plugin_instance().is_some())
            .finish()
    }
}
