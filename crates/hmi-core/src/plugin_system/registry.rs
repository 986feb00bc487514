use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::base::{DataBlock, ErrorException, ErrorKind, LogFacadeSink, LogSink, Result};
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::loader::PluginLoader;
use crate::plugin_system::node::{NodeState, PluginNode, PluginNodeData};
use crate::plugin_system::plugin::Plugin;
use crate::plugin_system::traits::IPlugin;
use crate::plugin_system::version::Version;

/// A dependency edge: the target's position in the registry plus the node
/// carrying this edge's minimum version
#[derive(Debug, Clone)]
struct Edge {
    target: usize,
    node: PluginNode,
}

struct RegistryEntry {
    /// Registry's own node for the plugin (minimum `0.0.0`)
    node: PluginNode,
    state: NodeState,
    /// Constructed by the loader, waiting for `initialize`
    staged: Option<Arc<dyn IPlugin>>,
    /// Outgoing edges in declaration order, built by `plan`
    edges: Vec<Edge>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

/// Registry resolving plugins into a safe initialization order.
///
/// Plugins are kept in declaration order, which is also the tie-break
/// between plugins that don't depend on each other. Resolution either
/// initializes every registered plugin or none of them.
///
/// Not synchronized; callers that share a registry serialize access
/// (see [`DefaultPluginManager`](crate::plugin_system::DefaultPluginManager)).
pub struct PluginRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
    loader: Arc<dyn PluginLoader>,
    sink: Arc<dyn LogSink>,
    /// Positions of initialized plugins, in initialization order
    load_order: Vec<usize>,
}

impl PluginRegistry {
    /// Create a registry that logs through the `log` facade
    pub fn new(loader: Arc<dyn PluginLoader>) -> Self {
        Self::with_log_sink(loader, Arc::new(LogFacadeSink))
    }

    pub fn with_log_sink(loader: Arc<dyn PluginLoader>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            loader,
            sink,
            load_order: Vec::new(),
        }
    }

    /// Register a discovered plugin. Names are unique.
    pub fn register(&mut self, plugin: Plugin) -> Result<PluginNode> {
        if self.index.contains_key(plugin.name()) {
            return Err(PluginSystemError::DuplicatePlugin(plugin.name().to_string()).into());
        }

        self.sink.debug(&format!("Registering plugin {}", plugin));
        let name = plugin.name().to_string();
        let node = DataBlock::new(PluginNodeData::new(Arc::new(plugin), Version::ZERO));
        self.index.insert(name, self.entries.len());
        self.entries.push(RegistryEntry {
            node: node.share(),
            state: NodeState::Registered,
            staged: None,
            edges: Vec::new(),
        });
        Ok(node)
    }

    /// Register several plugins in order, stopping at the first failure
    pub fn register_all<I>(&mut self, plugins: I) -> Result<()>
    where
        I: IntoIterator<Item = Plugin>,
    {
        for plugin in plugins {
            self.register(plugin)?;
        }
        Ok(())
    }

    /// Load every plugin, build the dependency graph, check versions and
    /// cycles, and compute the initialization order. Nothing is initialized.
    ///
    /// Returns plugin names, dependencies first.
    pub fn plan(&mut self) -> Result<Vec<String>> {
        if self.is_resolved() {
            return Ok(self.load_order());
        }
        let order = self.plan_indices()?;
        // Only resolve() initializes what the plan staged
        self.discard_staged();
        Ok(order.iter().map(|&idx| self.name_at(idx).to_string()).collect())
    }

    /// Resolve and initialize every registered plugin.
    ///
    /// On success, returns the instances in initialization order. If a
    /// plugin's `initialize` fails, that plugin and every plugin initialized
    /// before it are finalized (in reverse order) before the error is returned.
    pub fn resolve(&mut self) -> Result<Vec<Arc<dyn IPlugin>>> {
        if self.is_resolved() {
            return Ok(self.instances());
        }
        if !self.load_order.is_empty() {
            // Registered more plugins since the last resolution; start over.
            self.sink.debug("Registry changed since last resolution, unloading before re-resolving");
            self.unload();
        }

        let order = self.plan_indices()?;
        self.sink.debug(&format!(
            "Initializing plugins in order: {:?}",
            order.iter().map(|&idx| self.name_at(idx)).collect::<Vec<_>>()
        ));

        for idx in order {
            let name = self.name_at(idx).to_string();
            let Some(instance) = self.entries[idx].staged.take() else {
                // plan_indices stages every plugin it orders
                self.rollback();
                return Err(PluginSystemError::InitializationFailure {
                    plugin_id: name.clone(),
                    source: ErrorException::with_kind(
                        ErrorKind::LoadFailure,
                        format!("No instance staged for '{}'", name),
                    ),
                }
                .into());
            };

            self.sink.debug(&format!("Initializing plugin: {}", name));
            match instance.initialize() {
                Ok(()) => {
                    self.entries[idx].node.set_instance(instance);
                    self.entries[idx].state = NodeState::Initialized;
                    self.load_order.push(idx);
                    self.sink.debug(&format!("Plugin initialized: {}", name));
                }
                Err(source) => {
                    log::warn!("Plugin '{}' failed to initialize: {}", name, source);
                    // Partial setup of the failing plugin is released too.
                    instance.finalize();
                    self.entries[idx].state = NodeState::Failed;
                    self.rollback();
                    return Err(PluginSystemError::InitializationFailure { plugin_id: name, source }.into());
                }
            }
        }

        Ok(self.instances())
    }

    /// Finalize every initialized plugin, dependents before dependencies.
    ///
    /// Returns the names in the order they were finalized.
    pub fn unload(&mut self) -> Vec<String> {
        let mut finalized = Vec::with_capacity(self.load_order.len());
        while let Some(idx) = self.load_order.pop() {
            let name = self.name_at(idx).to_string();
            if let Some(instance) = self.entries[idx].node.take_instance() {
                self.sink.debug(&format!("Finalizing plugin: {}", name));
                instance.finalize();
            }
            self.entries[idx].state = NodeState::Finalized;
            finalized.push(name);
        }
        finalized
    }

    /// Undo a partially completed resolution
    fn rollback(&mut self) {
        let finalized = self.unload();
        if !finalized.is_empty() {
            log::warn!("Rolled back plugins: {}", finalized.join(", "));
        }
        for entry in &mut self.entries {
            entry.staged = None;
        }
    }

    fn plan_indices(&mut self) -> Result<Vec<usize>> {
        for idx in 0..self.entries.len() {
            self.mark(idx, NodeState::Registered);
            let entry = &mut self.entries[idx];
            entry.staged = None;
            entry.edges.clear();
        }

        // 1. Construct instances and collect declared dependencies.
        // 2. Check each edge's minimum version against the registered plugin.
        for idx in 0..self.entries.len() {
            let plugin = self.entries[idx].node.plugin().clone();
            let instance = match self.loader.load(&plugin) {
                Ok(instance) => instance,
                Err(source) => {
                    self.mark(idx, NodeState::Failed);
                    return Err(PluginSystemError::LoadFailure {
                        plugin_id: plugin.name().to_string(),
                        location: plugin.location().to_string(),
                        source,
                    }
                    .into());
                }
            };

            let mut edges = Vec::new();
            for dep in instance.dependencies() {
                let Some(&target) = self.index.get(&dep.plugin_name) else {
                    if dep.required {
                        self.mark(idx, NodeState::Failed);
                        return Err(PluginSystemError::UnknownDependency {
                            dependent: plugin.name().to_string(),
                            dependency: dep.plugin_name,
                        }
                        .into());
                    }
                    self.sink.debug(&format!(
                        "Optional dependency '{}' of '{}' is not registered, skipping",
                        dep.plugin_name,
                        plugin.name()
                    ));
                    continue;
                };

                let node = DataBlock::new(self.entries[target].node.edge(dep.min_version));
                if !node.is_satisfied() {
                    self.mark(idx, NodeState::Failed);
                    return Err(PluginSystemError::VersionMismatch {
                        dependent: plugin.name().to_string(),
                        dependent_version: *plugin.version(),
                        dependency: dep.plugin_name,
                        required: dep.min_version,
                        found: *node.plugin().version(),
                    }
                    .into());
                }
                edges.push(Edge { target, node });
            }

            let entry = &mut self.entries[idx];
            entry.edges = edges;
            entry.staged = Some(instance);
        }
        for idx in 0..self.entries.len() {
            self.mark(idx, NodeState::VersionChecked);
        }

        // 3. Reject cycles.
        if let Some(cycle) = self.find_cycle() {
            for name in &cycle {
                if let Some(&idx) = self.index.get(name) {
                    self.mark(idx, NodeState::Failed);
                }
            }
            self.discard_staged();
            return Err(PluginSystemError::CyclicDependency(cycle).into());
        }

        // 4. Order.
        match self.topological_order() {
            Ok(order) => Ok(order),
            Err(e) => {
                self.discard_staged();
                Err(e.into())
            }
        }
    }

    /// Set a planning state. Plugins still initialized from an earlier
    /// resolution keep `Initialized` until they are unloaded.
    fn mark(&mut self, idx: usize, state: NodeState) {
        let entry = &mut self.entries[idx];
        if entry.state != NodeState::Initialized {
            entry.state = state;
        }
    }

    fn discard_staged(&mut self) {
        for entry in &mut self.entries {
            entry.staged = None;
        }
    }

    /// Depth-first search with three-color marking. Returns the first cycle
    /// found as a closed path, e.g. `["a", "b", "a"]`.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut colors = vec![Color::Unvisited; self.entries.len()];
        let mut stack = Vec::new();
        for start in 0..self.entries.len() {
            if colors[start] == Color::Unvisited {
                if let Some(cycle) = self.visit(start, &mut colors, &mut stack) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit(&self, idx: usize, colors: &mut [Color], stack: &mut Vec<usize>) -> Option<Vec<String>> {
        colors[idx] = Color::InProgress;
        stack.push(idx);

        for edge in &self.entries[idx].edges {
            match colors[edge.target] {
                Color::InProgress => {
                    // Back-edge: the cycle is the stack suffix starting at the target.
                    let start = stack.iter().position(|&i| i == edge.target).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|&i| self.name_at(i).to_string()).collect();
                    cycle.push(self.name_at(edge.target).to_string());
                    return Some(cycle);
                }
                Color::Unvisited => {
                    if let Some(cycle) = self.visit(edge.target, colors, stack) {
                        return Some(cycle);
                    }
                }
                Color::Done => {}
            }
        }

        stack.pop();
        colors[idx] = Color::Done;
        None
    }

    /// Kahn's algorithm, always taking the earliest-declared ready plugin.
    fn topological_order(&self) -> std::result::Result<Vec<usize>, PluginSystemError> {
        let count = self.entries.len();
        let mut in_degree = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (idx, entry) in self.entries.iter().enumerate() {
            for edge in &entry.edges {
                in_degree[idx] += 1;
                dependents[edge.target].push(idx);
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> =
            (0..count).filter(|&idx| in_degree[idx] == 0).map(Reverse).collect();
        let mut order = Vec::with_capacity(count);
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);
            for &dependent in &dependents[idx] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() == count {
            Ok(order)
        } else {
            // find_cycle runs first, so this only triggers if the two disagree
            let stuck = (0..count)
                .filter(|idx| !order.contains(idx))
                .map(|idx| self.name_at(idx).to_string())
                .collect();
            Err(PluginSystemError::CyclicDependency(stuck))
        }
    }

    fn name_at(&self, idx: usize) -> &str {
        self.entries[idx].node.plugin().name()
    }

    /// Whether every registered plugin is initialized
    pub fn is_resolved(&self) -> bool {
        !self.entries.is_empty() && self.load_order.len() == self.entries.len()
    }

    /// Lifecycle state of a plugin; `Unregistered` for unknown names
    pub fn state(&self, name: &str) -> NodeState {
        self.index
            .get(name)
            .map(|&idx| self.entries[idx].state)
            .unwrap_or(NodeState::Unregistered)
    }

    /// Registry's node for a plugin
    pub fn node(&self, name: &str) -> Option<PluginNode> {
        self.index.get(name).map(|&idx| self.entries[idx].node.share())
    }

    /// Registered descriptor of a plugin
    pub fn plugin(&self, name: &str) -> Option<&Plugin> {
        self.index.get(name).map(|&idx| self.entries[idx].node.plugin())
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered descriptors in declaration order
    pub fn plugins(&self) -> Vec<&Plugin> {
        self.entries.iter().map(|entry| entry.node.plugin()).collect()
    }

    /// Names of initialized plugins in initialization order
    pub fn load_order(&self) -> Vec<String> {
        self.load_order.iter().map(|&idx| self.name_at(idx).to_string()).collect()
    }

    /// Initialized instances in initialization order
    pub fn instances(&self) -> Vec<Arc<dyn IPlugin>> {
        self.load_order
            .iter()
            .filter_map(|&idx| self.entries[idx].node.plugin_instance())
            .collect()
    }

    pub fn instance(&self, name: &str) -> Option<Arc<dyn IPlugin>> {
        self.index.get(name).and_then(|&idx| self.entries[idx].node.plugin_instance())
    }

    /// Edge nodes of a plugin's dependencies, as built by the last `plan`
    pub fn dependencies_of(&self, name: &str) -> Vec<PluginNode> {
        self.index
            .get(name)
            .map(|&idx| self.entries[idx].edges.iter().map(|edge| edge.node.share()).collect())
            .unwrap_or_default()
    }

    /// Names of plugins with an edge onto `name`, in declaration order
    pub fn dependents_of(&self, name: &str) -> Vec<String> {
        let Some(&target) = self.index.get(name) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|entry| entry.edges.iter().any(|edge| edge.target == target))
            .map(|entry| entry.node.plugin().name().to_string())
            .collect()
    }

    pub fn plugin_count(&self) -> usize {
        self.entries.len()
    }

    pub fn initialized_count(&self) -> usize {
        self.load_order.len()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.entries.iter().map(|e| e.node.plugin().name()).collect::<Vec<_>>())
            .field("load_order", &self.load_order())
            .finish_non_exhaustive()
    }
}
