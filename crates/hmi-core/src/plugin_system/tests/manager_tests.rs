use std::sync::Arc;

use super::mock::{calls, calls_of, failing, loader_for, spec, tracker, v};
use crate::base::{ErrorKind, MemorySink};
use crate::plugin_system::{DefaultPluginManager, NodeState, Plugin, PluginDependency, PluginManager};

fn plugin(name: &str) -> Plugin {
    Plugin::new(name, v(1, 0, 0), name)
}

#[tokio::test]
async fn test_manager_resolve_and_unload() {
    let tracker = tracker();
    let specs = vec![
        spec("hmi", v(1, 0, 0), vec![PluginDependency::required_any("core")]),
        spec("core", v(1, 0, 0), vec![]),
    ];
    let manager = DefaultPluginManager::new(Arc::new(loader_for(&specs, &tracker)));
    manager.register(plugin("hmi")).await.unwrap();
    manager.register(plugin("core")).await.unwrap();

    assert_eq!(manager.plan().await.unwrap(), vec!["core", "hmi"]);
    let instances = manager.resolve().await.unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(manager.load_order().await, vec!["core", "hmi"]);
    assert_eq!(manager.state("core").await, NodeState::Initialized);
    assert!(manager.instance("hmi").await.is_some());
    assert_eq!(manager.dependents_of("core").await, vec!["hmi"]);

    assert_eq!(manager.unload().await, vec!["hmi", "core"]);
    assert_eq!(calls_of(&tracker, "finalize:"), vec!["hmi", "core"]);
    assert_eq!(manager.state("hmi").await, NodeState::Finalized);
}

#[tokio::test]
async fn test_manager_propagates_initialization_failure() {
    let tracker = tracker();
    let specs = vec![spec("core", v(1, 0, 0), vec![]), failing("broken", v(1, 0, 0), vec![])];
    let sink = Arc::new(MemorySink::new());
    let manager = DefaultPluginManager::with_log_sink(Arc::new(loader_for(&specs, &tracker)), sink.clone());
    manager.register(plugin("core")).await.unwrap();
    manager.register(plugin("broken")).await.unwrap();

    let err = match manager.resolve().await {
        Ok(_) => panic!("Expected initialization failure"),
        Err(e) => e,
    };

    assert_eq!(err.kind(), &ErrorKind::InitializationFailure);
    assert_eq!(err.info().context(), Some("broken"));
    assert_eq!(calls(&tracker), vec!["init:core", "init:broken", "finalize:broken", "finalize:core"]);
    assert!(manager.load_order().await.is_empty());
    assert!(sink.contains("Initializing plugin: broken"));
}

#[tokio::test]
async fn test_manager_rejects_duplicates() {
    let manager = DefaultPluginManager::new(Arc::new(crate::plugin_system::StaticLoader::new()));
    manager.register(plugin("a")).await.unwrap();
    let err = manager.register(plugin("a")).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DuplicatePlugin);
}

#[tokio::test]
async fn test_concurrent_resolves_are_serialized() {
    let tracker = tracker();
    let specs = vec![spec("a", v(1, 0, 0), vec![]), spec("b", v(1, 0, 0), vec![PluginDependency::required_any("a")])];
    let manager = DefaultPluginManager::new(Arc::new(loader_for(&specs, &tracker)));
    manager.register(plugin("a")).await.unwrap();
    manager.register(plugin("b")).await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.resolve().await.map(|instances| instances.len()) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 2);
    }
    // Only the first attempt initialized anything
    assert_eq!(calls(&tracker), vec!["init:a", "init:b"]);
}

#[tokio::test]
async fn test_registry_accessible_through_manager() {
    let manager = DefaultPluginManager::new(Arc::new(crate::plugin_system::StaticLoader::new()));
    manager.register(plugin("a")).await.unwrap();
    let registry = manager.registry().lock().await;
    assert!(registry.has_plugin("a"));
    assert_eq!(registry.plugin_count(), 1);
}
