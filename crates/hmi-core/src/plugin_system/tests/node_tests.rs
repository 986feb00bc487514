use std::sync::Arc;

use super::mock::{TrackedPlugin, tracker};
use crate::base::DataBlock;
use crate::plugin_system::{IPlugin, Plugin, PluginNode, PluginNodeData, Version};

fn base_node() -> PluginNode {
    let plugin = Arc::new(Plugin::new("core", Version::new(1, 5, 0), "libcore.so"));
    DataBlock::new(PluginNodeData::new(plugin, Version::ZERO))
}

#[test]
fn test_edge_satisfaction() {
    let node = base_node();
    assert!(node.is_satisfied());
    assert!(node.edge(Version::new(1, 5, 0)).is_satisfied());
    assert!(node.edge(Version::new(1, 4, 9)).is_satisfied());
    assert!(!node.edge(Version::new(1, 5, 1)).is_satisfied());
}

#[test]
fn test_edge_shares_plugin_and_instance_slot() {
    let node = base_node();
    let edge = node.edge(Version::new(1, 0, 0));
    assert_eq!(edge.plugin(), node.plugin());
    assert_eq!(edge.min_version(), &Version::new(1, 0, 0));
    assert!(edge.plugin_instance().is_none());

    let instance: Arc<dyn IPlugin> = Arc::new(TrackedPlugin::new("core", vec![], false, tracker()));
    node.set_instance(instance.clone());
    let seen = edge.plugin_instance().expect("instance visible through the edge");
    assert!(Arc::ptr_eq(&seen, &instance));

    assert!(edge.take_instance().is_some());
    assert!(node.plugin_instance().is_none());
}

#[test]
fn test_node_holders_share_body() {
    let node = base_node();
    let copy = node.share();
    assert_eq!(node.holders(), 2);
    assert!(DataBlock::ptr_eq(&node, &copy));
    copy.release();
    assert_eq!(node.holders(), 1);
    assert_eq!(node.plugin().location(), "libcore.so");
}

#[test]
fn test_plugin_identity_is_by_name() {
    let a = Plugin::new("core", Version::new(1, 0, 0), "a.so");
    let b = Plugin::new("core", Version::new(2, 0, 0), "b.so");
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "core v1.0.0 (a.so)");
}
