use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use crate::base::ErrorKind;
use crate::plugin_system::{ConfigFormat, PluginManifest, PluginRegistry, Version};

const JSON_MANIFEST: &str = r#"{
    "plugin": [
        { "name": "core-logging", "version": "0.1.0" },
        {
            "name": "alarms",
            "version": "1.2",
            "location": "libalarms.so",
            "dependencies": [{ "name": "core-logging", "min_version": "0.1" }]
        }
    ]
}"#;

#[test]
fn test_parse_json_manifest() {
    let manifest = PluginManifest::parse(JSON_MANIFEST, ConfigFormat::Json, Path::new("plugins.json")).unwrap();
    assert_eq!(manifest.plugins.len(), 2);

    let descriptors = manifest.descriptors();
    assert_eq!(descriptors[0].name(), "core-logging");
    assert_eq!(descriptors[0].location(), "core-logging");
    assert_eq!(descriptors[1].version(), &Version::new(1, 2, 0));
    assert_eq!(descriptors[1].location(), "libalarms.so");

    let dep = &manifest.plugins[1].dependencies[0];
    assert_eq!(dep.plugin_name, "core-logging");
    assert_eq!(dep.min_version, Version::new(0, 1, 0));
    assert!(dep.required);
}

#[cfg(feature = "toml-config")]
#[test]
fn test_parse_toml_manifest() {
    let data = r#"
[[plugin]]
name = "core-logging"
version = "0.1.0"

[[plugin]]
name = "alarms"
version = "1.2"
dependencies = [{ name = "core-logging", min_version = "0.1" }, { name = "extras", required = false }]
"#;
    let manifest = PluginManifest::parse(data, ConfigFormat::Toml, Path::new("plugins.toml")).unwrap();
    assert_eq!(manifest.plugins.len(), 2);
    assert_eq!(manifest.plugins[1].dependencies.len(), 2);
    assert!(!manifest.plugins[1].dependencies[1].required);
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_parse_yaml_manifest() {
    let data = r#"
plugin:
  - name: core-logging
    version: "0.1.0"
  - name: alarms
    version: "1.2.0"
    dependencies:
      - name: core-logging
        min_version: "0.1.0"
"#;
    let manifest = PluginManifest::parse(data, ConfigFormat::Yaml, Path::new("plugins.yaml")).unwrap();
    assert_eq!(manifest.descriptors()[1].name(), "alarms");
}

#[test]
fn test_invalid_manifest_reports_path() {
    let err = PluginManifest::parse("{ \"plugin\": [ { \"name\": 1 } ] }", ConfigFormat::Json, Path::new("bad.json"))
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Parse);
    assert_eq!(err.info().context(), Some("bad.json"));
}

#[test]
fn test_from_path_picks_format_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plugins.json");
    std::fs::write(&path, JSON_MANIFEST).unwrap();
    assert_eq!(PluginManifest::from_path(&path).unwrap().plugins.len(), 2);

    let unknown = dir.path().join("plugins.ini");
    std::fs::write(&unknown, "").unwrap();
    let err = PluginManifest::from_path(&unknown).unwrap_err();
    assert!(err.message().contains("Unknown or unsupported manifest format"));

    let missing = dir.path().join("missing.json");
    assert_eq!(PluginManifest::from_path(&missing).unwrap_err().kind(), &ErrorKind::Parse);
}

#[test]
fn test_config_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("a")), None);
    assert_eq!(ConfigFormat::Json.extension(), "json");
}

#[test]
fn test_declared_loader_resolves_manifest() {
    let manifest = PluginManifest::parse(JSON_MANIFEST, ConfigFormat::Json, Path::new("plugins.json")).unwrap();
    let mut registry = PluginRegistry::new(Arc::new(manifest.declared_loader()));
    registry.register_all(manifest.descriptors()).unwrap();

    registry.resolve().unwrap();
    assert_eq!(registry.load_order(), vec!["core-logging", "alarms"]);
}
