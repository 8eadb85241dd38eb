//! Writing the bundle file

use chrono::Utc;
use mcpmux_registry::{write_bundle, BundleBuilder, RegistryBundle, RegistryLayout};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tests::{fixtures, registry::TestRegistry, repo_root};

#[test]
fn test_written_bundle_top_level_shape() {
    let registry = TestRegistry::new();
    registry.add_server(&fixtures::complete_server("com.alpha-mcp"));

    let bundle = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap();
    write_bundle(registry.layout().output_path(), &bundle).unwrap();

    let content = std::fs::read_to_string(registry.layout().output_path()).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["version", "updated_at", "servers", "categories", "ui", "home"]
    );
    assert_eq!(value["ui"]["default_sort"], "recommended");
    assert_eq!(value["ui"]["items_per_page"], 24);
    assert!(value["home"]["featured_server_ids"].is_array());
}

#[test]
fn test_rewrite_replaces_previous_bundle() {
    let registry = TestRegistry::new();
    registry.add_server(&fixtures::complete_server("com.alpha-mcp"));
    let output = registry.layout().output_path();

    let builder = BundleBuilder::default();
    write_bundle(output, &builder.build_from_layout(registry.layout(), Utc::now()).unwrap()).unwrap();

    registry.add_server(&fixtures::http_server("com.beta-http"));
    let second = builder.build_from_layout(registry.layout(), Utc::now()).unwrap();
    write_bundle(output, &second).unwrap();

    let read: RegistryBundle =
        serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(read.servers.len(), 2);
    assert_eq!(read, second);
}

#[test]
fn test_shipped_registry_builds() {
    let out = tempfile::tempdir().unwrap();
    let layout =
        RegistryLayout::new(repo_root()).with_output_path(out.path().join("registry-bundle.json"));

    let bundle = BundleBuilder::default()
        .build_from_layout(&layout, Utc::now())
        .unwrap();
    write_bundle(layout.output_path(), &bundle).unwrap();

    let on_disk = mcpmux_registry::descriptor_paths(layout.servers_dir()).unwrap();
    assert_eq!(bundle.servers.len(), on_disk.len());
    for id in &bundle.home.featured_server_ids {
        assert!(bundle.servers.iter().any(|s| s.id() == Some(id.as_str())));
    }
}
