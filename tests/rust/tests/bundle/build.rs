//! Building bundles from temporary registries

use chrono::{TimeZone, Utc};
use mcpmux_registry::{BundleBuilder, RegistryError};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures, registry::TestRegistry};

fn populated() -> TestRegistry {
    let registry = TestRegistry::new();
    registry.add_server(&fixtures::complete_server("com.gamma-mcp"));
    registry.add_server(&fixtures::http_server("com.alpha-http"));
    registry.add_server(&fixtures::complete_server("community.beta-npx"));
    registry
}

#[test]
fn test_one_server_per_file_sorted_by_id() {
    let registry = populated();
    let bundle = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap();

    assert_eq!(bundle.servers.len(), registry.file_count());
    let ids: Vec<_> = bundle.servers.iter().filter_map(|s| s.id()).collect();
    assert_eq!(ids, vec!["com.alpha-http", "com.gamma-mcp", "community.beta-npx"]);
}

#[test]
fn test_rebuild_is_identical_apart_from_timestamp() {
    let registry = populated();
    let builder = BundleBuilder::default();
    let first = builder
        .build_from_layout(registry.layout(), Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
        .unwrap();
    let second = builder
        .build_from_layout(registry.layout(), Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap())
        .unwrap();

    assert_eq!(first.servers, second.servers);
    assert_eq!(first.categories, second.categories);
    assert_eq!(first.ui, second.ui);
    assert_ne!(first.updated_at, second.updated_at);
}

#[test]
fn test_categories_copied_verbatim() {
    let registry = populated();
    let bundle = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap();

    assert_eq!(
        serde_json::to_value(&bundle.categories).unwrap(),
        fixtures::test_categories()
    );
}

#[test]
fn test_category_extra_keys_copied_verbatim() {
    let registry = populated();
    let categories = json!([
        { "id": "developer-tools", "name": "Developer Tools", "description": "Build tooling", "order": 1 },
        { "id": "productivity", "name": "Productivity", "icon": "📋", "color": "#ffaa00" }
    ]);
    registry.write_categories(&categories);

    let bundle = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap();
    assert_eq!(serde_json::to_value(&bundle.categories).unwrap(), categories);
}

#[test]
fn test_ui_and_version() {
    let registry = populated();
    let bundle = BundleBuilder::new("2026.10")
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap();

    assert_eq!(bundle.version, "2026.10");
    assert_eq!(bundle.ui.default_sort, "recommended");
    assert_eq!(bundle.ui.items_per_page, 24);
    assert!(!bundle.ui.filters.is_empty());
}

#[test]
fn test_contributor_platform_fields_are_replaced() {
    let registry = TestRegistry::new();
    let mut descriptor = fixtures::complete_server("com.alpha-mcp");
    descriptor["featured"] = json!(true);
    descriptor["badges"] = json!(["self-proclaimed"]);
    descriptor["stats"] = json!({ "install_count": 99999 });
    descriptor["_platform_rank"] = json!(1);
    registry.add_server(&descriptor);

    let bundle = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap();
    let server = bundle.servers[0].as_value();

    assert_eq!(server["featured"], json!(false));
    assert_eq!(server["sponsored"], json!(false));
    assert_eq!(server["badges"], json!([]));
    assert_eq!(server["stats"], json!({ "install_count": 0 }));
    assert!(server.get("_platform_rank").is_none());
    assert!(bundle.home.featured_server_ids.is_empty());
}

#[test]
fn test_curation_drives_featured_and_home() {
    let registry = populated();
    registry.write_curation(&json!({
        "featured": ["community.beta-npx", "com.removed-mcp", "com.alpha-http"],
        "sponsored": ["com.gamma-mcp"],
        "badges": { "com.alpha-http": ["official"] },
        "sections": [
            { "id": "remote", "title": "Remote servers", "server_ids": ["com.alpha-http", "com.removed-mcp"] }
        ]
    }));

    let bundle = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap();

    assert_eq!(
        bundle.home.featured_server_ids,
        vec!["community.beta-npx", "com.alpha-http"]
    );
    assert_eq!(bundle.home.sections.len(), 1);
    assert_eq!(bundle.home.sections[0].server_ids, vec!["com.alpha-http"]);

    let alpha = bundle.servers[0].as_value();
    assert_eq!(alpha["id"], "com.alpha-http");
    assert_eq!(alpha["featured"], json!(true));
    assert_eq!(alpha["badges"], json!(["official"]));
    assert!(bundle.servers[1].is_sponsored());
    assert!(!bundle.servers[1].is_featured());
}

#[test]
fn test_unreadable_descriptor_aborts_build() {
    let registry = populated();
    registry.add_raw("com.broken-mcp.json", "{ \"id\": ");

    let err = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap_err();

    match err {
        RegistryError::UnreadableDescriptors { failures } => {
            assert_eq!(failures.len(), 1);
            assert!(failures[0].path.ends_with("com.broken-mcp.json"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_categories_is_fatal() {
    let registry = populated();
    std::fs::remove_file(registry.layout().categories_path()).unwrap();

    let err = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap_err();
    assert!(matches!(err, RegistryError::Categories { .. }));
}

#[test]
fn test_malformed_curation_is_fatal() {
    let registry = populated();
    registry.write_curation(&json!({ "featured": [1, 2] }));

    let err = BundleBuilder::default()
        .build_from_layout(registry.layout(), Utc::now())
        .unwrap_err();
    assert!(matches!(err, RegistryError::Curation { .. }));
}
