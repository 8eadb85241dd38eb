//! Per-file rules run alongside the conflict pass

use std::path::Path;

use mcpmux_registry::{check_conflicts, ConsistencyIssue};
use pretty_assertions::assert_eq;
use serde_json::json;
use tests::{fixtures, registry::TestRegistry};

fn issues_for(registry: &TestRegistry, path: &Path) -> Vec<ConsistencyIssue> {
    check_conflicts(&registry.scan(), &registry.categories())
        .consistency
        .into_iter()
        .filter(|i| i.path.as_path() == path)
        .map(|i| i.issue)
        .collect()
}

#[test]
fn test_clean_registry() {
    let registry = TestRegistry::new();
    registry.add_server(&fixtures::complete_server("com.alpha-mcp"));
    registry.add_server(&fixtures::http_server("com.beta-http"));
    let mut aliased = fixtures::complete_server("com.gamma-mcp");
    aliased["alias"] = json!("gamma");
    registry.add_server(&aliased);

    let report = check_conflicts(&registry.scan(), &registry.categories());
    assert!(report.is_clean(), "{}", report);
}

#[test]
fn test_file_name_must_match_id() {
    let registry = TestRegistry::new();
    let path = registry.add_server_as("wrong-name.json", &fixtures::complete_server("com.alpha-mcp"));

    assert_eq!(
        issues_for(&registry, &path),
        vec![ConsistencyIssue::FileNameMismatch {
            id: "com.alpha-mcp".to_string(),
            file_name: "wrong-name.json".to_string(),
        }]
    );
}

#[test]
fn test_id_pattern() {
    let registry = TestRegistry::new();
    let path = registry.add_server(&fixtures::complete_server("com.foo.bar"));

    assert_eq!(
        issues_for(&registry, &path),
        vec![ConsistencyIssue::InvalidIdPattern {
            id: "com.foo.bar".to_string()
        }]
    );
}

#[test]
fn test_description_and_categories_required() {
    let registry = TestRegistry::new();
    let mut descriptor = fixtures::complete_server("com.alpha-mcp");
    descriptor.as_object_mut().unwrap().remove("description");
    descriptor["categories"] = json!([]);
    let path = registry.add_server(&descriptor);

    assert_eq!(
        issues_for(&registry, &path),
        vec![
            ConsistencyIssue::MissingDescription,
            ConsistencyIssue::MissingCategories
        ]
    );
}

#[test]
fn test_unknown_category() {
    let registry = TestRegistry::new();
    let mut descriptor = fixtures::complete_server("com.alpha-mcp");
    descriptor["categories"] = json!(["developer-tools", "astrology"]);
    let path = registry.add_server(&descriptor);

    assert_eq!(
        issues_for(&registry, &path),
        vec![ConsistencyIssue::UnknownCategory {
            category: "astrology".to_string()
        }]
    );
}

#[test]
fn test_transport_required_fields() {
    let registry = TestRegistry::new();

    let mut stdio = fixtures::complete_server("com.alpha-mcp");
    stdio["transport"]["command"] = json!("");
    let stdio_path = registry.add_server(&stdio);

    let mut http = fixtures::http_server("com.beta-http");
    http["transport"].as_object_mut().unwrap().remove("url");
    let http_path = registry.add_server(&http);

    assert_eq!(
        issues_for(&registry, &stdio_path),
        vec![ConsistencyIssue::MissingCommand]
    );
    assert_eq!(
        issues_for(&registry, &http_path),
        vec![ConsistencyIssue::MissingUrl]
    );
}

#[test]
fn test_issues_from_every_file_are_collected() {
    let registry = TestRegistry::new();
    registry.add_server_as("one.json", &fixtures::complete_server("com.alpha-mcp"));
    registry.add_server_as("two.json", &fixtures::complete_server("com.beta-mcp"));

    let report = check_conflicts(&registry.scan(), &registry.categories());
    assert_eq!(report.consistency.len(), 2);
    assert_eq!(report.conflict_count(), 0);
}
