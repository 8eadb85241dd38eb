//! Bundle assembly: every descriptor, the categories, and the client UI config
//! in one document.
//!
//! [`BundleBuilder::build`] is pure; the timestamp is passed in so repeated
//! builds over the same input differ only in `updated_at`.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write as _};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::curation::{load_curation, Curation, HomeSection};
use super::loader::{load_categories, scan_registry};
use super::sanitize::{sanitize, CleanDescriptor, PublishedDescriptor};
use crate::domain::{Category, CategorySet};
use crate::error::{RegistryError, Result};
use crate::layout::{RegistryLayout, REGISTRY_SCHEMA_VERSION};

pub const DEFAULT_SORT: &str = "recommended";
pub const ITEMS_PER_PAGE: u32 = 24;

// ============================================
// Bundle Types
// ============================================

/// Complete registry bundle, as served from /v1/bundle
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegistryBundle {
    pub version: String,
    pub updated_at: String,
    pub servers: Vec<PublishedDescriptor>,
    pub categories: Vec<Category>,
    pub ui: UiConfig,
    pub home: HomeConfig,
}

// ============================================
// UI Configuration Types
// ============================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiConfig {
    pub filters: Vec<FilterDefinition>,
    pub sort_options: Vec<SortOption>,
    pub default_sort: String,
    pub items_per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterDefinition {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub filter_type: String, // "single" or "multi"
    pub options: Vec<FilterOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_rule: Option<FilterMatch>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterMatch {
    pub field: String,
    pub operator: String, // "eq", "in", "contains"
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SortOption {
    pub id: String,
    pub label: String,
    pub rules: Vec<SortRule>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SortRule {
    pub field: String,
    pub direction: String, // "asc" or "desc"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<String>, // "first" or "last"
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HomeConfig {
    pub featured_server_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<HomeSection>,
}

fn option(id: &str, label: &str, icon: Option<&str>, rule: Option<FilterMatch>) -> FilterOption {
    FilterOption {
        id: id.to_string(),
        label: label.to_string(),
        icon: icon.map(str::to_string),
        match_rule: rule,
    }
}

fn matching(field: &str, operator: &str, value: Value) -> Option<FilterMatch> {
    Some(FilterMatch {
        field: field.to_string(),
        operator: operator.to_string(),
        value,
    })
}

fn rule(field: &str, direction: &str, nulls: Option<&str>) -> SortRule {
    SortRule {
        field: field.to_string(),
        direction: direction.to_string(),
        nulls: nulls.map(str::to_string),
    }
}

/// Static UI block: the same for every build.
pub fn default_ui_config() -> UiConfig {
    UiConfig {
        filters: vec![
            FilterDefinition {
                id: "transport".to_string(),
                label: "Transport".to_string(),
                filter_type: "single".to_string(),
                options: vec![
                    option("all", "All", None, None),
                    option(
                        "stdio",
                        "Local",
                        Some("💻"),
                        matching("transport.type", "eq", json!("stdio")),
                    ),
                    option(
                        "http",
                        "Remote",
                        Some("🌐"),
                        matching("transport.type", "eq", json!("http")),
                    ),
                ],
            },
            FilterDefinition {
                id: "auth".to_string(),
                label: "Authentication".to_string(),
                filter_type: "multi".to_string(),
                options: vec![
                    option(
                        "none",
                        "No auth",
                        None,
                        matching("auth.type", "in", json!(["none"])),
                    ),
                    option(
                        "api_key",
                        "API key",
                        Some("🔑"),
                        matching("auth.type", "in", json!(["api_key", "optional_api_key"])),
                    ),
                    option(
                        "oauth",
                        "OAuth",
                        Some("🔐"),
                        matching("auth.type", "eq", json!("oauth")),
                    ),
                ],
            },
        ],
        sort_options: vec![
            SortOption {
                id: DEFAULT_SORT.to_string(),
                label: "Recommended".to_string(),
                rules: vec![
                    rule("featured", "desc", None),
                    rule("sponsored", "desc", None),
                    rule("stats.install_count", "desc", Some("last")),
                    rule("name", "asc", None),
                ],
            },
            SortOption {
                id: "name_asc".to_string(),
                label: "Name (A-Z)".to_string(),
                rules: vec![rule("name", "asc", None)],
            },
            SortOption {
                id: "name_desc".to_string(),
                label: "Name (Z-A)".to_string(),
                rules: vec![rule("name", "desc", None)],
            },
        ],
        default_sort: DEFAULT_SORT.to_string(),
        items_per_page: ITEMS_PER_PAGE,
    }
}

/// Populate the platform-managed fields from curation.
///
/// Anything the descriptor carried in those fields was already removed by
/// [`sanitize`]; the values written here come only from `curation`.
pub fn enrich(clean: CleanDescriptor, curation: &Curation) -> PublishedDescriptor {
    let id = clean.id().unwrap_or_default().to_string();
    let mut value = clean.into_value();
    if let Value::Object(map) = &mut value {
        map.insert("featured".to_string(), json!(curation.is_featured(&id)));
        map.insert("sponsored".to_string(), json!(curation.is_sponsored(&id)));
        map.insert("badges".to_string(), json!(curation.badges_for(&id)));
        map.insert("stats".to_string(), json!({ "install_count": 0 }));
    }
    PublishedDescriptor::new(value)
}

/// Aggregates clean descriptors into a [`RegistryBundle`].
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    version: String,
    ui: UiConfig,
}

impl Default for BundleBuilder {
    fn default() -> Self {
        Self::new(REGISTRY_SCHEMA_VERSION)
    }
}

impl BundleBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ui: default_ui_config(),
        }
    }

    pub fn with_ui(mut self, ui: UiConfig) -> Self {
        self.ui = ui;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build the bundle. Servers come out sorted by id.
    pub fn build(
        &self,
        descriptors: Vec<CleanDescriptor>,
        categories: &CategorySet,
        curation: &Curation,
        updated_at: DateTime<Utc>,
    ) -> RegistryBundle {
        let known: BTreeSet<&str> = descriptors.iter().filter_map(|d| d.id()).collect();
        let curation = curation.clone().retain_known(&known);

        let mut servers: Vec<PublishedDescriptor> = descriptors
            .into_iter()
            .map(|d| enrich(d, &curation))
            .collect();
        servers.sort_by(|a, b| a.id().cmp(&b.id()));

        info!(
            "Built bundle {}: {} servers, {} featured",
            self.version,
            servers.len(),
            curation.featured.len()
        );

        RegistryBundle {
            version: self.version.clone(),
            updated_at: updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            servers,
            categories: categories.as_slice().to_vec(),
            ui: self.ui.clone(),
            home: HomeConfig {
                featured_server_ids: curation.featured,
                sections: curation.sections,
            },
        }
    }

    /// Read the registry described by `layout` and build its bundle.
    ///
    /// Any descriptor that fails to read or parse aborts the build.
    pub fn build_from_layout(
        &self,
        layout: &RegistryLayout,
        updated_at: DateTime<Utc>,
    ) -> Result<RegistryBundle> {
        let scan = scan_registry(layout.servers_dir())?;
        if !scan.failures.is_empty() {
            return Err(RegistryError::UnreadableDescriptors {
                failures: scan.failures,
            });
        }

        let categories = load_categories(layout.categories_path())?;
        let curation = load_curation(layout.curation_path())?;

        let descriptors = scan
            .descriptors
            .into_iter()
            .map(|loaded| {
                let (clean, stripped) = sanitize(loaded.raw);
                if !stripped.is_empty() {
                    debug!(
                        "{}: stripped {}",
                        loaded.path.display(),
                        stripped.join(", ")
                    );
                }
                clean
            })
            .collect();

        Ok(self.build(descriptors, &categories, &curation, updated_at))
    }
}

/// Write the bundle as pretty JSON.
///
/// The file is staged next to `path` and renamed into place, so a failed
/// write never leaves a partial bundle behind.
pub fn write_bundle(path: &Path, bundle: &RegistryBundle) -> Result<()> {
    let write_err = |source: io::Error| RegistryError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut json = serde_json::to_string_pretty(bundle).map_err(|e| write_err(e.into()))?;
    json.push('\n');

    let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(json.as_bytes()).map_err(write_err)?;
    staged.flush().map_err(write_err)?;
    staged.persist(path).map_err(|e| write_err(e.error))?;

    info!("Wrote bundle to {}", path.display());
    Ok(())
}
