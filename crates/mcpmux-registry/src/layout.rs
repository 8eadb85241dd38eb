//! On-disk layout of the registry repository.

use std::path::{Path, PathBuf};

/// Bundle/schema version stamped into every bundle
pub const REGISTRY_SCHEMA_VERSION: &str = "1.0";

pub const SERVERS_DIR: &str = "servers";
pub const SCHEMA_FILE: &str = "schemas/server-definition.schema.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const CURATION_FILE: &str = "curation.json";
pub const BUNDLE_OUTPUT_FILE: &str = "dist/registry-bundle.json";

/// Resolved paths for one registry checkout.
///
/// Every path defaults to its conventional location under `root`; the CLI
/// overrides individual entries from flags or environment.
#[derive(Debug, Clone)]
pub struct RegistryLayout {
    root: PathBuf,
    servers_dir: PathBuf,
    schema_path: PathBuf,
    categories_path: PathBuf,
    curation_path: PathBuf,
    output_path: PathBuf,
}

impl RegistryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            servers_dir: root.join(SERVERS_DIR),
            schema_path: root.join(SCHEMA_FILE),
            categories_path: root.join(CATEGORIES_FILE),
            curation_path: root.join(CURATION_FILE),
            output_path: root.join(BUNDLE_OUTPUT_FILE),
            root,
        }
    }

    /// Walk up from `start` to the first directory holding both `servers/`
    /// and `schemas/`.
    pub fn discover(start: &Path) -> Option<Self> {
        start
            .ancestors()
            .find(|dir| dir.join(SERVERS_DIR).is_dir() && dir.join("schemas").is_dir())
            .map(Self::new)
    }

    pub fn with_schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = path.into();
        self
    }

    pub fn with_categories_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.categories_path = path.into();
        self
    }

    pub fn with_curation_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.curation_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn servers_dir(&self) -> &Path {
        &self.servers_dir
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    pub fn categories_path(&self) -> &Path {
        &self.categories_path
    }

    pub fn curation_path(&self) -> &Path {
        &self.curation_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}
