//! Shared test utilities and fixtures for registry integration tests.

use std::path::{Path, PathBuf};

pub use mcpmux_registry::{
    CategorySet, RegistryLayout, RegistryScan, SchemaValidator,
};

/// Repository root of this checkout (holds the real schema and servers/)
pub fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// The schema shipped with the registry
pub fn shipped_schema_path() -> PathBuf {
    repo_root().join(mcpmux_registry::layout::SCHEMA_FILE)
}

/// Descriptor fixtures
pub mod fixtures {
    use serde_json::{json, Value};

    /// Smallest descriptor the schema accepts
    pub fn minimal_server(id: &str) -> Value {
        json!({
            "id": id,
            "name": "Test",
            "transport": { "type": "stdio", "command": "echo" }
        })
    }

    /// Descriptor that also satisfies every consistency rule
    pub fn complete_server(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Server {}", id),
            "description": "A server used in tests",
            "categories": ["developer-tools"],
            "transport": {
                "type": "stdio",
                "command": "npx",
                "args": ["-y", "@example/server", "--token", "${input:API_TOKEN}"],
                "metadata": {
                    "inputs": [
                        { "id": "API_TOKEN", "label": "API token", "type": "password", "secret": true }
                    ]
                }
            },
            "links": { "repository": "https://github.com/example/server" }
        })
    }

    /// Remote descriptor that satisfies every consistency rule
    pub fn http_server(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Remote {}", id),
            "description": "A hosted server used in tests",
            "categories": ["productivity"],
            "transport": { "type": "http", "url": "https://mcp.example.com/mcp" },
            "auth": { "type": "oauth" }
        })
    }

    pub fn test_categories() -> Value {
        json!([
            { "id": "developer-tools", "name": "Developer Tools", "icon": "🛠️" },
            { "id": "productivity", "name": "Productivity" }
        ])
    }
}

/// On-disk registry helpers
pub mod registry {
    use super::*;
    use mcpmux_registry::{load_categories, scan_registry};
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    /// A throwaway registry checkout: `servers/`, the real schema and a
    /// category file. Removed on drop.
    pub struct TestRegistry {
        _temp_dir: TempDir,
        layout: RegistryLayout,
    }

    impl TestRegistry {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let root = temp_dir.path();

            fs::create_dir_all(root.join("servers")).expect("Failed to create servers dir");
            fs::create_dir_all(root.join("schemas")).expect("Failed to create schemas dir");
            fs::copy(
                shipped_schema_path(),
                root.join(mcpmux_registry::layout::SCHEMA_FILE),
            )
            .expect("Failed to copy schema");

            let registry = Self {
                layout: RegistryLayout::new(root),
                _temp_dir: temp_dir,
            };
            registry.write_categories(&fixtures::test_categories());
            registry
        }

        pub fn root(&self) -> &Path {
            self.layout.root()
        }

        pub fn layout(&self) -> &RegistryLayout {
            &self.layout
        }

        /// Write `servers/<id>.json`
        pub fn add_server(&self, descriptor: &Value) -> PathBuf {
            let id = descriptor["id"].as_str().expect("fixture without id");
            self.add_server_as(&format!("{}.json", id), descriptor)
        }

        /// Write a descriptor under an explicit file name
        pub fn add_server_as(&self, file_name: &str, descriptor: &Value) -> PathBuf {
            let content = serde_json::to_string_pretty(descriptor).expect("serialize fixture");
            self.add_raw(file_name, &content)
        }

        /// Write arbitrary bytes into `servers/`
        pub fn add_raw(&self, file_name: &str, content: &str) -> PathBuf {
            let path = self.layout.servers_dir().join(file_name);
            fs::write(&path, content).expect("Failed to write descriptor");
            path
        }

        pub fn write_categories(&self, categories: &Value) {
            fs::write(
                self.layout.categories_path(),
                serde_json::to_string_pretty(categories).expect("serialize categories"),
            )
            .expect("Failed to write categories");
        }

        pub fn write_curation(&self, curation: &Value) {
            fs::write(
                self.layout.curation_path(),
                serde_json::to_string_pretty(curation).expect("serialize curation"),
            )
            .expect("Failed to write curation");
        }

        pub fn validator(&self) -> SchemaValidator {
            SchemaValidator::from_path(self.layout.schema_path()).expect("schema compiles")
        }

        pub fn scan(&self) -> RegistryScan {
            scan_registry(self.layout.servers_dir()).expect("servers dir exists")
        }

        pub fn categories(&self) -> CategorySet {
            load_categories(self.layout.categories_path()).expect("categories load")
        }

        /// Number of `*.json` files in `servers/`
        pub fn file_count(&self) -> usize {
            fs::read_dir(self.layout.servers_dir())
                .expect("servers dir exists")
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                .count()
        }
    }

    impl Default for TestRegistry {
        fn default() -> Self {
            Self::new()
        }
    }
}
