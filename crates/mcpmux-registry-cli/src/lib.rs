//! # mcp-registry CLI
//!
//! Pre-merge gate and bundler for the McpMux server registry.
//!
//! ## Subcommands
//!
//! - `mcp-registry validate <FILES>...` - Schema and placeholder checks for the given files
//! - `mcp-registry validate-all` - The same over every `servers/*.json`
//! - `mcp-registry check-conflicts` - Duplicate id/alias detection plus consistency rules
//! - `mcp-registry build` - Write the registry bundle
//! - `mcp-registry inventory` - Maintainer listing of launchers and links
//!
//! Every subcommand returns the process exit code: 0 when clean, 1 on any
//! finding or failure.

pub mod build;
pub mod conflicts;
pub mod inventory;
pub mod validate;

use anyhow::{Context, Result};
use mcpmux_registry::{RegistryLayout, SchemaValidator};

/// Compile the layout's schema; failure is a configuration error.
pub fn load_validator(layout: &RegistryLayout) -> Result<SchemaValidator> {
    SchemaValidator::from_path(layout.schema_path())
        .with_context(|| format!("cannot use schema {}", layout.schema_path().display()))
}
