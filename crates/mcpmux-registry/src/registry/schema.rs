//! JSON Schema validation of server definitions (Draft 2020-12).
//!
//! The schema file is authoritative. If it cannot be read, parsed or
//! compiled, that is a configuration error for the whole run and surfaces
//! as a [`RegistryError`], never as a per-descriptor finding.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Draft, Validator};
use serde_json::Value;
use tracing::debug;

use super::sanitize::CleanDescriptor;
use crate::error::{RegistryError, Result};

/// A single structural problem in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the descriptor; empty for the document root
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Compiled server-definition schema.
pub struct SchemaValidator {
    schema_path: PathBuf,
    validator: Validator,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_path", &self.schema_path)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Load and compile the schema at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let load_err = |reason: String| RegistryError::SchemaLoad {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let schema: Value =
            serde_json::from_str(&content).map_err(|e| load_err(format!("invalid JSON: {e}")))?;
        Self::compile(&schema, path)
    }

    /// Compile an in-memory schema; `origin` is only used in messages.
    pub fn compile(schema: &Value, origin: &Path) -> Result<Self> {
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft202012);
        // Formats are annotations in 2020-12 unless asserted explicitly
        opts.should_validate_formats(true);

        let validator = opts
            .build(schema)
            .map_err(|e| RegistryError::SchemaCompile {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("Compiled schema {}", origin.display());
        Ok(Self {
            schema_path: origin.to_path_buf(),
            validator,
        })
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Collect every violation; empty means valid.
    pub fn validate(&self, descriptor: &CleanDescriptor) -> Vec<Violation> {
        self.validate_value(descriptor.as_value())
    }

    pub fn is_valid(&self, descriptor: &CleanDescriptor) -> bool {
        self.validator.is_valid(descriptor.as_value())
    }

    pub(crate) fn validate_value(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}
