//! Fatal registry errors.
//!
//! Per-file findings (schema violations, conflicts, consistency issues) are
//! not errors: they are collected into reports. This enum covers the
//! conditions that stop an operation outright.

use std::path::PathBuf;

use thiserror::Error;

use crate::registry::LoadFailure;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// The schema document could not be read or parsed.
    #[error("schema load error for '{}': {reason}", .path.display())]
    SchemaLoad { path: PathBuf, reason: String },

    /// The schema parsed but is not a valid JSON Schema.
    #[error("schema compile error for '{}': {reason}", .path.display())]
    SchemaCompile { path: PathBuf, reason: String },

    /// The category list could not be read or parsed.
    #[error("category file error for '{}': {reason}", .path.display())]
    Categories { path: PathBuf, reason: String },

    /// The curation file exists but could not be read or parsed.
    #[error("curation file error for '{}': {reason}", .path.display())]
    Curation { path: PathBuf, reason: String },

    /// At least one descriptor could not be loaded; a bundle is never built
    /// from a partial set.
    #[error(
        "{} descriptor file(s) could not be loaded:\n{}",
        .failures.len(),
        format_failures(.failures)
    )]
    UnreadableDescriptors { failures: Vec<LoadFailure> },

    /// The bundle could not be written.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid descriptor glob: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

fn format_failures(failures: &[LoadFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}
