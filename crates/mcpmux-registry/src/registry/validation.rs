//! Per-file validation: parse, sanitize, schema, placeholder references.
//!
//! Every file gets its own [`FileReport`]; one bad file never stops the rest
//! from being checked.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::loader::{load_descriptor, LoadFailure, LoadedDescriptor, RegistryScan};
use super::placeholders::{check_placeholders, PlaceholderIssue};
use super::sanitize::sanitize;
use super::schema::{SchemaValidator, Violation};

/// Outcome of validating one descriptor file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    /// Platform-managed fields removed before validation
    pub stripped: Vec<String>,
    /// Set when the file could not be read or parsed
    pub load_failure: Option<LoadFailure>,
    pub violations: Vec<Violation>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.load_failure.is_none() && self.violations.is_empty()
    }

    fn failed_to_load(failure: LoadFailure) -> Self {
        Self {
            path: failure.path.clone(),
            stripped: Vec::new(),
            load_failure: Some(failure),
            violations: Vec::new(),
        }
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return writeln!(f, "✓ {}", self.path.display());
        }
        writeln!(f, "✗ {}", self.path.display())?;
        if let Some(failure) = &self.load_failure {
            writeln!(f, "    parse error: {}", failure.reason)?;
        }
        for violation in &self.violations {
            writeln!(f, "    {}", violation)?;
        }
        Ok(())
    }
}

/// Aggregate of many [`FileReport`]s
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub files: Vec<FileReport>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(FileReport::is_valid)
    }

    pub fn failing(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|r| !r.is_valid())
    }

    pub fn failure_count(&self) -> usize {
        self.failing().count()
    }
}

/// Validate an already loaded descriptor.
pub fn validate_descriptor(validator: &SchemaValidator, loaded: &LoadedDescriptor) -> FileReport {
    let (clean, stripped) = sanitize(loaded.raw.clone());
    if !stripped.is_empty() {
        warn!(
            "{}: ignoring platform-managed fields: {}",
            loaded.path.display(),
            stripped.join(", ")
        );
    }

    let mut violations = validator.validate(&clean);

    // Placeholder references only make sense once the transport decodes.
    match clean.typed() {
        Ok(server) => {
            violations.extend(
                check_placeholders(&server.transport)
                    .into_iter()
                    .map(placeholder_violation),
            );
        }
        Err(e) => debug!(
            "{}: skipping placeholder check, descriptor does not decode: {}",
            loaded.path.display(),
            e
        ),
    }

    FileReport {
        path: loaded.path.clone(),
        stripped,
        load_failure: None,
        violations,
    }
}

/// Read, parse and validate a single file.
pub fn validate_file(validator: &SchemaValidator, path: &Path) -> FileReport {
    match load_descriptor(path) {
        Ok(loaded) => validate_descriptor(validator, &loaded),
        Err(failure) => FileReport::failed_to_load(failure),
    }
}

/// Validate several files, in the order given.
pub fn validate_files<P: AsRef<Path>>(validator: &SchemaValidator, paths: &[P]) -> ValidationReport {
    ValidationReport {
        files: paths
            .iter()
            .map(|p| validate_file(validator, p.as_ref()))
            .collect(),
    }
}

/// Validate everything a registry scan produced, load failures included.
pub fn validate_scan(validator: &SchemaValidator, scan: &RegistryScan) -> ValidationReport {
    let mut files: Vec<FileReport> = scan
        .descriptors
        .iter()
        .map(|d| validate_descriptor(validator, d))
        .chain(scan.failures.iter().cloned().map(FileReport::failed_to_load))
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    ValidationReport { files }
}

fn placeholder_violation(issue: PlaceholderIssue) -> Violation {
    match issue {
        PlaceholderIssue::UndeclaredInput {
            input_id,
            locations,
        } => {
            let mut message = format!(
                "references undeclared input '{}'; declare it in transport.metadata.inputs",
                input_id
            );
            if locations.len() > 1 {
                message.push_str(&format!(" (also referenced at {})", locations[1..].join(", ")));
            }
            let path = locations.into_iter().next().unwrap_or_default();
            Violation::new(path, message)
        }
        PlaceholderIssue::DuplicateInput { input_id } => Violation::new(
            "/transport/metadata/inputs",
            format!("input '{}' is declared more than once", input_id),
        ),
    }
}
