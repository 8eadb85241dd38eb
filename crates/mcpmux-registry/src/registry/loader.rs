//! Reading descriptor and category files from disk.
//!
//! Every descriptor is read independently; a broken file becomes a
//! [`LoadFailure`] and the scan moves on. Whether failures are fatal is the
//! caller's decision.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::sanitize::RawDescriptor;
use crate::domain::{Category, CategorySet};
use crate::error::{RegistryError, Result};

/// Why a descriptor file did not load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailureKind {
    /// The file could not be read
    Read,
    /// The file is not well-formed JSON
    Parse,
    /// Well-formed JSON, but not an object
    NotObject,
}

#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub kind: LoadFailureKind,
    pub reason: String,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            LoadFailureKind::Read => "cannot read file",
            LoadFailureKind::Parse => "invalid JSON",
            LoadFailureKind::NotObject => "not a JSON object",
        };
        write!(f, "{}: {}: {}", self.path.display(), what, self.reason)
    }
}

/// One successfully parsed descriptor file
#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    pub path: PathBuf,
    pub raw: RawDescriptor,
}

impl LoadedDescriptor {
    /// File name without the `.json` extension
    pub fn file_stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }
}

/// Result of reading the whole `servers/` directory, sorted by path.
#[derive(Debug, Clone, Default)]
pub struct RegistryScan {
    pub descriptors: Vec<LoadedDescriptor>,
    pub failures: Vec<LoadFailure>,
}

impl RegistryScan {
    /// Total number of descriptor files seen, loaded or not
    pub fn file_count(&self) -> usize {
        self.descriptors.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read and parse a single descriptor file.
pub fn load_descriptor(path: &Path) -> std::result::Result<LoadedDescriptor, LoadFailure> {
    let failure = |kind, reason: String| LoadFailure {
        path: path.to_path_buf(),
        kind,
        reason,
    };

    let content =
        fs::read_to_string(path).map_err(|e| failure(LoadFailureKind::Read, e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| failure(LoadFailureKind::Parse, e.to_string()))?;
    let raw = RawDescriptor::from_value(value).ok_or_else(|| {
        failure(
            LoadFailureKind::NotObject,
            "descriptor must be a JSON object".to_string(),
        )
    })?;

    debug!("Loaded descriptor {}", path.display());
    Ok(LoadedDescriptor {
        path: path.to_path_buf(),
        raw,
    })
}

/// List every `*.json` file directly under `servers_dir`, sorted.
pub fn descriptor_paths(servers_dir: &Path) -> Result<Vec<PathBuf>> {
    if !servers_dir.is_dir() {
        return Err(RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("servers directory not found: {}", servers_dir.display()),
        )));
    }

    let pattern = format!(
        "{}/*.json",
        glob::Pattern::escape(&servers_dir.to_string_lossy())
    );
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => return Err(RegistryError::Io(e.into())),
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load every descriptor in `servers_dir`, collecting failures.
pub fn scan_registry(servers_dir: &Path) -> Result<RegistryScan> {
    let mut scan = RegistryScan::default();
    for path in descriptor_paths(servers_dir)? {
        match load_descriptor(&path) {
            Ok(descriptor) => scan.descriptors.push(descriptor),
            Err(failure) => scan.failures.push(failure),
        }
    }

    info!(
        "Scanned {}: {} descriptors, {} unreadable",
        servers_dir.display(),
        scan.descriptors.len(),
        scan.failures.len()
    );
    Ok(scan)
}

/// Load the category list. Any failure here is fatal.
pub fn load_categories(path: &Path) -> Result<CategorySet> {
    let err = |reason: String| RegistryError::Categories {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
    let categories: Vec<Category> =
        serde_json::from_str(&content).map_err(|e| err(e.to_string()))?;
    Ok(CategorySet::new(categories))
}
