//! Cross-file conflict detection and per-file consistency rules.
//!
//! Collisions are computed from the raw `id`/`alias` strings so even files
//! whose structure does not decode take part. The checker only detects:
//! every offending file is listed and nothing is resolved.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use super::loader::{LoadFailure, LoadedDescriptor, RegistryScan};
use super::sanitize::sanitize;
use crate::domain::{CategorySet, TransportConfig};

lazy_static! {
    /// `{tld}.{publisher}-{name}`: lowercase, exactly one dot
    pub static ref ID_PATTERN: Regex = Regex::new(r"^[a-z0-9]+\.[a-z0-9][a-z0-9-]*$").unwrap();
}

/// Returns true when `id` follows the registry naming pattern.
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    MissingId,
    InvalidIdPattern { id: String },
    FileNameMismatch { id: String, file_name: String },
    MissingDescription,
    MissingCategories,
    UnknownCategory { category: String },
    MissingCommand,
    MissingUrl,
    /// The descriptor does not decode into a server definition
    Undecodable { reason: String },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "missing 'id'"),
            Self::InvalidIdPattern { id } => write!(
                f,
                "id '{}' does not match {}",
                id,
                ID_PATTERN.as_str()
            ),
            Self::FileNameMismatch { id, file_name } => {
                write!(f, "file name '{}' should be '{}.json'", file_name, id)
            }
            Self::MissingDescription => write!(f, "missing or empty 'description'"),
            Self::MissingCategories => write!(f, "'categories' must list at least one category"),
            Self::UnknownCategory { category } => write!(f, "unknown category '{}'", category),
            Self::MissingCommand => write!(f, "stdio transport requires a non-empty 'command'"),
            Self::MissingUrl => write!(f, "http transport requires a non-empty 'url'"),
            Self::Undecodable { reason } => write!(f, "invalid structure: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIssue {
    pub path: PathBuf,
    pub issue: ConsistencyIssue,
}

/// An alias equal to some descriptor's id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasShadow {
    pub alias: String,
    pub alias_files: Vec<PathBuf>,
    pub id_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ConflictReport {
    /// id -> every file declaring it (only ids declared more than once)
    pub duplicate_ids: BTreeMap<String, Vec<PathBuf>>,
    /// alias -> every file declaring it (only aliases declared more than once)
    pub duplicate_aliases: BTreeMap<String, Vec<PathBuf>>,
    pub alias_shadows: Vec<AliasShadow>,
    pub consistency: Vec<FileIssue>,
    /// Files that never parsed
    pub load_failures: Vec<LoadFailure>,
}

impl ConflictReport {
    /// Number of collision groups (duplicate ids, duplicate aliases, shadows)
    pub fn conflict_count(&self) -> usize {
        self.duplicate_ids.len() + self.duplicate_aliases.len() + self.alias_shadows.len()
    }

    pub fn is_clean(&self) -> bool {
        self.conflict_count() == 0 && self.consistency.is_empty() && self.load_failures.is_empty()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, files) in &self.duplicate_ids {
            writeln!(f, "Duplicate id '{}':", id)?;
            write_files(f, files)?;
        }
        for (alias, files) in &self.duplicate_aliases {
            writeln!(f, "Duplicate alias '{}':", alias)?;
            write_files(f, files)?;
        }
        for shadow in &self.alias_shadows {
            writeln!(f, "Alias '{}' collides with an existing id:", shadow.alias)?;
            writeln!(f, "  alias declared in:")?;
            write_files(f, &shadow.alias_files)?;
            writeln!(f, "  id declared in:")?;
            write_files(f, &shadow.id_files)?;
        }
        for failure in &self.load_failures {
            writeln!(f, "Unreadable descriptor: {}", failure)?;
        }
        for issue in &self.consistency {
            writeln!(f, "{}: {}", issue.path.display(), issue.issue)?;
        }
        Ok(())
    }
}

fn write_files(f: &mut fmt::Formatter<'_>, files: &[PathBuf]) -> fmt::Result {
    for file in files {
        writeln!(f, "  - {}", file.display())?;
    }
    Ok(())
}

/// Run every cross-file and per-file rule over a registry scan.
pub fn check_conflicts(scan: &RegistryScan, categories: &CategorySet) -> ConflictReport {
    let mut ids: BTreeMap<String, BTreeSet<PathBuf>> = BTreeMap::new();
    let mut aliases: BTreeMap<String, BTreeSet<PathBuf>> = BTreeMap::new();
    let mut consistency = Vec::new();

    for descriptor in &scan.descriptors {
        if let Some(id) = descriptor.raw.id() {
            ids.entry(id.to_string())
                .or_default()
                .insert(descriptor.path.clone());
        }
        if let Some(alias) = descriptor.raw.alias() {
            aliases
                .entry(alias.to_string())
                .or_default()
                .insert(descriptor.path.clone());
        }
        consistency.extend(
            check_consistency(descriptor, categories)
                .into_iter()
                .map(|issue| FileIssue {
                    path: descriptor.path.clone(),
                    issue,
                }),
        );
    }

    let alias_shadows = aliases
        .iter()
        .filter_map(|(alias, alias_files)| {
            ids.get(alias).map(|id_files| AliasShadow {
                alias: alias.clone(),
                alias_files: alias_files.iter().cloned().collect(),
                id_files: id_files.iter().cloned().collect(),
            })
        })
        .collect();

    let report = ConflictReport {
        duplicate_ids: collisions(ids),
        duplicate_aliases: collisions(aliases),
        alias_shadows,
        consistency,
        load_failures: scan.failures.clone(),
    };

    info!(
        "Checked {} descriptors: {} conflicts, {} consistency issues",
        scan.descriptors.len(),
        report.conflict_count(),
        report.consistency.len()
    );
    report
}

fn collisions(map: BTreeMap<String, BTreeSet<PathBuf>>) -> BTreeMap<String, Vec<PathBuf>> {
    map.into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(key, files)| (key, files.into_iter().collect()))
        .collect()
}

/// Per-file rules checked alongside the conflict pass.
pub fn check_consistency(
    descriptor: &LoadedDescriptor,
    categories: &CategorySet,
) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();

    match descriptor.raw.id() {
        None => issues.push(ConsistencyIssue::MissingId),
        Some(id) => {
            if !is_valid_id(id) {
                issues.push(ConsistencyIssue::InvalidIdPattern { id: id.to_string() });
            }
            if let Some(issue) = file_name_issue(&descriptor.path, id) {
                issues.push(issue);
            }
        }
    }

    let (clean, _) = sanitize(descriptor.raw.clone());
    let server = match clean.typed() {
        Ok(server) => server,
        Err(e) => {
            debug!("{}: does not decode: {}", descriptor.path.display(), e);
            issues.push(ConsistencyIssue::Undecodable {
                reason: e.to_string(),
            });
            return issues;
        }
    };

    if server
        .description
        .as_deref()
        .map_or(true, |d| d.trim().is_empty())
    {
        issues.push(ConsistencyIssue::MissingDescription);
    }

    if server.categories.is_empty() {
        issues.push(ConsistencyIssue::MissingCategories);
    }
    for category in &server.categories {
        if !categories.contains(category) {
            issues.push(ConsistencyIssue::UnknownCategory {
                category: category.clone(),
            });
        }
    }

    match &server.transport {
        TransportConfig::Stdio { command, .. } if command.trim().is_empty() => {
            issues.push(ConsistencyIssue::MissingCommand)
        }
        TransportConfig::Http { url, .. } if url.trim().is_empty() => {
            issues.push(ConsistencyIssue::MissingUrl)
        }
        _ => {}
    }

    issues
}

fn file_name_issue(path: &Path, id: &str) -> Option<ConsistencyIssue> {
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    (file_name != format!("{}.json", id)).then(|| ConsistencyIssue::FileNameMismatch {
        id: id.to_string(),
        file_name,
    })
}
