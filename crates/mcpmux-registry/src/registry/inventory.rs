//! Read-only listing of the registry for maintainers.
//!
//! Advisory only: nothing here fails a check.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use super::loader::{LoadedDescriptor, RegistryScan};
use super::sanitize::sanitize;
use crate::domain::{has_launcher_suffix, Launcher, TransportType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub id: String,
    pub name: String,
    pub file: PathBuf,
    pub transport: TransportType,
    pub launcher: String,
    pub has_suffix: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Id this entry would take with its launcher suffix appended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_id: Option<String>,
}

impl InventoryEntry {
    fn from_descriptor(descriptor: &LoadedDescriptor) -> Option<Self> {
        let (clean, _) = sanitize(descriptor.raw.clone());
        let server = match clean.typed() {
            Ok(server) => server,
            Err(e) => {
                warn!("{}: not listed: {}", descriptor.path.display(), e);
                return None;
            }
        };

        let launcher = server.transport.launcher();
        let has_suffix = has_launcher_suffix(&server.id);
        let suggested_id = match launcher {
            Launcher::Npx | Launcher::Uvx | Launcher::Docker if !has_suffix => {
                Some(format!("{}{}", server.id, launcher.suffix()))
            }
            _ => None,
        };

        Some(Self {
            transport: server.transport.transport_type(),
            launcher: launcher.label().to_string(),
            has_suffix,
            repository: server.links.and_then(|l| l.repository),
            suggested_id,
            file: descriptor.path.clone(),
            id: server.id,
            name: server.name,
        })
    }

    /// A packaged stdio server whose id does not name its launcher
    pub fn needs_rename(&self) -> bool {
        self.suggested_id.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    pub entries: Vec<InventoryEntry>,
    /// Files that loaded but did not decode
    pub skipped: Vec<PathBuf>,
}

impl Inventory {
    pub fn from_scan(scan: &RegistryScan) -> Self {
        let mut inventory = Self::default();
        for descriptor in &scan.descriptors {
            match InventoryEntry::from_descriptor(descriptor) {
                Some(entry) => inventory.entries.push(entry),
                None => inventory.skipped.push(descriptor.path.clone()),
            }
        }
        inventory
            .skipped
            .extend(scan.failures.iter().map(|f| f.path.clone()));
        inventory.entries.sort_by(|a, b| a.id.cmp(&b.id));
        inventory
    }

    pub fn needing_rename(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.iter().filter(|e| e.needs_rename())
    }

    /// Entry count per launcher label
    pub fn launcher_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.launcher.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct repository links, sorted
    pub fn repositories(&self) -> Vec<&str> {
        let mut repos: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|e| e.repository.as_deref())
            .collect();
        repos.sort_unstable();
        repos.dedup();
        repos
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<45} {:<6} {:<8} {:<7} {}",
            "Id", "Type", "Launcher", "Suffix", "Repository"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "{:<45} {:<6} {:<8} {:<7} {}",
                e.id,
                e.transport.as_str(),
                e.launcher,
                if e.has_suffix { "yes" } else { "no" },
                e.repository.as_deref().unwrap_or("-")
            )?;
        }

        let rename: Vec<&InventoryEntry> = self.needing_rename().collect();
        writeln!(f, "\nMissing launcher suffix: {}", rename.len())?;
        for e in rename {
            if let Some(suggested) = &e.suggested_id {
                writeln!(f, "  {} -> {}", e.id, suggested)?;
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f, "\nSkipped (unreadable): {}", self.skipped.len())?;
            for path in &self.skipped {
                writeln!(f, "  {}", path.display())?;
            }
        }
        Ok(())
    }
}
