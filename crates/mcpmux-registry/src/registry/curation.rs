//! Maintainer-controlled curation: featured, sponsored, badges, home sections.
//!
//! Contributors cannot mark their own server as featured; these flags come
//! only from `curation.json`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};

/// A curated group of servers shown on the client home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub server_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Curation {
    /// Featured server ids, in display order
    #[serde(default)]
    pub featured: Vec<String>,
    #[serde(default)]
    pub sponsored: Vec<String>,
    /// Server id -> badge names
    #[serde(default)]
    pub badges: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub sections: Vec<HomeSection>,
}

impl Curation {
    pub fn is_featured(&self, id: &str) -> bool {
        self.featured.iter().any(|f| f == id)
    }

    pub fn is_sponsored(&self, id: &str) -> bool {
        self.sponsored.iter().any(|s| s == id)
    }

    pub fn badges_for(&self, id: &str) -> &[String] {
        self.badges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop every id not in `known`, logging each one.
    ///
    /// Lists keep their order; repeated ids keep only the first occurrence.
    pub fn retain_known(self, known: &BTreeSet<&str>) -> Self {
        let keep = |list: Vec<String>, what: &str| -> Vec<String> {
            let mut seen = BTreeSet::new();
            list.into_iter()
                .filter(|id| {
                    if !known.contains(id.as_str()) {
                        warn!("Curation: {} id '{}' is not in the registry, dropping", what, id);
                        return false;
                    }
                    seen.insert(id.clone())
                })
                .collect()
        };

        let featured = keep(self.featured, "featured");
        let sponsored = keep(self.sponsored, "sponsored");
        let badges = self
            .badges
            .into_iter()
            .filter(|(id, _)| {
                let found = known.contains(id.as_str());
                if !found {
                    warn!("Curation: badge id '{}' is not in the registry, dropping", id);
                }
                found
            })
            .collect();
        let sections = self
            .sections
            .into_iter()
            .map(|section| HomeSection {
                server_ids: keep(section.server_ids, format!("section '{}'", section.id).as_str()),
                ..section
            })
            .collect();

        Self {
            featured,
            sponsored,
            badges,
            sections,
        }
    }
}

/// Load `curation.json`. A missing file means no curation.
pub fn load_curation(path: &Path) -> Result<Curation> {
    if !path.exists() {
        debug!("No curation file at {}, using defaults", path.display());
        return Ok(Curation::default());
    }

    let err = |reason: String| RegistryError::Curation {
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| err(e.to_string()))
}
