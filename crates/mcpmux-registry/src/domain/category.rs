use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A browsable category, as listed in `categories.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Any other keys, carried into the bundle untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full, ordered category list plus an id index for membership checks.
#[derive(Debug, Clone, Default)]
pub struct CategorySet {
    categories: Vec<Category>,
    ids: BTreeSet<String>,
}

impl CategorySet {
    pub fn new(categories: Vec<Category>) -> Self {
        let ids = categories.iter().map(|c| c.id.clone()).collect();
        Self { categories, ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Categories in file order
    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
