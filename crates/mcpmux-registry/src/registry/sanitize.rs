//! Platform-managed field stripping.
//!
//! Contributors never write `badges`, `stats`, `sponsored`, `featured`,
//! verification flags or `_platform*` keys. [`sanitize`] removes them and is
//! the only way to obtain a [`CleanDescriptor`]; the bundler's `enrich` is the
//! only way to obtain a [`PublishedDescriptor`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ServerDefinition;

/// Top-level fields only the bundler may write
pub const PLATFORM_FIELDS: &[&str] = &["badges", "stats", "sponsored", "featured"];

/// Prefix reserved for platform bookkeeping keys
pub const PLATFORM_PREFIX: &str = "_platform";

/// `(object, field)` pairs holding verification state
pub const VERIFICATION_FIELDS: &[(&str, &str)] = &[
    ("publisher", "verified"),
    ("publisher", "domain_verified"),
    ("contributor", "verified"),
];

/// A descriptor exactly as read from disk. Always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDescriptor(Value);

impl RawDescriptor {
    /// Returns `None` unless `value` is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        value.is_object().then_some(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn alias(&self) -> Option<&str> {
        self.0.get("alias").and_then(Value::as_str)
    }
}

/// A descriptor with every platform-managed field removed.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanDescriptor(Value);

impl CleanDescriptor {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn alias(&self) -> Option<&str> {
        self.0.get("alias").and_then(Value::as_str)
    }

    /// Decode into the typed model.
    pub fn typed(&self) -> Result<ServerDefinition, serde_json::Error> {
        ServerDefinition::deserialize(&self.0)
    }

    pub(crate) fn into_value(self) -> Value {
        self.0
    }
}

/// A descriptor as it appears in the bundle, platform fields populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublishedDescriptor(Value);

impl PublishedDescriptor {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn is_featured(&self) -> bool {
        self.0.get("featured").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn is_sponsored(&self) -> bool {
        self.0.get("sponsored").and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Strip platform-managed fields.
///
/// Returns the clean descriptor and the dotted names of the fields removed,
/// in removal order. Applying it to an already clean descriptor removes nothing.
pub fn sanitize(raw: RawDescriptor) -> (CleanDescriptor, Vec<String>) {
    let mut value = raw.0;
    let mut stripped = Vec::new();

    if let Value::Object(map) = &mut value {
        let doomed: Vec<String> = map
            .keys()
            .filter(|k| PLATFORM_FIELDS.contains(&k.as_str()) || k.starts_with(PLATFORM_PREFIX))
            .cloned()
            .collect();
        for key in doomed {
            map.shift_remove(&key);
            stripped.push(key);
        }

        for (object, field) in VERIFICATION_FIELDS {
            if let Some(Value::Object(inner)) = map.get_mut(*object) {
                if inner.shift_remove(*field).is_some() {
                    stripped.push(format!("{}.{}", object, field));
                }
            }
        }
    }

    (CleanDescriptor(value), stripped)
}
