//! `${input:ID}` reference checking.
//!
//! The client substitutes placeholders at install time; the registry only
//! guarantees every referenced id is declared in `transport.metadata.inputs`.

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::TransportConfig;

lazy_static! {
    // Any token body counts as a reference, valid input id or not.
    static ref INPUT_REGEX: Regex = Regex::new(r"\$\{input:([^}]+)\}").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderIssue {
    /// A token names an id missing from `metadata.inputs`.
    UndeclaredInput {
        input_id: String,
        /// JSON pointers of every value that references it
        locations: Vec<String>,
    },
    /// The same id is declared more than once.
    DuplicateInput { input_id: String },
}

/// Extract every input id referenced in `text`, in order of appearance.
pub fn referenced_inputs(text: &str) -> impl Iterator<Item = &str> {
    INPUT_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
}

/// Check a transport's placeholder references against its declared inputs.
///
/// Scans stdio `args` and `env` values, and http `url` and `headers`.
/// Issues are sorted by input id.
pub fn check_placeholders(transport: &TransportConfig) -> Vec<PlaceholderIssue> {
    let mut references: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut record = |text: &str, location: String| {
        for id in referenced_inputs(text) {
            references
                .entry(id.to_string())
                .or_default()
                .push(location.clone());
        }
    };

    match transport {
        TransportConfig::Stdio { args, env, .. } => {
            for (i, arg) in args.iter().enumerate() {
                record(arg, format!("/transport/args/{}", i));
            }
            for (key, value) in env {
                record(value, format!("/transport/env/{}", escape_pointer(key)));
            }
        }
        TransportConfig::Http { url, headers, .. } => {
            record(url, "/transport/url".to_string());
            for (key, value) in headers {
                record(value, format!("/transport/headers/{}", escape_pointer(key)));
            }
        }
    }

    let mut declared = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for input in &transport.metadata().inputs {
        if !declared.insert(input.id.as_str()) {
            duplicates.insert(input.id.clone());
        }
    }

    let mut issues: Vec<PlaceholderIssue> = references
        .into_iter()
        .filter(|(id, _)| !declared.contains(id.as_str()))
        .map(|(input_id, locations)| PlaceholderIssue::UndeclaredInput {
            input_id,
            locations,
        })
        .collect();
    issues.extend(
        duplicates
            .into_iter()
            .map(|input_id| PlaceholderIssue::DuplicateInput { input_id }),
    );
    issues
}

/// RFC 6901 escaping for a single pointer segment
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
