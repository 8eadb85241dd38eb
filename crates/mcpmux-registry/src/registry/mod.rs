//! Registry operations over the on-disk descriptor set.
//!
//! The pipeline is `load -> sanitize -> validate | check conflicts -> build`.

pub mod bundle;
pub mod conflicts;
pub mod curation;
pub mod inventory;
pub mod loader;
pub mod placeholders;
pub mod sanitize;
pub mod schema;
pub mod validation;

pub use bundle::{
    default_ui_config, enrich, write_bundle, BundleBuilder, FilterDefinition, FilterMatch,
    FilterOption, HomeConfig, RegistryBundle, SortOption, SortRule, UiConfig, DEFAULT_SORT,
    ITEMS_PER_PAGE,
};
pub use conflicts::{
    check_conflicts, check_consistency, is_valid_id, AliasShadow, ConflictReport,
    ConsistencyIssue, FileIssue,
};
pub use curation::{load_curation, Curation, HomeSection};
pub use inventory::{Inventory, InventoryEntry};
pub use loader::{
    descriptor_paths, load_categories, load_descriptor, scan_registry, LoadFailure,
    LoadFailureKind, LoadedDescriptor, RegistryScan,
};
pub use placeholders::{check_placeholders, referenced_inputs, PlaceholderIssue};
pub use sanitize::{sanitize, CleanDescriptor, PublishedDescriptor, RawDescriptor};
pub use schema::{SchemaValidator, Violation};
pub use validation::{
    validate_descriptor, validate_file, validate_files, validate_scan, FileReport,
    ValidationReport,
};
