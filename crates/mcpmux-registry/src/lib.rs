//! # McpMux Registry
//!
//! Validation, conflict checking and bundling for the McpMux server registry.
//!
//! ## Modules
//!
//! - `domain` - Server definition model (transport, inputs, auth, categories)
//! - `registry` - Loader, sanitation, schema validation, conflict checks, bundle builder
//! - `layout` - Conventional paths of a registry checkout
//! - `error` - Fatal error taxonomy

pub mod domain;
pub mod error;
pub mod layout;
pub mod registry;

// Re-export commonly used types
pub use domain::*;
pub use error::{RegistryError, Result};
pub use layout::{RegistryLayout, REGISTRY_SCHEMA_VERSION};
pub use registry::*;
