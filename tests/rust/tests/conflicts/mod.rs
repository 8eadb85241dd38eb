//! Conflict checker tests
//!
//! Duplicate ids and aliases across files, alias/id shadowing, and the
//! per-file consistency rules checked in the same pass.

mod consistency;
