//! Registry domain types
//!
//! - `ServerDefinition` and its transport/auth/input value objects
//! - `Category` and the loaded `CategorySet`

mod category;
mod server;

pub use category::*;
pub use server::*;
