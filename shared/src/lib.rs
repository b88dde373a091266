//! AfroFood Shared Library
//!
//! This crate contains the models, request/response types and validation
//! helpers shared by the backend and any client of its HTTP API.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;
