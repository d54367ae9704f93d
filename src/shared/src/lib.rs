//! Shared types and utilities for the destination mapping layer
//!
//! Holds the inbound analytics event model (identify and track views over a
//! raw JSON payload) and the dot-path resolver both destination mappers read
//! through.

pub mod error;
pub mod path;
pub mod types;

pub use error::{SharedError, SharedResult};
pub use path::{normalize_key, KeyAliases, PathResolver, Resolved};
pub use types::*;
