//! vv-core: shared types, IDs, errors, configuration, and byte-range math.
//!
//! This crate is the foundational dependency for the other vv-* crates,
//! providing type-safe identifiers, a unified error type, application
//! configuration, `Range` header resolution, and storage-name generation.

pub mod config;
pub mod error;
pub mod ids;
pub mod range;
pub mod storage;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::VideoId;
