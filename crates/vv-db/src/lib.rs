//! vv-db: record store for uploaded videos.
//!
//! This crate provides SQLite-backed storage with connection pooling,
//! embedded migrations, the [`models::Video`] record, query functions, and
//! the [`store::VideoStore`] capability handed to the HTTP layer.

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
