//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL storage via SeaORM
//!
//! The in-memory repository is always available.

#[cfg(feature = "postgres")]
pub mod database;
pub mod memory;

// Re-exports - In-Memory
pub use memory::InMemoryPostRepository;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnection, PostgresPostRepository};
