//! PostgreSQL storage via SeaORM.

mod connections;
mod postgres_base;
mod postgres_repo;

pub mod entity;

pub use connections::{DatabaseConfig, DatabaseConnection};
pub use postgres_repo::PostgresPostRepository;
