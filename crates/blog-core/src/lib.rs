//! # Blog Core
//!
//! The domain layer of the blog API.
//! This crate owns the post schema, its validation rules and the store
//! operations, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod store;

pub use error::{DomainError, RepoError};
pub use store::PostStore;
