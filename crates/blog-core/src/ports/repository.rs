use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostChanges};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with `RepoError::NotFound` if absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest `created_at` first; ties keep insertion order.
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError>;

    /// Overwrite the mutable fields of a post and return it as stored,
    /// or `None` if no post has this id.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError>;

    /// Short backend name, reported by the health endpoint.
    fn backend(&self) -> &'static str;
}
