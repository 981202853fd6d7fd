//! The post store - validation and the five persistence operations.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostDraft};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, PostRepository};

const ENTITY: &str = "Post";

/// Post store over any [`PostRepository`].
///
/// Every write is validated here before it reaches the repository. The store
/// holds no state of its own, so it is cheap to clone and share.
#[derive(Clone)]
pub struct PostStore {
    repo: Arc<dyn PostRepository>,
}

impl PostStore {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Name of the backing repository.
    pub fn backend(&self) -> &'static str {
        self.repo.backend()
    }

    /// Validate and persist a new post.
    pub async fn insert(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let changes = draft.validate()?;
        let post = self.repo.insert(Post::create(changes)).await?;
        tracing::debug!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// All posts, newest first.
    pub async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.find_all_newest_first().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Post, DomainError> {
        let uuid = parse_id(id)?;
        self.repo
            .find_by_id(uuid)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Replace title, content and (if supplied) author of an existing post.
    pub async fn update_by_id(&self, id: &str, draft: PostDraft) -> Result<Post, DomainError> {
        let changes = draft.validate()?;
        let uuid = parse_id(id)?;
        let post = self
            .repo
            .update(uuid, changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id(id)?;
        match self.repo.delete(uuid).await {
            Ok(()) => {
                tracing::debug!(post_id = %uuid, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }
}

/// A malformed id can never resolve, so it is reported as not found.
fn parse_id(id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id).map_err(|_| not_found(id))
}

fn not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity_type: ENTITY,
        id: id.to_string(),
    }
}
