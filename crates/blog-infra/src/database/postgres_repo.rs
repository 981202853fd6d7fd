//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use blog_core::domain::{Post, PostChanges};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Seq)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = %id, "Updating post");

        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        let mut active: post::ActiveModel = model.into();
        active.title = Set(changes.title);
        active.content = Set(changes.content);
        if let Some(author) = changes.author {
            active.author = Set(author);
        }

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            // Deleted between the read and the write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(repo_err(e)),
        }
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
