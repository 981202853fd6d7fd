//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use blog_core::PostStore;
use blog_infra::InMemoryPostRepository;

use crate::config::{AppConfig, StoreKind};

/// Shared application state.
///
/// The store wraps the one connection pool opened at startup; every worker
/// gets a clone of the same handle.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostStore,
}

impl AppState {
    pub fn new(posts: PostStore) -> Self {
        Self { posts }
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(PostStore::new(Arc::new(InMemoryPostRepository::new())))
    }

    /// Build the state selected by configuration.
    ///
    /// A database that cannot be reached is a startup failure.
    pub async fn from_config(config: &AppConfig) -> io::Result<Self> {
        let state = match config.store {
            StoreKind::Memory => {
                tracing::warn!("POST_STORE=memory - posts are lost on restart");
                Self::in_memory()
            }
            StoreKind::Postgres => Self::postgres(config).await?,
        };

        tracing::info!(store = state.posts.backend(), "Application state initialized");
        Ok(state)
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &AppConfig) -> io::Result<Self> {
        use blog_infra::{DatabaseConfig, DatabaseConnection, PostgresPostRepository};
        use migration::{Migrator, MigratorTrait};

        let db_config = DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            min_connections: config.database.min_connections,
        };

        let conn = DatabaseConnection::init(&db_config).await.map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            io::Error::other(e.to_string())
        })?;

        if config.run_migrations {
            Migrator::up(&conn.main, None).await.map_err(|e| {
                tracing::error!("Failed to apply migrations: {}", e);
                io::Error::other(e.to_string())
            })?;
            tracing::info!("Migrations applied");
        }

        let repo = PostgresPostRepository::new(conn.main);
        Ok(Self::new(PostStore::new(Arc::new(repo))))
    }

    #[cfg(not(feature = "postgres"))]
    async fn postgres(_config: &AppConfig) -> io::Result<Self> {
        tracing::warn!("Built without postgres feature - using in-memory repository");
        Ok(Self::in_memory())
    }
}
