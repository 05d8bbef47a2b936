//! Convention repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::Convention;
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};

/// Convention repository interface
#[async_trait]
pub trait ConventionRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Convention>>;

    /// Insert a new convention
    ///
    /// # Errors
    /// Returns error if validation fails or the ID already exists
    async fn insert(&self, convention: &Convention) -> Result<()>;

    /// Rename a convention
    ///
    /// Affects how future syncs strip the name from remote titles; stored
    /// archive names are not rewritten.
    async fn rename(&self, id: &str, name: &str) -> Result<()>;
}

/// SQLite implementation of ConventionRepository
pub struct SqliteConventionRepository {
    pool: SqlitePool,
}

impl SqliteConventionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConventionRepository for SqliteConventionRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Convention>> {
        let convention =
            query_as::<_, Convention>("SELECT id, name, created_at FROM conventions WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(convention)
    }

    async fn insert(&self, convention: &Convention) -> Result<()> {
        convention
            .validate()
            .map_err(|e| LibraryError::InvalidInput {
                field: "Convention".to_string(),
                message: e,
            })?;

        query("INSERT INTO conventions (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&convention.id)
            .bind(&convention.name)
            .bind(convention.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn rename(&self, id: &str, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(LibraryError::InvalidInput {
                field: "Convention".to_string(),
                message: "Convention name cannot be empty".to_string(),
            });
        }

        let result = query("UPDATE conventions SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound {
                entity_type: "Convention".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }
}
