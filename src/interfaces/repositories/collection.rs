use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{entities::collection::Collection, errors::AppError, repositories::sqlx_repo::SqlxTx};

#[async_trait]
pub trait CollectionRepository: Send {
    async fn find_collection(&mut self, id: &Uuid) -> Result<Option<Collection>, AppError>;
    /// Marks the collection as modified at `now`, or one microsecond after its current
    /// stamp when `now` is not later.
    async fn touch_collection(&mut self, id: &Uuid, now: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
impl CollectionRepository for SqlxTx {
    async fn find_collection(&mut self, id: &Uuid) -> Result<Option<Collection>, AppError> {
        sqlx::query_as::<_, Collection>(
            "SELECT id, name, group_name, profile_id, created_at, updated_at FROM collections WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(AppError::from)
    }

    async fn touch_collection(&mut self, id: &Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE collections SET updated_at = GREATEST(updated_at + interval '1 microsecond', $2) WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("collection {}", id)));
        }

        Ok(())
    }
}
