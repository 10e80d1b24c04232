use async_trait::async_trait;
use uuid::Uuid;

use crate::{entities::label::Label, errors::AppError, repositories::sqlx_repo::SqlxTx};

#[async_trait]
pub trait LabelRepository: Send {
    async fn find_label_by_name(&mut self, name: &str) -> Result<Option<Label>, AppError>;
    async fn find_label_by_id(&mut self, id: &Uuid) -> Result<Option<Label>, AppError>;
    async fn all_labels(&mut self) -> Result<Vec<Label>, AppError>;
}

#[async_trait]
impl LabelRepository for SqlxTx {
    async fn find_label_by_name(&mut self, name: &str) -> Result<Option<Label>, AppError> {
        sqlx::query_as::<_, Label>("SELECT id, name, description, parent_id FROM labels WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(AppError::from)
    }

    async fn find_label_by_id(&mut self, id: &Uuid) -> Result<Option<Label>, AppError> {
        sqlx::query_as::<_, Label>("SELECT id, name, description, parent_id FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(AppError::from)
    }

    async fn all_labels(&mut self) -> Result<Vec<Label>, AppError> {
        sqlx::query_as::<_, Label>("SELECT id, name, description, parent_id FROM labels ORDER BY name, id")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(AppError::from)
    }
}
