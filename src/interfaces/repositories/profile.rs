use async_trait::async_trait;
use uuid::Uuid;

use crate::{entities::profile::AnnotationProfile, errors::AppError, repositories::sqlx_repo::SqlxTx};

#[async_trait]
pub trait ProfileRepository: Send {
    async fn find_profile(&mut self, id: &Uuid) -> Result<Option<AnnotationProfile>, AppError>;
}

#[async_trait]
impl ProfileRepository for SqlxTx {
    async fn find_profile(&mut self, id: &Uuid) -> Result<Option<AnnotationProfile>, AppError> {
        let profile = sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM annotation_profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(AppError::from)?;

        let Some((id, name)) = profile else {
            return Ok(None);
        };

        let label_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT label_id FROM annotation_profile_labels WHERE profile_id = $1 ORDER BY label_id",
        )
        .bind(id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        Ok(Some(AnnotationProfile { id, name, label_ids }))
    }
}
