use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    constants::BOUNDING_BOX_SHAPE,
    entities::{
        annotation::Annotation,
        bounding_box::{BoundingBox, BoundingBoxRow},
        image::Image,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxTx,
};

#[async_trait]
pub trait AnnotationRepository: Send {
    async fn insert_bounding_box(&mut self, bbox: &BoundingBox, image: &Image) -> Result<(), AppError>;
    async fn update_bounding_box(&mut self, bbox: &BoundingBox, image: &Image) -> Result<(), AppError>;
    /// Boxes of one image, oldest first.
    async fn get_bounding_boxes_of_image(&mut self, image_id: &Uuid) -> Result<Vec<BoundingBox>, AppError>;
    async fn find_annotation(&mut self, id: &Uuid) -> Result<Option<Annotation>, AppError>;
    async fn delete_annotation(&mut self, id: &Uuid) -> Result<(), AppError>;
}

#[async_trait]
impl AnnotationRepository for SqlxTx {
    async fn insert_bounding_box(&mut self, bbox: &BoundingBox, image: &Image) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO annotations (
                id,
                image_id,
                collection_id,
                label_id,
                author_email,
                shape_type,
                shape_data,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(bbox.id)
        .bind(image.id)
        .bind(bbox.collection_id)
        .bind(bbox.label.as_ref().map(|l| l.id))
        .bind(&bbox.author_email)
        .bind(BOUNDING_BOX_SHAPE)
        .bind(Json(bbox.coords))
        .bind(bbox.created_at)
        .bind(bbox.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("bounding box {} already exists", bbox.id))
            }
            _ => AppError::from(e),
        })?;

        Ok(())
    }

    async fn update_bounding_box(&mut self, bbox: &BoundingBox, image: &Image) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"UPDATE annotations
            SET label_id = $3, author_email = $4, shape_data = $5, updated_at = $6
            WHERE id = $1 AND image_id = $2 AND shape_type = $7
            "#,
        )
        .bind(bbox.id)
        .bind(image.id)
        .bind(bbox.label.as_ref().map(|l| l.id))
        .bind(&bbox.author_email)
        .bind(Json(bbox.coords))
        .bind(bbox.updated_at)
        .bind(BOUNDING_BOX_SHAPE)
        .execute(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("bounding box {}", bbox.id)));
        }

        Ok(())
    }

    async fn get_bounding_boxes_of_image(&mut self, image_id: &Uuid) -> Result<Vec<BoundingBox>, AppError> {
        let rows = sqlx::query_as::<_, BoundingBoxRow>(
            r#"SELECT a.id, a.image_id, a.collection_id, a.author_email, a.shape_data,
                   a.created_at, a.updated_at,
                   l.id AS label_id, l.name AS label_name,
                   l.description AS label_description, l.parent_id AS label_parent_id
            FROM annotations a
            LEFT JOIN labels l ON l.id = a.label_id
            WHERE a.image_id = $1 AND a.shape_type = $2
            ORDER BY a.created_at, a.id
            "#,
        )
        .bind(image_id)
        .bind(BOUNDING_BOX_SHAPE)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(BoundingBox::from).collect())
    }

    async fn find_annotation(&mut self, id: &Uuid) -> Result<Option<Annotation>, AppError> {
        sqlx::query_as::<_, Annotation>(
            r#"SELECT id, image_id, label_id, collection_id, author_email, shape_type, created_at, updated_at
            FROM annotations WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(AppError::from)
    }

    async fn delete_annotation(&mut self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("annotation {}", id)));
        }

        Ok(())
    }
}
