use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        filters::{FilterArgs, OrderingArgs, PageRequest},
        image::{FetchImageOptions, Image, ImageRow},
    },
    errors::AppError,
    repositories::{annotation::AnnotationRepository, sqlx_repo::SqlxTx},
};

#[async_trait]
pub trait ImageRepository: Send {
    /// Image by id within a collection, with its bounding boxes loaded.
    async fn get_image(
        &mut self,
        id: &Uuid,
        collection_id: &Uuid,
        options: FetchImageOptions,
    ) -> Result<Option<Image>, AppError>;

    /// Closest image in `filter` whose `(field, id)` lies strictly after `current`,
    /// or strictly before it when `before` is set. Metadata only.
    async fn get_adjacent_image(
        &mut self,
        current: &Image,
        filter: &FilterArgs,
        ordering: &OrderingArgs,
        before: bool,
    ) -> Result<Option<Image>, AppError>;

    /// One page of `filter`, ordered by field then id. Metadata only.
    async fn list_images(
        &mut self,
        filter: &FilterArgs,
        ordering: &OrderingArgs,
        page: PageRequest,
    ) -> Result<Vec<Image>, AppError>;
}

/// Starts an image query yielding one row per image.
///
/// An image may belong to several collections; the lateral join picks the first
/// association that satisfies the collection filters, so the image never repeats.
fn image_select(filter: &FilterArgs) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
    SELECT i.id, ic.collection_id, ic.group_name, i.camera_id, i.width, i.height,
           i.mime_type, i.captured_at, i.created_at, i.updated_at
    FROM images i
    JOIN LATERAL (
        SELECT a.collection_id, c.group_name
        FROM image_collection_assoc a
        JOIN collections c ON c.id = a.collection_id
        WHERE a.image_id = i.id"#,
    );
    if let Some(collection_id) = filter.collection_id {
        qb.push(" AND a.collection_id = ").push_bind(collection_id);
    }
    if let Some(name) = &filter.collection_name {
        qb.push(" AND c.name = ").push_bind(name.clone());
    }
    qb.push(" ORDER BY a.collection_id LIMIT 1) ic ON TRUE WHERE TRUE");

    if let Some(camera_id) = filter.camera_id {
        qb.push(" AND i.camera_id = ").push_bind(camera_id);
    }
    if let Some(label_id) = filter.label_id {
        qb.push(" AND EXISTS (SELECT 1 FROM annotations an WHERE an.image_id = i.id AND an.label_id = ")
            .push_bind(label_id)
            .push(")");
    }
    qb
}

#[async_trait]
impl ImageRepository for SqlxTx {
    async fn get_image(
        &mut self,
        id: &Uuid,
        collection_id: &Uuid,
        options: FetchImageOptions,
    ) -> Result<Option<Image>, AppError> {
        let mut qb = image_select(&FilterArgs::default().in_collection(*collection_id));
        qb.push(" AND i.id = ").push_bind(*id);
        let row = qb
            .build_query_as::<ImageRow>()
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(AppError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut image = Image::from(row);

        if options.include_raw_data {
            image.raw_data = sqlx::query_scalar::<_, Option<Vec<u8>>>("SELECT data FROM images WHERE id = $1")
                .bind(id)
                .fetch_one(&mut *self.tx)
                .await
                .map_err(AppError::from)?;
        }

        image.bounding_boxes = self.get_bounding_boxes_of_image(id).await?;

        Ok(Some(image))
    }

    async fn get_adjacent_image(
        &mut self,
        current: &Image,
        filter: &FilterArgs,
        ordering: &OrderingArgs,
        before: bool,
    ) -> Result<Option<Image>, AppError> {
        let (field_value, id) = ordering.sort_key(current);
        let column = ordering.field.column();
        let (cmp, direction) = if before { ("<", "DESC") } else { (">", "ASC") };

        let mut qb = image_select(filter);
        qb.push(format!(" AND ({column}, i.id) {cmp} ("))
            .push_bind(field_value)
            .push(", ")
            .push_bind(id)
            .push(format!(") ORDER BY {column} {direction}, i.id {direction} LIMIT 1"));

        let row = qb
            .build_query_as::<ImageRow>()
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(AppError::from)?;

        Ok(row.map(Image::from))
    }

    async fn list_images(
        &mut self,
        filter: &FilterArgs,
        ordering: &OrderingArgs,
        page: PageRequest,
    ) -> Result<Vec<Image>, AppError> {
        let direction = if ordering.descending { "DESC" } else { "ASC" };

        let mut qb = image_select(filter);
        qb.push(format!(" ORDER BY {} {direction}, i.id ASC", ordering.field.column()))
            .push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = qb
            .build_query_as::<ImageRow>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(Image::from).collect())
    }
}
