use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{entities::bounding_box::BoundingBox, errors::AppError};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ImageRow {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub group_name: String,
    pub camera_id: Option<Uuid>,
    pub width: i32,
    pub height: i32,
    pub mime_type: String,
    pub captured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Domain Model ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: Uuid,
    pub collection_id: Uuid,
    /// Owning group, inherited from the collection; authorization is checked against it.
    pub group: String,
    pub camera_id: Option<Uuid>,
    /// Original resolution. Coordinate transforms read this, never the pixel data.
    pub width: i32,
    pub height: i32,
    pub mime_type: String,
    pub captured_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub raw_data: Option<Vec<u8>>,
    pub bounding_boxes: Vec<BoundingBox>,
}

impl Image {
    /// Recorded width as the base of coordinate transforms.
    pub fn original_width(&self) -> Result<f64, AppError> {
        if self.width <= 0 {
            return Err(AppError::Validation(format!("image {} has no recorded width", self.id)));
        }
        Ok(f64::from(self.width))
    }

    pub fn has_bounding_box(&self, id: &Uuid) -> bool {
        self.bounding_boxes.iter().any(|b| &b.id == id)
    }
}

impl From<ImageRow> for Image {
    fn from(row: ImageRow) -> Self {
        Image {
            id: row.id,
            collection_id: row.collection_id,
            group: row.group_name,
            camera_id: row.camera_id,
            width: row.width,
            height: row.height,
            mime_type: row.mime_type,
            captured_at: row.captured_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            raw_data: None,
            bounding_boxes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchImageOptions {
    pub include_raw_data: bool,
}

impl FetchImageOptions {
    pub const META_ONLY: FetchImageOptions = FetchImageOptions { include_raw_data: false };
    pub const WITH_RAW_DATA: FetchImageOptions = FetchImageOptions { include_raw_data: true };
}
