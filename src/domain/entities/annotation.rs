use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Shape-agnostic annotation record, as looked up before deletion.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Annotation {
    pub id: Uuid,
    pub image_id: Uuid,
    pub label_id: Option<Uuid>,
    pub collection_id: Uuid,
    pub author_email: String,
    pub shape_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
