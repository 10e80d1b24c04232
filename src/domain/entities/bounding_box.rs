use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{BOUNDING_BOX_SHAPE, DISPLAY_DATE_FORMAT},
    entities::{annotation::Annotation, label::Label},
    errors::AppError,
};

// ───── Geometry ──────────────────────────────────────────────────────

/// Center + size geometry. This is the one persisted representation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct BoxCoords {
    #[validate(range(min = 0.0, message = "must be >= 0"))]
    pub xc: f64,
    #[validate(range(min = 0.0, message = "must be >= 0"))]
    pub yc: f64,
    pub width: f64,
    pub height: f64,
    /// Reserved, always 0.
    #[serde(default)]
    pub angle: f64,
}

impl BoxCoords {
    pub fn new(xc: f64, yc: f64, width: f64, height: f64) -> Self {
        BoxCoords { xc, yc, width, height, angle: 0.0 }
    }
}

// ───── Database Models ───────────────────────────────────────────────

/// Annotation row joined with its (optional) label.
#[derive(Debug, sqlx::FromRow)]
pub struct BoundingBoxRow {
    pub id: Uuid,
    pub image_id: Uuid,
    pub collection_id: Uuid,
    pub author_email: String,
    pub shape_data: Json<BoxCoords>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub label_id: Option<Uuid>,
    pub label_name: Option<String>,
    pub label_description: Option<String>,
    pub label_parent_id: Option<Uuid>,
}

impl From<BoundingBoxRow> for BoundingBox {
    fn from(row: BoundingBoxRow) -> Self {
        let label = match (row.label_id, row.label_name) {
            (Some(id), Some(name)) => Some(Label {
                id,
                name,
                description: row.label_description.unwrap_or_default(),
                parent_id: row.label_parent_id,
            }),
            _ => None,
        };

        BoundingBox {
            id: row.id,
            image_id: row.image_id,
            collection_id: row.collection_id,
            label,
            coords: row.shape_data.0,
            author_email: row.author_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ───── Domain Model ──────────────────────────────────────────────────

/// A rectangle annotation on one image, in storage (original resolution) space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub id: Uuid,
    pub image_id: Uuid,
    pub collection_id: Uuid,
    pub label: Option<Label>,
    pub coords: BoxCoords,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoundingBox {
    /// Builds an unattached box with a fresh identity, rejecting negative centers.
    pub fn new(coords: BoxCoords) -> Result<Self, AppError> {
        coords
            .validate()
            .map_err(|e| AppError::from(e).context("all coordinates are required, and must be >= 0"))?;

        Ok(BoundingBox {
            id: Uuid::new_v4(),
            image_id: Uuid::nil(),
            collection_id: Uuid::nil(),
            label: None,
            coords,
            author_email: String::new(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        })
    }

    /// Converts a min/max-corner rectangle into the center + size convention.
    pub fn from_min_max(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self, AppError> {
        let width = xmax - xmin;
        let height = ymax - ymin;
        Self::new(BoxCoords::new(xmin + width / 2.0, ymin + height / 2.0, width, height))
    }

    pub fn annotate(&mut self, label: Label) {
        self.label = Some(label);
    }

    pub fn label_name(&self) -> Option<&str> {
        self.label.as_ref().map(|l| l.name.as_str())
    }

    pub fn to_annotation(&self) -> Annotation {
        Annotation {
            id: self.id,
            image_id: self.image_id,
            label_id: self.label.as_ref().map(|l| l.id),
            collection_id: self.collection_id,
            author_email: self.author_email.clone(),
            shape_type: BOUNDING_BOX_SHAPE.to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ───── Client Payload ────────────────────────────────────────────────

/// Box exchanged with the annotation screen, in display (resized) space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub xc: f64,
    pub yc: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BoundingBoxPayload {
    pub fn new(coords: BoxCoords, label: Option<&str>) -> Self {
        let mut payload = BoundingBoxPayload {
            label: label.map(str::to_string),
            ..Default::default()
        };
        payload.set_coords(coords);
        payload
    }

    pub fn coords(&self) -> BoxCoords {
        BoxCoords {
            xc: self.xc,
            yc: self.yc,
            width: self.width,
            height: self.height,
            angle: self.angle,
        }
    }

    pub fn set_coords(&mut self, coords: BoxCoords) {
        self.xc = coords.xc;
        self.yc = coords.yc;
        self.width = coords.width;
        self.height = coords.height;
        self.angle = coords.angle;
    }

    /// Label name, treating a blank name as absent.
    pub fn label_name(&self) -> Option<&str> {
        self.label.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Existing identity carried by the client, if any.
    pub fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

impl From<&BoundingBox> for BoundingBoxPayload {
    fn from(bbox: &BoundingBox) -> Self {
        let mut payload = BoundingBoxPayload {
            id: Some(bbox.id.to_string()),
            label: bbox.label_name().map(str::to_string),
            author: Some(bbox.author_email.clone()),
            date: Some(bbox.updated_at.format(DISPLAY_DATE_FORMAT).to_string()),
            ..Default::default()
        };
        payload.set_coords(bbox.coords);
        payload
    }
}
