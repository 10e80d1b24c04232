use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::image::Image;

/// Which images are in play. Shared by listing and adjacent navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterArgs {
    #[serde(default)]
    pub collection_id: Option<Uuid>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub camera_id: Option<Uuid>,
    #[serde(default)]
    pub label_id: Option<Uuid>,
}

impl FilterArgs {
    pub fn in_collection(mut self, id: Uuid) -> Self {
        self.collection_id = Some(id);
        self
    }

    pub fn named_collection(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.collection_name = Some(name);
        }
        self
    }

    pub fn with_camera(mut self, id: Uuid) -> Self {
        self.camera_id = Some(id);
        self
    }

    pub fn with_label(mut self, id: Uuid) -> Self {
        self.label_id = Some(id);
        self
    }
}

#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingField {
    #[default]
    #[display("captured_at")]
    CapturedAt,
    #[display("created_at")]
    CreatedAt,
}

impl OrderingField {
    pub fn column(&self) -> &'static str {
        match self {
            OrderingField::CapturedAt => "i.captured_at",
            OrderingField::CreatedAt => "i.created_at",
        }
    }

    pub fn value_of(&self, image: &Image) -> DateTime<Utc> {
        match self {
            OrderingField::CapturedAt => image.captured_at,
            OrderingField::CreatedAt => image.created_at,
        }
    }
}

/// Temporal ordering of images. The image id is always the final, ascending tie-breaker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingArgs {
    #[serde(default)]
    pub field: OrderingField,
    #[serde(default)]
    pub descending: bool,
}

impl OrderingArgs {
    pub fn ascending(field: OrderingField) -> Self {
        OrderingArgs { field, descending: false }
    }

    pub fn descending(field: OrderingField) -> Self {
        OrderingArgs { field, descending: true }
    }

    /// Position of an image in the total order used for adjacency.
    pub fn sort_key(&self, image: &Image) -> (DateTime<Utc>, Uuid) {
        (self.field.value_of(image), image.id)
    }

    /// Listing comparator: field in the requested direction, then id ascending.
    pub fn compare(&self, a: &Image, b: &Image) -> Ordering {
        let by_field = self.field.value_of(a).cmp(&self.field.value_of(b));
        let by_field = if self.descending { by_field.reverse() } else { by_field };
        by_field.then_with(|| a.id.cmp(&b.id))
    }
}

/// 1-based pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest { page: 1, per_page: 10 }
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        let page = self.page.saturating_sub(1);
        (page as i64) * (self.per_page as i64)
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}
