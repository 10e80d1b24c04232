use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "group_name")]
    pub group: String,
    /// Assigned annotation profile; `None` means every label is allowed.
    pub profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Refreshed whenever an annotation under this collection is created or modified.
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(name: impl Into<String>, group: impl Into<String>, now: DateTime<Utc>) -> Self {
        Collection {
            id: Uuid::new_v4(),
            name: name.into(),
            group: group.into(),
            profile_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_profile(mut self, profile_id: Uuid) -> Self {
        self.profile_id = Some(profile_id);
        self
    }
}
