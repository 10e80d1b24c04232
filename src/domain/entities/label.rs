use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, optionally parented annotation tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            parent_id: None,
        }
    }
}
