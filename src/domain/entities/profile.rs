use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named set of labels that restricts what may be applied inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationProfile {
    pub id: Uuid,
    pub name: String,
    pub label_ids: Vec<Uuid>,
}

impl AnnotationProfile {
    pub fn new(name: impl Into<String>, label_ids: Vec<Uuid>) -> Self {
        AnnotationProfile {
            id: Uuid::new_v4(),
            name: name.into(),
            label_ids,
        }
    }
}
