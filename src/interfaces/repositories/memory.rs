//! In-process implementation of every repository trait.
//!
//! A transaction holds the store's lock for its whole lifetime and works on a private
//! copy of the state; `commit` swaps the copy in, dropping it throws the copy away.
//! Transactions are therefore fully serialized.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    entities::{
        annotation::Annotation,
        bounding_box::BoundingBox,
        collection::Collection,
        filters::{FilterArgs, OrderingArgs, PageRequest},
        image::{FetchImageOptions, Image},
        label::Label,
        profile::AnnotationProfile,
    },
    errors::AppError,
    repositories::{
        annotation::AnnotationRepository,
        collection::CollectionRepository,
        image::ImageRepository,
        label::LabelRepository,
        profile::ProfileRepository,
        store::{Store, StoreTx},
    },
};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub labels: HashMap<Uuid, Label>,
    pub profiles: HashMap<Uuid, AnnotationProfile>,
    pub collections: HashMap<Uuid, Collection>,
    /// Images without their boxes; those live in `bounding_boxes`.
    pub images: HashMap<Uuid, Image>,
    pub bounding_boxes: HashMap<Uuid, BoundingBox>,
}

impl MemoryState {
    /// Boxes of one image, oldest first.
    pub fn boxes_of(&self, image_id: &Uuid) -> Vec<BoundingBox> {
        let mut boxes: Vec<BoundingBox> = self
            .bounding_boxes
            .values()
            .filter(|b| &b.image_id == image_id)
            .cloned()
            .collect();
        boxes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        boxes
    }

    fn matches(&self, image: &Image, filter: &FilterArgs) -> bool {
        if filter.collection_id.is_some_and(|id| id != image.collection_id) {
            return false;
        }
        if let Some(name) = &filter.collection_name {
            let named = self
                .collections
                .get(&image.collection_id)
                .is_some_and(|c| &c.name == name);
            if !named {
                return false;
            }
        }
        if filter.camera_id.is_some() && filter.camera_id != image.camera_id {
            return false;
        }
        if let Some(label_id) = filter.label_id {
            let labelled = self
                .bounding_boxes
                .values()
                .any(|b| b.image_id == image.id && b.label.as_ref().is_some_and(|l| l.id == label_id));
            if !labelled {
                return false;
            }
        }
        true
    }

    fn filtered<'a>(&'a self, filter: &'a FilterArgs) -> impl Iterator<Item = &'a Image> + 'a {
        self.images.values().filter(move |image| self.matches(image, filter))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_label(&self, label: Label) {
        self.state.lock().await.labels.insert(label.id, label);
    }

    pub async fn add_profile(&self, profile: AnnotationProfile) {
        self.state.lock().await.profiles.insert(profile.id, profile);
    }

    pub async fn add_collection(&self, collection: Collection) {
        self.state.lock().await.collections.insert(collection.id, collection);
    }

    /// Stores the image metadata and any boxes it carries.
    pub async fn add_image(&self, mut image: Image) {
        let mut state = self.state.lock().await;
        for bbox in image.bounding_boxes.drain(..) {
            state.bounding_boxes.insert(bbox.id, bbox);
        }
        state.images.insert(image.id, image);
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(MemoryTx { guard, working })
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(self) -> Result<(), AppError> {
        let MemoryTx { mut guard, working } = self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl ImageRepository for MemoryTx {
    async fn get_image(
        &mut self,
        id: &Uuid,
        collection_id: &Uuid,
        options: FetchImageOptions,
    ) -> Result<Option<Image>, AppError> {
        let Some(stored) = self.working.images.get(id).filter(|i| &i.collection_id == collection_id) else {
            return Ok(None);
        };

        let mut image = stored.clone();
        if !options.include_raw_data {
            image.raw_data = None;
        }
        image.bounding_boxes = self.working.boxes_of(id);
        Ok(Some(image))
    }

    async fn get_adjacent_image(
        &mut self,
        current: &Image,
        filter: &FilterArgs,
        ordering: &OrderingArgs,
        before: bool,
    ) -> Result<Option<Image>, AppError> {
        let key = ordering.sort_key(current);
        let candidates = self.working.filtered(filter);

        let found = if before {
            candidates
                .filter(|image| ordering.sort_key(image) < key)
                .max_by_key(|image| ordering.sort_key(image))
        } else {
            candidates
                .filter(|image| ordering.sort_key(image) > key)
                .min_by_key(|image| ordering.sort_key(image))
        };

        Ok(found.map(|image| Image {
            raw_data: None,
            ..image.clone()
        }))
    }

    async fn list_images(
        &mut self,
        filter: &FilterArgs,
        ordering: &OrderingArgs,
        page: PageRequest,
    ) -> Result<Vec<Image>, AppError> {
        let mut images: Vec<&Image> = self.working.filtered(filter).collect();
        images.sort_by(|a, b| ordering.compare(a, b));

        Ok(images
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|image| Image {
                raw_data: None,
                ..image.clone()
            })
            .collect())
    }
}

#[async_trait]
impl AnnotationRepository for MemoryTx {
    async fn insert_bounding_box(&mut self, bbox: &BoundingBox, image: &Image) -> Result<(), AppError> {
        if self.working.bounding_boxes.contains_key(&bbox.id) {
            return Err(AppError::Conflict(format!("bounding box {} already exists", bbox.id)));
        }
        let mut stored = bbox.clone();
        stored.image_id = image.id;
        self.working.bounding_boxes.insert(stored.id, stored);
        Ok(())
    }

    async fn update_bounding_box(&mut self, bbox: &BoundingBox, image: &Image) -> Result<(), AppError> {
        match self.working.bounding_boxes.get_mut(&bbox.id) {
            Some(stored) if stored.image_id == image.id => {
                stored.label = bbox.label.clone();
                stored.coords = bbox.coords;
                stored.author_email = bbox.author_email.clone();
                stored.updated_at = bbox.updated_at;
                Ok(())
            }
            _ => Err(AppError::NotFound(format!("bounding box {}", bbox.id))),
        }
    }

    async fn get_bounding_boxes_of_image(&mut self, image_id: &Uuid) -> Result<Vec<BoundingBox>, AppError> {
        Ok(self.working.boxes_of(image_id))
    }

    async fn find_annotation(&mut self, id: &Uuid) -> Result<Option<Annotation>, AppError> {
        Ok(self.working.bounding_boxes.get(id).map(BoundingBox::to_annotation))
    }

    async fn delete_annotation(&mut self, id: &Uuid) -> Result<(), AppError> {
        self.working
            .bounding_boxes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("annotation {}", id)))
    }
}

#[async_trait]
impl LabelRepository for MemoryTx {
    async fn find_label_by_name(&mut self, name: &str) -> Result<Option<Label>, AppError> {
        Ok(self.working.labels.values().find(|l| l.name == name).cloned())
    }

    async fn find_label_by_id(&mut self, id: &Uuid) -> Result<Option<Label>, AppError> {
        Ok(self.working.labels.get(id).cloned())
    }

    async fn all_labels(&mut self) -> Result<Vec<Label>, AppError> {
        let mut labels: Vec<Label> = self.working.labels.values().cloned().collect();
        labels.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(labels)
    }
}

#[async_trait]
impl CollectionRepository for MemoryTx {
    async fn find_collection(&mut self, id: &Uuid) -> Result<Option<Collection>, AppError> {
        Ok(self.working.collections.get(id).cloned())
    }

    async fn touch_collection(&mut self, id: &Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        let collection = self
            .working
            .collections
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("collection {}", id)))?;
        collection.updated_at = now.max(collection.updated_at + TimeDelta::microseconds(1));
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryTx {
    async fn find_profile(&mut self, id: &Uuid) -> Result<Option<AnnotationProfile>, AppError> {
        Ok(self.working.profiles.get(id).cloned())
    }
}
