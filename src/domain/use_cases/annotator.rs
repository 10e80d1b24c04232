use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    colorizer::Colorizer,
    entities::{
        bounding_box::{BoundingBox, BoundingBoxPayload},
        filters::{FilterArgs, OrderingArgs, PageRequest},
        identity::{AuthContext, RequestContext},
        image::{FetchImageOptions, Image},
    },
    errors::AppError,
    repositories::{
        annotation::AnnotationRepository,
        authorizer::Authorizer,
        collection::CollectionRepository,
        image::ImageRepository,
        label::LabelRepository,
        store::{Store, StoreTx},
    },
    rescaler::Rescaler,
    use_cases::{
        label_policy::{available_label_names, is_label_allowed},
        scroller::Scroller,
    },
    utils::{
        clock::{Clock, SystemClock},
        valid_uuid::valid_uuid,
    },
};

/// Everything the annotation screen needs to render one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorRequest {
    pub image_id: Uuid,
    pub collection_id: Uuid,
    #[serde(default)]
    pub filter: FilterArgs,
    #[serde(default)]
    pub ordering: OrderingArgs,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotatorState {
    /// Image metadata; its boxes are in `bounding_boxes`, in display space.
    pub image: Image,
    pub display_width: u32,
    pub bounding_boxes: Vec<BoundingBoxPayload>,
    pub available_labels: Vec<String>,
    pub can_annotate: bool,
    pub next_image: Option<Uuid>,
    pub prev_image: Option<Uuid>,
}

pub struct AnnotatorHandler<S, A>
where
    S: Store,
    A: Authorizer,
{
    pub store: S,
    pub authorizer: A,
    pub rescaler: Rescaler,
    pub colorizer: Colorizer,
    clock: Arc<dyn Clock>,
}

impl<S, A> AnnotatorHandler<S, A>
where
    S: Store,
    A: Authorizer,
{
    pub fn new(store: S, authorizer: A, rescaler: Rescaler) -> Self {
        AnnotatorHandler {
            store,
            authorizer,
            rescaler,
            colorizer: Colorizer::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_colorizer(mut self, colorizer: Colorizer) -> Self {
        self.colorizer = colorizer;
        self
    }

    /// Validates a display-space box and creates or updates it on the image.
    ///
    /// The box write and the collection touch happen in one transaction: either both
    /// become visible or neither does. On success the payload carries the box id.
    #[instrument(skip(self, ctx, payload), fields(user = %ctx.auth.email))]
    pub async fn upsert_bounding_box(
        &self,
        ctx: &RequestContext,
        image_id: &Uuid,
        collection_id: &Uuid,
        payload: &mut BoundingBoxPayload,
    ) -> Result<Uuid, AppError> {
        let id = ctx
            .bounded(self.upsert_in_tx(&ctx.auth, image_id, collection_id, payload))
            .await
            .map_err(|e| e.context(format!("upserting bounding box on image {}", image_id)))?;

        payload.id = Some(id.to_string());
        Ok(id)
    }

    async fn upsert_in_tx(
        &self,
        auth: &AuthContext,
        image_id: &Uuid,
        collection_id: &Uuid,
        payload: &BoundingBoxPayload,
    ) -> Result<Uuid, AppError> {
        let mut tx = self.store.begin().await?;

        let label = match payload.label_name() {
            Some(name) => Some(
                tx.find_label_by_name(name)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("label {:?}", name)))?,
            ),
            None => None,
        };

        let mut image = tx
            .get_image(image_id, collection_id, FetchImageOptions::META_ONLY)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("image {} in collection {}", image_id, collection_id)))?;

        self.authorizer
            .may_contribute_annotations(auth, &image.group)
            .await
            .map_err(|e| e.context(format!("user {} on group {}", auth.email, image.group)))?;

        let coords = self.rescaler.to_storage(image.original_width()?, payload.coords());

        let mut bbox = BoundingBox::new(coords)?;
        let label = label.ok_or_else(|| AppError::Validation("a label is required".into()))?;
        let label_name = label.name.clone();
        bbox.annotate(label);

        if let Some(existing) = payload.existing_id() {
            bbox.id = valid_uuid(existing)?;
        }

        let collection = tx
            .find_collection(collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("collection {}", collection_id)))?;

        if !is_label_allowed(&mut tx, &collection, &label_name).await? {
            return Err(AppError::ForbiddenLabel(format!(
                "label {:?} is not allowed in collection {}",
                label_name, collection.name
            )));
        }

        bbox.author_email = auth.email.clone();
        bbox.image_id = image.id;
        bbox.collection_id = collection.id;

        let now = self.clock.now();
        let updating = image.has_bounding_box(&bbox.id);
        bbox.updated_at = now;
        if updating {
            if let Some(stored) = image.bounding_boxes.iter_mut().find(|b| b.id == bbox.id) {
                bbox.created_at = stored.created_at;
                *stored = bbox.clone();
            }
            tx.update_bounding_box(&bbox, &image).await?;
        } else {
            bbox.created_at = now;
            tx.insert_bounding_box(&bbox, &image).await?;
            image.bounding_boxes.push(bbox.clone());
        }
        tx.touch_collection(&collection.id, now).await?;

        tx.commit().await?;

        info!(
            bounding_box_id = %bbox.id,
            image_id = %image.id,
            created = !updating,
            boxes = image.bounding_boxes.len(),
            "bounding box saved"
        );
        Ok(bbox.id)
    }

    /// Removes an annotation of any shape.
    ///
    /// Note: this does not re-check the caller's rights on the owning group.
    #[instrument(skip(self, ctx), fields(user = %ctx.auth.email))]
    pub async fn delete_annotation(&self, ctx: &RequestContext, annotation_id: &str) -> Result<(), AppError> {
        let id = valid_uuid(annotation_id)?;

        ctx.bounded(async {
            let mut tx = self.store.begin().await?;

            let annotation = tx
                .find_annotation(&id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("annotation {}", id)))?;
            tx.delete_annotation(&annotation.id).await?;

            tx.commit().await?;

            info!(annotation_id = %annotation.id, image_id = %annotation.image_id, "annotation deleted");
            Ok::<(), AppError>(())
        })
        .await
        .map_err(|e| e.context(format!("deleting annotation {}", annotation_id)))
    }

    pub async fn next_image(
        &self,
        ctx: &RequestContext,
        current: &Image,
        filter: &FilterArgs,
        ordering: OrderingArgs,
    ) -> Result<Image, AppError> {
        let scroller = Scroller::new(filter.clone(), ordering);
        ctx.bounded(async {
            let mut tx = self.store.begin().await?;
            scroller.next_image(&mut tx, current).await
        })
        .await
    }

    pub async fn prev_image(
        &self,
        ctx: &RequestContext,
        current: &Image,
        filter: &FilterArgs,
        ordering: OrderingArgs,
    ) -> Result<Image, AppError> {
        let scroller = Scroller::new(filter.clone(), ordering);
        ctx.bounded(async {
            let mut tx = self.store.begin().await?;
            scroller.prev_image(&mut tx, current).await
        })
        .await
    }

    #[instrument(skip(self, ctx))]
    pub async fn list_images(
        &self,
        ctx: &RequestContext,
        filter: &FilterArgs,
        ordering: OrderingArgs,
        page: PageRequest,
    ) -> Result<Vec<Image>, AppError> {
        ctx.bounded(async {
            let mut tx = self.store.begin().await?;
            tx.list_images(filter, &ordering, page).await
        })
        .await
        .map_err(|e| e.context("listing images"))
    }

    /// Assembles the annotation screen for one image.
    ///
    /// A caller without contribution rights still gets the state, with `can_annotate`
    /// unset. Missing neighbours are reported as `None`.
    #[instrument(skip(self, ctx), fields(user = %ctx.auth.email))]
    pub async fn make_state(&self, ctx: &RequestContext, request: &AnnotatorRequest) -> Result<AnnotatorState, AppError> {
        ctx.bounded(self.state_in_tx(&ctx.auth, request))
            .await
            .map_err(|e| e.context(format!("building annotator state for image {}", request.image_id)))
    }

    async fn state_in_tx(&self, auth: &AuthContext, request: &AnnotatorRequest) -> Result<AnnotatorState, AppError> {
        let mut tx = self.store.begin().await?;

        let mut image = tx
            .get_image(&request.image_id, &request.collection_id, FetchImageOptions::META_ONLY)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("image {} in collection {}", request.image_id, request.collection_id))
            })?;

        let collection = tx
            .find_collection(&request.collection_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("collection {}", request.collection_id)))?;

        let can_annotate = match self.authorizer.may_contribute_annotations(auth, &image.group).await {
            Ok(()) => true,
            Err(AppError::Forbidden(reason)) => {
                warn!(%reason, "annotation disabled");
                false
            }
            Err(e) => return Err(e),
        };

        let available_labels = available_label_names(&mut tx, &collection).await?;

        let original_width = image.original_width()?;
        let mut bounding_boxes: Vec<BoundingBoxPayload> = std::mem::take(&mut image.bounding_boxes)
            .iter()
            .map(|bbox| {
                let mut payload = BoundingBoxPayload::from(bbox);
                payload.set_coords(self.rescaler.to_display(original_width, bbox.coords));
                payload
            })
            .collect();
        self.colorizer.colorize(&mut bounding_boxes);

        let scroller = Scroller::new(request.filter.clone(), request.ordering);
        let next_image = found(scroller.next_image(&mut tx, &image).await)?.map(|i| i.id);
        let prev_image = found(scroller.prev_image(&mut tx, &image).await)?.map(|i| i.id);

        Ok(AnnotatorState {
            image,
            display_width: self.rescaler.target_width,
            bounding_boxes,
            available_labels,
            can_annotate,
            next_image,
            prev_image,
        })
    }
}

fn found<T>(result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
