use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::{
        bounding_box::BoundingBoxPayload,
        filters::{FilterArgs, OrderingArgs, OrderingField, PageRequest},
    },
    errors::AppError,
    repositories::{authorizer::Authorizer, store::Store},
    use_cases::{annotator::AnnotatorRequest, extractors::Identity},
    AppState,
};

/// Narrowing and ordering accepted by the browsing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub camera_id: Option<Uuid>,
    pub label_id: Option<Uuid>,
    pub order_by: Option<OrderingField>,
    #[serde(default)]
    pub descending: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl BrowseQuery {
    fn filter(&self, collection_id: Uuid) -> FilterArgs {
        FilterArgs {
            collection_id: Some(collection_id),
            camera_id: self.camera_id,
            label_id: self.label_id,
            ..Default::default()
        }
    }

    fn ordering(&self) -> OrderingArgs {
        OrderingArgs {
            field: self.order_by.unwrap_or_default(),
            descending: self.descending,
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(10).clamp(1, 100),
        }
    }
}

#[instrument(skip(identity, state, data))]
pub async fn upsert_bounding_box<S, A>(
    identity: Identity,
    state: web::Data<AppState<S, A>>,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<BoundingBoxPayload>,
) -> Result<impl Responder, AppError>
where
    S: Store + 'static,
    A: Authorizer + 'static,
{
    let (collection_id, image_id) = path.into_inner();
    let ctx = state.request_context(identity.0);
    let mut payload = data.into_inner();

    state
        .annotator
        .upsert_bounding_box(&ctx, &image_id, &collection_id, &mut payload)
        .await?;

    Ok(HttpResponse::Ok().json(payload))
}

#[instrument(skip(identity, state))]
pub async fn delete_annotation<S, A>(
    identity: Identity,
    state: web::Data<AppState<S, A>>,
    annotation_id: web::Path<String>,
) -> Result<impl Responder, AppError>
where
    S: Store + 'static,
    A: Authorizer + 'static,
{
    let ctx = state.request_context(identity.0);

    state.annotator.delete_annotation(&ctx, &annotation_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(identity, state))]
pub async fn annotator_state<S, A>(
    identity: Identity,
    state: web::Data<AppState<S, A>>,
    path: web::Path<(Uuid, Uuid)>,
    query: web::Query<BrowseQuery>,
) -> Result<impl Responder, AppError>
where
    S: Store + 'static,
    A: Authorizer + 'static,
{
    let (collection_id, image_id) = path.into_inner();
    let ctx = state.request_context(identity.0);
    let request = AnnotatorRequest {
        image_id,
        collection_id,
        filter: query.filter(collection_id),
        ordering: query.ordering(),
    };

    let annotator_state = state.annotator.make_state(&ctx, &request).await?;

    Ok(HttpResponse::Ok().json(annotator_state))
}

#[instrument(skip(identity, state))]
pub async fn list_images<S, A>(
    identity: Identity,
    state: web::Data<AppState<S, A>>,
    collection_id: web::Path<Uuid>,
    query: web::Query<BrowseQuery>,
) -> Result<impl Responder, AppError>
where
    S: Store + 'static,
    A: Authorizer + 'static,
{
    let ctx = state.request_context(identity.0);
    let images = state
        .annotator
        .list_images(&ctx, &query.filter(*collection_id), query.ordering(), query.page())
        .await?;

    Ok(HttpResponse::Ok().json(images))
}
