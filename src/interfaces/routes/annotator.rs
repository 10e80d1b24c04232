use actix_web::web;

use crate::{
    handlers::annotator,
    repositories::{authorizer::Authorizer, store::Store},
};

pub fn config_routes<S, A>(cfg: &mut web::ServiceConfig)
where
    S: Store + 'static,
    A: Authorizer + 'static,
{
    cfg.service(
        web::resource("/collections/{collection_id}/images")
            .route(web::get().to(annotator::list_images::<S, A>))
    )
    .service(
        web::resource("/collections/{collection_id}/images/{image_id}/annotator")
            .route(web::get().to(annotator::annotator_state::<S, A>))
    )
    .service(
        web::resource("/collections/{collection_id}/images/{image_id}/bounding-boxes")
            .route(web::put().to(annotator::upsert_bounding_box::<S, A>))
    )
    .service(
        web::resource("/annotations/{annotation_id}")
            .route(web::delete().to(annotator::delete_annotation::<S, A>))
    );
}
