
use std::time::Duration;

use actix_web::{http::StatusCode, test, web, App};
use annotation_engine::{
    auth::entitlements::EntitlementAuthorizer,
    constants::{EMAIL_HEADER, ENTITLEMENTS_HEADER, GROUPS_HEADER},
    entities::bounding_box::BoxCoords,
    repositories::memory::InMemoryStore,
    routes::configure_routes,
    AppState,
};
use serde_json::{json, Value};
use test_utils::*;

macro_rules! app {
    ($fx:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::with_annotator(
                    $fx.annotator(),
                    Duration::from_secs(5),
                )))
                .configure(configure_routes::<InMemoryStore, EntitlementAuthorizer>),
        )
        .await
    };
}

fn contributor_headers(req: test::TestRequest) -> test::TestRequest {
    req.insert_header((EMAIL_HEADER, CONTRIBUTOR_EMAIL))
        .insert_header((GROUPS_HEADER, format!("{}|readers", GROUP)))
        .insert_header((ENTITLEMENTS_HEADER, "annotation-contrib"))
}

fn box_uri(fx: &Fixture) -> String {
    format!(
        "/api/v1/collections/{}/images/{}/bounding-boxes",
        fx.collection.id, fx.image.id
    )
}

#[actix_rt::test]
async fn put_bounding_box_returns_the_saved_payload() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = contributor_headers(test::TestRequest::put().uri(&box_uri(&fx)))
        .set_json(json!({"xc": 320.0, "yc": 200.0, "width": 100.0, "height": 80.0, "label": "car"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let stored = fx.boxes().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(body["id"], json!(stored[0].id.to_string()));
    assert_eq!(body["xc"], json!(320.0));
    let expected = BoxCoords::new(500.0, 312.5, 156.25, 125.0);
    assert!((stored[0].coords.xc - expected.xc).abs() < 1e-9);
    assert!((stored[0].coords.height - expected.height).abs() < 1e-9);
}

#[actix_rt::test]
async fn missing_identity_is_forbidden() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::put()
        .uri(&box_uri(&fx))
        .set_json(json!({"xc": 1.0, "yc": 1.0, "width": 1.0, "height": 1.0, "label": "car"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "forbidden");
}

#[actix_rt::test]
async fn disallowed_label_is_reported_distinctly() {
    let fx = Fixture::with_profile(&["car"]).await;
    let app = app!(fx);

    let req = contributor_headers(test::TestRequest::put().uri(&box_uri(&fx)))
        .set_json(json!({"xc": 1.0, "yc": 1.0, "width": 1.0, "height": 1.0, "label": "tree"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "forbidden_label");
}

#[actix_rt::test]
async fn malformed_body_is_a_validation_error() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = contributor_headers(test::TestRequest::put().uri(&box_uri(&fx)))
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"xc\": \"left\"}")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_rt::test]
async fn annotator_state_is_served_as_json() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let uri = format!(
        "/api/v1/collections/{}/images/{}/annotator?order_by=created_at&descending=true",
        fx.collection.id, fx.image.id
    );
    let req = contributor_headers(test::TestRequest::get().uri(&uri)).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["can_annotate"], json!(true));
    assert_eq!(body["available_labels"], json!(["car", "person", "tree"]));
    assert_eq!(body["next_image"], Value::Null);
    assert_eq!(body["image"]["id"], json!(fx.image.id.to_string()));
}

#[actix_rt::test]
async fn delete_then_delete_again() {
    let fx = Fixture::new().await;
    let mut image = fx.image.clone();
    let existing = stored_box(&image, fx.label("car"), BoxCoords::new(5.0, 5.0, 2.0, 2.0), at(30));
    image.bounding_boxes.push(existing.clone());
    fx.store.add_image(image).await;
    let app = app!(fx);

    let uri = format!("/api/v1/annotations/{}", existing.id);
    let resp = test::call_service(&app, contributor_headers(test::TestRequest::delete().uri(&uri)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, contributor_headers(test::TestRequest::delete().uri(&uri)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn listing_is_paginated() {
    let fx = Fixture::new().await;
    for secs in 1..=4 {
        fx.store.add_image(image_in(&fx.collection, at(secs))).await;
    }
    let app = app!(fx);

    let uri = format!("/api/v1/collections/{}/images?page=1&per_page=2", fx.collection.id);
    let req = contributor_headers(test::TestRequest::get().uri(&uri)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[actix_rt::test]
async fn health_reports_database_status() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "OK");
    assert_eq!(body["status"], "healthy");
}
