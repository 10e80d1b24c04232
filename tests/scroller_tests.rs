
use annotation_engine::{
    entities::{
        bounding_box::BoxCoords,
        collection::Collection,
        filters::{FilterArgs, OrderingArgs, OrderingField, PageRequest},
        image::Image,
        label::Label,
    },
    errors::AppError,
    repositories::{image::ImageRepository, memory::InMemoryStore, store::Store},
    use_cases::scroller::Scroller,
};
use test_utils::*;
use uuid::Uuid;

struct Gallery {
    store: InMemoryStore,
    collection: Collection,
    images: Vec<Image>,
}

/// Images captured at t=1, t=2 (twice, ids 0x21 < 0x22) and t=3, plus one image in
/// another collection at t=2.
async fn gallery() -> Gallery {
    let store = InMemoryStore::new();
    let collection = Collection::new("survey", GROUP, at(0));
    let other = Collection::new("elsewhere", GROUP, at(0));
    store.add_collection(collection.clone()).await;
    store.add_collection(other.clone()).await;

    let images = vec![
        image_with_id(Uuid::from_u128(0x10), &collection, at(1)),
        image_with_id(Uuid::from_u128(0x22), &collection, at(2)),
        image_with_id(Uuid::from_u128(0x21), &collection, at(2)),
        image_with_id(Uuid::from_u128(0x30), &collection, at(3)),
    ];
    for image in &images {
        store.add_image(image.clone()).await;
    }
    store.add_image(image_with_id(Uuid::from_u128(0x25), &other, at(2))).await;

    Gallery { store, collection, images }
}

fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

impl Gallery {
    fn image(&self, n: u128) -> &Image {
        self.images.iter().find(|i| i.id == id(n)).unwrap()
    }

    fn scroller(&self, ordering: OrderingArgs) -> Scroller {
        Scroller::new(FilterArgs::default().in_collection(self.collection.id), ordering)
    }
}

#[tokio::test]
async fn next_and_prev_follow_capture_time_then_id() {
    let g = gallery().await;
    let scroller = g.scroller(OrderingArgs::default());
    let mut tx = g.store.begin().await.unwrap();

    assert_eq!(scroller.next_image(&mut tx, g.image(0x10)).await.unwrap().id, id(0x21));
    assert_eq!(scroller.next_image(&mut tx, g.image(0x21)).await.unwrap().id, id(0x22));
    assert_eq!(scroller.next_image(&mut tx, g.image(0x22)).await.unwrap().id, id(0x30));

    assert_eq!(scroller.prev_image(&mut tx, g.image(0x30)).await.unwrap().id, id(0x22));
    assert_eq!(scroller.prev_image(&mut tx, g.image(0x22)).await.unwrap().id, id(0x21));
    assert_eq!(scroller.prev_image(&mut tx, g.image(0x21)).await.unwrap().id, id(0x10));
}

#[tokio::test]
async fn boundaries_are_not_found() {
    let g = gallery().await;
    let scroller = g.scroller(OrderingArgs::default());
    let mut tx = g.store.begin().await.unwrap();

    let err = scroller.next_image(&mut tx, g.image(0x30)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = scroller.prev_image(&mut tx, g.image(0x10)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn walking_next_reproduces_the_ascending_listing() {
    let g = gallery().await;
    let ordering = OrderingArgs::ascending(OrderingField::CapturedAt);
    let scroller = g.scroller(ordering);
    let mut tx = g.store.begin().await.unwrap();

    let listed: Vec<Uuid> = tx
        .list_images(&scroller.filter, &ordering, PageRequest { page: 1, per_page: 100 })
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    let mut walked = vec![listed[0]];
    let mut current = g.image(0x10).clone();
    while let Ok(next) = scroller.next_image(&mut tx, &current).await {
        walked.push(next.id);
        current = next;
    }

    assert_eq!(walked, listed);
    assert_eq!(listed, vec![id(0x10), id(0x21), id(0x22), id(0x30)]);
}

#[tokio::test]
async fn descending_listing_keeps_ids_ascending_within_ties() {
    let g = gallery().await;
    let ordering = OrderingArgs::descending(OrderingField::CapturedAt);
    let mut tx = g.store.begin().await.unwrap();

    let listed: Vec<Uuid> = tx
        .list_images(&g.scroller(ordering).filter, &ordering, PageRequest::default())
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(listed, vec![id(0x30), id(0x21), id(0x22), id(0x10)]);
}

#[tokio::test]
async fn filter_is_shared_with_listing() {
    let g = gallery().await;
    let mut tx = g.store.begin().await.unwrap();

    // without a collection filter the foreign image at t=2 sits between 0x22 and 0x30
    let unfiltered = Scroller::new(FilterArgs::default(), OrderingArgs::default());
    assert_eq!(unfiltered.next_image(&mut tx, g.image(0x22)).await.unwrap().id, id(0x25));

    let by_name = Scroller::new(FilterArgs::default().named_collection("survey"), OrderingArgs::default());
    assert_eq!(by_name.next_image(&mut tx, g.image(0x22)).await.unwrap().id, id(0x30));
}

#[tokio::test]
async fn camera_filter_skips_other_cameras() {
    let store = InMemoryStore::new();
    let collection = Collection::new("survey", GROUP, at(0));
    store.add_collection(collection.clone()).await;
    let camera = Uuid::new_v4();

    let mut first = image_in(&collection, at(1));
    first.camera_id = Some(camera);
    let other_camera = image_in(&collection, at(2));
    let mut last = image_in(&collection, at(3));
    last.camera_id = Some(camera);
    for image in [&first, &other_camera, &last] {
        store.add_image(image.clone()).await;
    }

    let scroller = Scroller::new(FilterArgs::default().with_camera(camera), OrderingArgs::default());
    let mut tx = store.begin().await.unwrap();

    assert_eq!(scroller.next_image(&mut tx, &first).await.unwrap().id, last.id);
}

#[tokio::test]
async fn created_at_ordering_ignores_capture_time() {
    let store = InMemoryStore::new();
    let collection = Collection::new("survey", GROUP, at(0));
    store.add_collection(collection.clone()).await;

    let mut uploaded_first = image_in(&collection, at(50));
    uploaded_first.created_at = at(100);
    let mut uploaded_second = image_in(&collection, at(10));
    uploaded_second.created_at = at(200);
    store.add_image(uploaded_first.clone()).await;
    store.add_image(uploaded_second.clone()).await;

    let mut tx = store.begin().await.unwrap();
    let by_upload = Scroller::new(FilterArgs::default(), OrderingArgs::ascending(OrderingField::CreatedAt));
    let by_capture = Scroller::new(FilterArgs::default(), OrderingArgs::default());

    assert_eq!(by_upload.next_image(&mut tx, &uploaded_first).await.unwrap().id, uploaded_second.id);
    assert!(by_capture.next_image(&mut tx, &uploaded_first).await.is_err());
}

#[tokio::test]
async fn label_filter_skips_images_without_that_label() {
    let store = InMemoryStore::new();
    let collection = Collection::new("survey", GROUP, at(0));
    store.add_collection(collection.clone()).await;
    let (car, tree) = (Label::new("car"), Label::new("tree"));

    let mut first = image_in(&collection, at(1));
    first.bounding_boxes = vec![stored_box(&first, &car, BoxCoords::new(5.0, 5.0, 2.0, 2.0), at(1))];
    let mut middle = image_in(&collection, at(2));
    middle.bounding_boxes = vec![stored_box(&middle, &tree, BoxCoords::new(5.0, 5.0, 2.0, 2.0), at(2))];
    let mut last = image_in(&collection, at(3));
    last.bounding_boxes = vec![stored_box(&last, &car, BoxCoords::new(5.0, 5.0, 2.0, 2.0), at(3))];
    for image in [&first, &middle, &last] {
        store.add_image(image.clone()).await;
    }

    let filter = FilterArgs::default().in_collection(collection.id).with_label(car.id);
    let scroller = Scroller::new(filter.clone(), OrderingArgs::default());
    let mut tx = store.begin().await.unwrap();

    assert_eq!(scroller.next_image(&mut tx, &first).await.unwrap().id, last.id);
    assert_eq!(scroller.prev_image(&mut tx, &last).await.unwrap().id, first.id);

    let listed: Vec<Uuid> = tx
        .list_images(&filter, &OrderingArgs::default(), PageRequest::default())
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(listed, vec![first.id, last.id]);
}

#[tokio::test]
async fn listing_by_collection_name_excludes_other_collections() {
    let g = gallery().await;
    let mut tx = g.store.begin().await.unwrap();

    let filter = FilterArgs::default().named_collection("elsewhere");
    let listed: Vec<Uuid> = tx
        .list_images(&filter, &OrderingArgs::default(), PageRequest::default())
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();

    assert_eq!(listed, vec![id(0x25)]);
}
