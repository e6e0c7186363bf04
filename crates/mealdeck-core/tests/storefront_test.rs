#![allow(clippy::unwrap_used)]
// End-to-end storefront flows against a wiremock backend.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mealdeck_core::{
    ActiveView, CoreError, FoodData, FoodItem, MealForm, NoticeLevel, QueryOutcome, QueryStatus,
    RetryPolicy, Storefront, StorefrontConfig, keys,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Storefront) {
    let server = MockServer::start().await;
    let mut config = StorefrontConfig::new(server.uri());
    config.cache.query_retry = RetryPolicy::with_retries(3).with_base_delay(Duration::ZERO);
    config.cache.mutation_retry = RetryPolicy::with_retries(1).with_base_delay(Duration::ZERO);
    let storefront = Storefront::new(config).unwrap();
    (server, storefront)
}

fn meal(id: &str, name: &str, open: bool) -> serde_json::Value {
    json!({
        "id": id,
        "createdAt": "2024-06-15T10:30:00.000Z",
        "name": name,
        "avatar": "https://x/a.png",
        "rating": "4",
        "open": open,
        "logo": "https://x/b.png"
    })
}

fn pizza_form() -> MealForm {
    MealForm {
        name: "Pizza".into(),
        rating: "4".into(),
        avatar: "https://x/a.png".into(),
        restaurant_name: "Luigi's".into(),
        logo: "https://x/b.png".into(),
        status: "open".into(),
    }
}

async fn mount_list(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn item(value: serde_json::Value) -> FoodItem {
    serde_json::from_value(value).unwrap()
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_pizza_refreshes_list() {
    let (server, storefront) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Food"))
        .and(body_partial_json(json!({
            "name": "Pizza",
            "avatar": "https://x/a.png",
            "rating": "4",
            "open": true,
            "logo": "https://x/b.png"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(meal("1", "Pizza", true)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([meal("1", "Pizza", true)])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(storefront.show_all().await.unwrap().is_empty());

    let action = storefront.add_meal(&pizza_form()).await.unwrap();
    assert_eq!(action.value.id, "1");
    assert_eq!(action.notice.level, NoticeLevel::Success);
    assert_eq!(action.notice.title, "Meal added successfully!");
    assert_eq!(
        action.notice.description.as_deref(),
        Some("Pizza has been added to the menu.")
    );

    let visible = storefront.items();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Pizza");
}

#[tokio::test]
async fn test_update_overwrites_detail_entry() {
    let (server, storefront) = setup().await;
    mount_list(&server, json!([])).await;

    Mock::given(method("GET"))
        .and(path("/Food/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meal("42", "Pasta", true)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/Food/42"))
        .and(body_json(json!({
            "createdAt": "2024-06-15T10:30:00.000Z",
            "name": "Pasta",
            "avatar": "https://x/a.png",
            "rating": "4",
            "open": false,
            "logo": "https://x/b.png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(meal("42", "Pasta", false)))
        .expect(1)
        .mount(&server)
        .await;

    let QueryOutcome::Ready(existing) = storefront.get_meal(Some("42")).await.unwrap() else {
        panic!("query should run for a non-empty id");
    };
    assert!(existing.open);

    let mut form = MealForm::from_item(&existing);
    form.restaurant_name = "Nonna".into();
    form.status = "closed".into();

    let action = storefront.edit_meal(&existing, &form).await.unwrap();
    assert!(!action.value.open);
    assert_eq!(action.notice.title, "Meal updated successfully!");

    let state = storefront.cache().get(&keys::detail("42"));
    assert_eq!(state.status, QueryStatus::Success);
    assert!(!state.data.unwrap().as_item().unwrap().open);

    // Served from the patched entry; the GET mock expects a single call.
    let again = storefront.get_meal(Some("42")).await.unwrap().into_option().unwrap();
    assert!(!again.open);
}

#[tokio::test]
async fn test_delete_makes_next_get_a_miss() {
    let (server, storefront) = setup().await;
    mount_list(&server, json!([])).await;

    Mock::given(method("GET"))
        .and(path("/Food/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meal("7", "Sushi", true)))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/Food/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "7" })))
        .expect(1)
        .mount(&server)
        .await;

    let sushi = storefront.get_meal(Some("7")).await.unwrap().into_option().unwrap();

    let action = storefront.delete_meal(&sushi).await.unwrap();
    assert_eq!(action.value.id, "7");
    assert_eq!(
        action.notice.description.as_deref(),
        Some("Sushi has been removed from the menu.")
    );
    assert_eq!(storefront.cache().get(&keys::detail("7")).status, QueryStatus::Idle);

    storefront.get_meal(Some("7")).await.unwrap();
}

#[tokio::test]
async fn test_write_failure_is_retried_once_then_reported() {
    let (server, storefront) = setup().await;

    Mock::given(method("POST"))
        .and(path("/Food"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let err = storefront.add_meal(&pizza_form()).await.unwrap_err();
    assert_eq!(
        err.source,
        CoreError::RequestFailed {
            status: 503,
            status_text: "Service Unavailable".into(),
        }
    );
    let notice = err.notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.title, "Failed to add meal");
    assert!(storefront.cache().is_empty());
}

#[tokio::test]
async fn test_invalid_form_never_reaches_network() {
    let (server, storefront) = setup().await;

    let err = storefront.add_meal(&MealForm::default()).await.unwrap_err();
    assert!(err.notice.is_none());
    let CoreError::ValidationFailed(errors) = err.source else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 6);
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_blank_search_is_list_all() {
    let (server, storefront) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([meal("1", "Pizza", true)])))
        .expect(1)
        .mount(&server)
        .await;

    let listed = storefront.show_all().await.unwrap();
    let searched = storefront.search("   ").await.unwrap();

    assert_eq!(listed, searched);
    assert_eq!(storefront.active_view().await, ActiveView::All);
    assert_eq!(storefront.cache().stats().fetches, 1);
}

#[tokio::test]
async fn test_search_replaces_display_list() {
    let (server, storefront) = setup().await;

    // Mounted first so it takes precedence over the unfiltered list.
    Mock::given(method("GET"))
        .and(path("/Food"))
        .and(query_param("name", "pizza"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([meal("1", "Pizza", true)])))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([meal("1", "Pizza", true), meal("2", "Pasta", true)])).await;

    let mut stream = storefront.subscribe();
    storefront.show_all().await.unwrap();
    assert_eq!(stream.changed().await.unwrap().len(), 2);

    storefront.search(" pizza ").await.unwrap();
    assert_eq!(stream.changed().await.unwrap().len(), 1);
    assert_eq!(
        storefront.active_view().await,
        ActiveView::Search("pizza".into())
    );
}

#[tokio::test]
async fn test_background_revalidation_reaches_display_list() {
    let server = MockServer::start().await;
    let mut config = StorefrontConfig::new(server.uri());
    config.cache.list_stale_time = Duration::ZERO;
    config.cache.query_retry = RetryPolicy::with_retries(0);
    let storefront = Storefront::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/Food"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([meal("1", "Pizza", true)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([meal("1", "Pizza", true), meal("2", "Pasta", true)])).await;

    let first = storefront.show_all().await.unwrap();
    assert_eq!(first.len(), 1);

    // Stale read: answered from cache, refreshed in the background.
    let second = storefront.show_all().await.unwrap();
    assert_eq!(second.len(), 1);

    let mut stream = storefront.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        while stream.current().len() < 2 {
            stream.changed().await.unwrap();
        }
    })
    .await
    .unwrap();
    assert_eq!(storefront.items().len(), 2);

    storefront.shutdown().await;
}

#[tokio::test]
async fn test_switching_view_stops_forwarding_old_list() {
    let (server, storefront) = setup().await;
    mount_list(&server, json!([meal("1", "Pizza", true), meal("2", "Pasta", true)])).await;
    Mock::given(method("GET"))
        .and(path("/Food"))
        .and(query_param("name", "sushi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    storefront.show_all().await.unwrap();
    storefront.search("sushi").await.unwrap();
    assert!(storefront.items().is_empty());

    // A write to the list that is no longer shown leaves the display alone.
    storefront.cache().set_data(
        &keys::lists(),
        FoodData::List(Arc::new(vec![item(meal("3", "Ramen", true))])),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(storefront.items().is_empty());
}

#[tokio::test]
async fn test_search_failure_carries_notice() {
    let (server, storefront) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Food"))
        .and(query_param("name", "pizza"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let err = storefront.search("pizza").await.unwrap_err();
    assert_eq!(
        err.notice.unwrap().title,
        "Error searching for meals. Please try again."
    );
    let state = storefront.cache().get(&keys::search("pizza"));
    assert_eq!(state.status, QueryStatus::Error);
    assert!(storefront.items().is_empty());
}

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let (server, storefront) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Food"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([meal("1", "Pizza", true)]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let queries = storefront.queries();
    let (a, b) = tokio::join!(queries.list_all(), queries.list_all());

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(storefront.cache().stats().deduplicated, 1);
}

#[tokio::test]
async fn test_missing_id_keeps_query_dormant() {
    let (server, storefront) = setup().await;

    assert!(storefront.get_meal(None).await.unwrap().is_dormant());
    assert!(storefront.get_meal(Some("")).await.unwrap().is_dormant());
    assert!(storefront.cache().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_read_failure_exhausts_retries() {
    let (server, storefront) = setup().await;

    Mock::given(method("GET"))
        .and(path("/Food"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let err = storefront.show_all().await.unwrap_err();
    assert!(err.notice.is_none());
    assert_eq!(err.to_string(), "API Error: 500 Internal Server Error");
}

#[tokio::test]
async fn test_edit_keeps_created_at_of_existing_record() {
    let (server, storefront) = setup().await;
    mount_list(&server, json!([])).await;

    Mock::given(method("PUT"))
        .and(path("/Food/9"))
        .and(body_partial_json(json!({ "createdAt": "2023-01-01T00:00:00.000Z" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(meal("9", "Tacos", true)))
        .expect(1)
        .mount(&server)
        .await;

    let mut existing = item(meal("9", "Tacos", true));
    existing.created_at = "2023-01-01T00:00:00.000Z".into();
    let mut form = MealForm::from_item(&existing);
    form.restaurant_name = "El Rey".into();

    storefront.edit_meal(&existing, &form).await.unwrap();
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_and_shutdown() {
    let (_server, storefront) = setup().await;
    storefront.start().await;
    tokio::time::timeout(Duration::from_secs(5), storefront.shutdown())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_base_url_is_config_error() {
    let storefront = Storefront::new(StorefrontConfig::default()).unwrap();
    let err = storefront.show_all().await.unwrap_err();
    assert!(matches!(err.source, CoreError::Config { .. }));
}
