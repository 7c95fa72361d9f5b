//! Supabase Object Store Integration Tests
//!
//! Runs the HTTP store against a mock Storage API:
//! - Uploads upsert with the anon key
//! - Reads go to the public URL with a cache-busting query
//! - Failures surface as errors on write and as absence on read

use advent_core::{create_text, SceneStore};
use advent_storage::{
    CalendarRepository, CalendarToken, ObjectStore, StorageConfig, StorageError,
    SupabaseObjectStore,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> SupabaseObjectStore {
    let config = StorageConfig::new(server.uri(), "anon-key", "calendars").expect("config");
    SupabaseObjectStore::new(config).expect("client")
}

fn token() -> CalendarToken {
    CalendarToken::parse("tok123").expect("token")
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_put_upserts_and_returns_public_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/calendars/calendar/tok123/calendar.json"))
        .and(header("x-upsert", "true"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Key": "calendars/calendar/tok123/calendar.json"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = store_for(&server)
        .put("calendar/tok123", "calendar.json", b"{}".to_vec(), "application/json")
        .await
        .expect("put");
    assert_eq!(
        url,
        format!(
            "{}/storage/v1/object/public/calendars/calendar/tok123/calendar.json",
            server.uri()
        )
    );
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_put_failure_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("row-level security"))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .put("calendar/tok123", "calendar.json", b"{}".to_vec(), "application/json")
        .await
        .expect_err("forbidden");
    match err {
        StorageError::Status { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "row-level security");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_get_json_reads_public_url_with_cache_buster() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/storage/v1/object/public/calendars/calendar/tok123/calendar.json",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Advent"})))
        .mount(&server)
        .await;

    let value = store_for(&server)
        .get_json("calendar/tok123", "calendar.json")
        .await;
    assert_eq!(value, Some(json!({"title": "Advent"})));

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0]
        .url
        .query_pairs()
        .any(|(key, value)| key == "t" && value.parse::<u128>().is_ok()));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_missing_and_garbled_objects_read_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/storage/v1/object/public/calendars/calendar/tok123/day2/manifest.json",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repo = CalendarRepository::new(store_for(&server));
    assert_eq!(repo.load_day(&token(), 1).await.expect("day 1"), None);
    assert_eq!(repo.load_day(&token(), 2).await.expect("day 2"), None);
    assert_eq!(repo.load_calendar(&token()).await, None);
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_saved_days_lists_folders_then_manifests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/list/calendars"))
        .and(body_partial_json(json!({"prefix": "calendar/tok123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "calendar.json"},
            {"name": "day1"},
            {"name": "day3"},
            {"name": ".emptyFolderPlaceholder"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/list/calendars"))
        .and(body_partial_json(json!({"prefix": "calendar/tok123/day1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "manifest.json"},
            {"name": "assets"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/list/calendars"))
        .and(body_partial_json(json!({"prefix": "calendar/tok123/day3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "assets"}])))
        .mount(&server)
        .await;

    let repo = CalendarRepository::new(store_for(&server));
    assert_eq!(repo.saved_days(&token()).await, vec![1]);
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_list_failure_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    assert!(store_for(&server).list("calendar/tok123").await.is_empty());
}

// ============================================================================
// Repository
// ============================================================================

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn test_save_day_uploads_scene_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/storage/v1/object/calendars/calendar/tok123/day5/manifest.json",
        ))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut scene = SceneStore::new();
    scene.add_item(create_text()).expect("text");
    let repo = CalendarRepository::new(store_for(&server));
    repo.save_day(&token(), 5, &scene.document())
        .await
        .expect("save");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["version"], 1);
    assert_eq!(body["items"][0]["kind"]["type"], "text");
}

#[tokio::test]
async fn test_invalid_day_never_hits_network() {
    let server = MockServer::start().await;
    let repo = CalendarRepository::new(store_for(&server));
    let err = repo
        .save_day(&token(), 0, &SceneStore::new().document())
        .await
        .expect_err("day 0");
    assert!(matches!(err, StorageError::InvalidDay(0)));
    assert!(server
        .received_requests()
        .await
        .expect("recording enabled")
        .is_empty());
}
