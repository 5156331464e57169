use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use sync_framework::mock::MockGateway;
use sync_framework::{
    CollectionActor, CollectionStore, DebounceState, FetchOutcome, FetchStatus, FilterState,
    FilterValue, Gateway, GatewayError, GatewayRequest, Method, MutationCoordinator,
    PaginationMode, QueryDebouncer, RecordId, Resource, SyncError, SyncSettings,
};
use tokio::time::Instant;

// --- Test Resources ---

struct Enterprises;

impl Resource for Enterprises {
    const NAME: &'static str = "enterprises";
    const PATH: &'static str = "/enterprises";
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
    const PAGINATION: PaginationMode = PaginationMode::Server;
}

struct Classes;

impl Resource for Classes {
    const NAME: &'static str = "classes";
    const PATH: &'static str = "/classes";
    const SEARCH_FIELDS: &'static [&'static str] = &["name"];
}

struct PromoCodes;

impl Resource for PromoCodes {
    const NAME: &'static str = "promo-codes";
    const PATH: &'static str = "/promo-codes";
    const SEARCH_FIELDS: &'static [&'static str] = &["code"];
    const TOGGLE_FIELD: Option<&'static str> = Some("isActive");
}

fn spawn_collection<R: Resource>(mock: &MockGateway) -> MutationCoordinator<R> {
    let (actor, client) = CollectionActor::<R>::new(32);
    tokio::spawn(actor.run());
    MutationCoordinator::new(mock.shared(), client)
}

fn classes(range: std::ops::RangeInclusive<u32>) -> Vec<Value> {
    range
        .map(|n| json!({ "id": format!("c-{n}"), "name": format!("Class {n}") }))
        .collect()
}

fn ids(store: &CollectionStore) -> Vec<String> {
    store
        .items()
        .iter()
        .map(|record| record.id().to_string())
        .collect()
}

// --- Coordinator ---

#[tokio::test]
async fn test_older_fetch_finishing_last_is_discarded() {
    let mock = MockGateway::new();
    let page_two = mock.expect(Method::Get, "/enterprises").defer();
    let page_three = mock.expect(Method::Get, "/enterprises").defer();
    let enterprises = spawn_collection::<Enterprises>(&mock);

    let first = {
        let enterprises = enterprises.clone();
        tokio::spawn(async move { enterprises.fetch(&FilterState::new().with_page(2)).await })
    };
    mock.wait_for_requests(1).await;
    let second = {
        let enterprises = enterprises.clone();
        tokio::spawn(async move { enterprises.fetch(&FilterState::new().with_page(3)).await })
    };
    mock.wait_for_requests(2).await;

    page_three.respond_ok(json!({
        "data": [{ "id": "e-21", "name": "Gamma" }],
        "currentPage": 3, "totalPages": 3, "totalItems": 21
    }));
    assert_eq!(second.await.unwrap().unwrap(), FetchOutcome::Applied);

    page_two.respond_ok(json!({
        "data": [{ "id": "e-11", "name": "Beta" }],
        "currentPage": 2, "totalPages": 3, "totalItems": 21
    }));
    assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Stale);

    let store = enterprises.collection().snapshot().await.unwrap();
    assert_eq!(ids(&store), vec!["e-21"]);
    assert_eq!(store.status(), FetchStatus::Succeeded);
    assert_eq!(store.pagination().map(|p| p.current_page), Some(3));

    let requests = mock.requests();
    assert!(requests[0].query.contains(&("page".into(), "2".into())));
    assert!(requests[1].query.contains(&("page".into(), "3".into())));
    mock.verify();
}

#[tokio::test]
async fn test_superseded_fetch_finishing_first_keeps_store_loading() {
    let mock = MockGateway::new();
    let t1 = mock.expect(Method::Get, "/classes").defer();
    let t2 = mock.expect(Method::Get, "/classes").defer();
    let coordinator = spawn_collection::<Classes>(&mock);

    let first = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.fetch(&FilterState::new()).await })
    };
    mock.wait_for_requests(1).await;
    let second = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator
                .fetch(&FilterState::new().with_search_term("bio"))
                .await
        })
    };
    mock.wait_for_requests(2).await;

    t1.respond_ok(Value::Array(classes(1..=5)));
    assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Stale);
    let store = coordinator.collection().snapshot().await.unwrap();
    assert_eq!(store.status(), FetchStatus::Loading);
    assert!(store.is_empty());

    t2.respond_ok(json!([{ "id": "c-2", "name": "Biology" }]));
    assert_eq!(second.await.unwrap().unwrap(), FetchOutcome::Applied);
    let store = coordinator.collection().snapshot().await.unwrap();
    assert_eq!(store.status(), FetchStatus::Succeeded);
    assert_eq!(ids(&store), vec!["c-2"]);
    mock.verify();
}

#[tokio::test]
async fn test_stale_failure_does_not_mark_store_failed() {
    let mock = MockGateway::new();
    let slow = mock.expect(Method::Get, "/classes").defer();
    mock.expect(Method::Get, "/classes")
        .return_ok(Value::Array(classes(1..=2)));
    let classes_coordinator = spawn_collection::<Classes>(&mock);

    let first = {
        let coordinator = classes_coordinator.clone();
        tokio::spawn(async move { coordinator.fetch(&FilterState::new()).await })
    };
    mock.wait_for_requests(1).await;
    classes_coordinator.fetch(&FilterState::new()).await.unwrap();

    slow.respond_err(GatewayError::Transport("connection reset".into()));
    assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Stale);

    let store = classes_coordinator.collection().snapshot().await.unwrap();
    assert_eq!(store.status(), FetchStatus::Succeeded);
    assert_eq!(store.error(), None);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_remove_confirmed_by_server() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/enterprises").return_ok(json!({
        "data": classes(1..=10),
        "currentPage": 1, "totalPages": 1, "totalItems": 10
    }));
    mock.expect(Method::Delete, "/enterprises/c-7").return_ok(json!({ "message": "deleted" }));
    let coordinator = spawn_collection::<Enterprises>(&mock);

    coordinator.fetch(&FilterState::new()).await.unwrap();
    coordinator.remove(RecordId::new("c-7")).await.unwrap();

    let store = coordinator.collection().snapshot().await.unwrap();
    assert_eq!(
        ids(&store),
        vec!["c-1", "c-2", "c-3", "c-4", "c-5", "c-6", "c-8", "c-9", "c-10"]
    );
    assert_eq!(store.pagination().map(|p| p.total_items), Some(9));
    mock.verify();
}

#[tokio::test]
async fn test_failed_remove_leaves_store_untouched() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes")
        .return_ok(Value::Array(classes(1..=3)));
    mock.expect(Method::Delete, "/classes/c-2").return_err(GatewayError::Rejected {
        status: 409,
        message: "class has students".into(),
    });
    let coordinator = spawn_collection::<Classes>(&mock);

    coordinator.fetch(&FilterState::new()).await.unwrap();
    let result = coordinator.remove(RecordId::new("c-2")).await;

    assert!(matches!(
        result,
        Err(SyncError::Gateway(GatewayError::Rejected { status: 409, .. }))
    ));
    let store = coordinator.collection().snapshot().await.unwrap();
    assert_eq!(ids(&store), vec!["c-1", "c-2", "c-3"]);
    mock.verify();
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_items() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes")
        .return_ok(Value::Array(classes(1..=2)));
    mock.expect(Method::Get, "/classes")
        .return_err(GatewayError::Rejected {
            status: 500,
            message: "database unavailable".into(),
        });
    let coordinator = spawn_collection::<Classes>(&mock);

    coordinator.fetch(&FilterState::new()).await.unwrap();
    let result = coordinator.fetch(&FilterState::new()).await;
    assert!(result.unwrap_err().is_remote());

    let selection = coordinator.select(&FilterState::new(), 10).await.unwrap();
    assert_eq!(selection.status, FetchStatus::Failed);
    assert_eq!(
        selection.error.as_deref(),
        Some("Request rejected (500): database unavailable")
    );
    assert_eq!(selection.visible_items.len(), 2);
}

#[tokio::test]
async fn test_create_and_update_apply_server_echo() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes")
        .return_ok(Value::Array(classes(1..=1)));
    mock.expect(Method::Post, "/classes")
        .return_ok(json!({ "data": { "_id": 42, "name": "Geometry" } }));
    mock.expect(Method::Put, "/classes/42")
        .return_ok(json!({ "id": "42", "name": "Geometry II" }));
    let coordinator = spawn_collection::<Classes>(&mock);

    coordinator.fetch(&FilterState::new()).await.unwrap();
    let mut payload = serde_json::Map::new();
    payload.insert("name".into(), json!("Geometry"));
    let created = coordinator.create(payload).await.unwrap();
    assert_eq!(created.id().as_str(), "42");

    let mut payload = serde_json::Map::new();
    payload.insert("name".into(), json!("Geometry II"));
    coordinator.update(RecordId::new("42"), payload).await.unwrap();

    let store = coordinator.collection().snapshot().await.unwrap();
    assert_eq!(store.len(), 2);
    let updated = store.find(&RecordId::new("42")).unwrap();
    assert_eq!(updated.get("name"), Some(&json!("Geometry II")));

    let requests = mock.requests();
    assert_eq!(requests[1].body, Some(json!({ "name": "Geometry" })));
    mock.verify();
}

#[tokio::test]
async fn test_update_of_record_missing_locally_still_succeeds() {
    let mock = MockGateway::new();
    mock.expect(Method::Put, "/classes/c-9")
        .return_ok(json!({ "id": "c-9", "name": "Remote only" }));
    let coordinator = spawn_collection::<Classes>(&mock);

    let record = coordinator
        .update(RecordId::new("c-9"), serde_json::Map::new())
        .await
        .unwrap();
    assert_eq!(record.id().as_str(), "c-9");
    assert!(coordinator.collection().snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_toggle_with_and_without_echo() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/promo-codes").return_ok(json!([
        { "id": "p-1", "code": "SPRING", "isActive": true },
        { "id": "p-2", "code": "SUMMER", "isActive": false }
    ]));
    mock.expect(Method::Patch, "/promo-codes/p-1/toggle")
        .return_ok(json!({ "id": "p-1", "code": "SPRING", "isActive": false }));
    mock.expect(Method::Patch, "/promo-codes/p-2/toggle")
        .return_ok(Value::Null);
    let coordinator = spawn_collection::<PromoCodes>(&mock);

    coordinator.fetch(&FilterState::new()).await.unwrap();
    let echoed = coordinator.toggle(RecordId::new("p-1")).await.unwrap();
    assert!(echoed.is_some());
    let bare = coordinator.toggle(RecordId::new("p-2")).await.unwrap();
    assert!(bare.is_none());

    let store = coordinator.collection().snapshot().await.unwrap();
    let active = |id: &str| {
        store
            .find(&RecordId::new(id))
            .and_then(|r| r.get("isActive").cloned())
    };
    assert_eq!(active("p-1"), Some(json!(false)));
    assert_eq!(active("p-2"), Some(json!(true)));
    mock.verify();
}

#[tokio::test]
async fn test_toggle_rejected_locally_for_resource_without_toggle() {
    let mock = MockGateway::new();
    let coordinator = spawn_collection::<Classes>(&mock);

    let result = coordinator.toggle(RecordId::new("c-1")).await;

    assert_eq!(
        result.unwrap_err(),
        SyncError::Unsupported {
            resource: "classes",
            operation: "toggle"
        }
    );
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_client_pagination_sends_no_page_and_pages_locally() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes")
        .return_ok(Value::Array(classes(1..=23)));
    let coordinator = spawn_collection::<Classes>(&mock);

    let filters = FilterState::new().with_page(3);
    coordinator.fetch(&filters).await.unwrap();
    let selection = coordinator.select(&filters, 10).await.unwrap();

    assert!(mock.requests()[0].query.is_empty());
    assert_eq!(selection.total_pages, 3);
    let visible: Vec<&str> = selection
        .visible_items
        .iter()
        .map(|r| r.id().as_str())
        .collect();
    assert_eq!(visible, vec!["c-21", "c-22", "c-23"]);
}

// --- Debouncer ---

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_search_keystrokes_coalesce_into_one_fetch() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes").return_ok(json!([]));
    mock.expect(Method::Get, "/classes")
        .return_ok(json!([{ "id": "c-1", "name": "Math" }]));
    let coordinator = spawn_collection::<Classes>(&mock);
    let (mut handle, task) = QueryDebouncer::spawn(coordinator.clone(), &SyncSettings::default());

    mock.wait_for_requests(1).await;
    for term in ["m", "ma", "mat", "math"] {
        handle.search(term).await.unwrap();
    }
    mock.wait_for_requests(2).await;
    handle.wait_for_state(DebounceState::Idle).await.unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].query,
        vec![("searchTerm".to_string(), "math".to_string())]
    );
    assert_eq!(handle.filters().search_term(), "math");
    assert_eq!(coordinator.collection().snapshot().await.unwrap().len(), 1);
    mock.verify();

    drop(handle);
    task.await.unwrap();
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_search_waits_for_the_full_window() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes").return_ok(json!([]));
    mock.expect(Method::Get, "/classes").return_ok(json!([]));
    let coordinator = spawn_collection::<Classes>(&mock);
    let (mut handle, _task) = QueryDebouncer::spawn(coordinator, &SyncSettings::default());

    mock.wait_for_requests(1).await;
    handle.wait_for_state(DebounceState::Idle).await.unwrap();

    handle.search("alg").await.unwrap();
    tokio::time::sleep(Duration::from_millis(499)).await;
    assert_eq!(mock.requests().len(), 1);
    assert_eq!(handle.state(), DebounceState::Pending);

    tokio::time::sleep(Duration::from_millis(2)).await;
    mock.wait_for_requests(2).await;
    mock.verify();
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_page_and_filter_changes_fetch_immediately() {
    let mock = MockGateway::new();
    for _ in 0..3 {
        mock.expect(Method::Get, "/enterprises").return_ok(json!({
            "data": [], "currentPage": 1, "totalPages": 4, "totalItems": 40
        }));
    }
    let coordinator = spawn_collection::<Enterprises>(&mock);
    let (handle, _task) = QueryDebouncer::spawn(coordinator, &SyncSettings::default());
    mock.wait_for_requests(1).await;

    let start = Instant::now();
    handle.set_page(3).await.unwrap();
    mock.wait_for_requests(2).await;
    handle
        .set_filter("status", FilterValue::exact("active"))
        .await
        .unwrap();
    mock.wait_for_requests(3).await;
    assert!(start.elapsed() < Duration::from_millis(500));

    let requests = mock.requests();
    assert_eq!(requests[1].query, vec![("page".to_string(), "3".to_string())]);
    assert_eq!(
        requests[2].query,
        vec![
            ("page".to_string(), "1".to_string()),
            ("status".to_string(), "active".to_string())
        ]
    );
    mock.verify();
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_filter_change_supersedes_pending_search() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes").return_ok(json!([]));
    mock.expect(Method::Get, "/classes").return_ok(json!([]));
    let coordinator = spawn_collection::<Classes>(&mock);
    let (mut handle, _task) = QueryDebouncer::spawn(coordinator, &SyncSettings::default());
    mock.wait_for_requests(1).await;

    handle.search("bio").await.unwrap();
    handle
        .set_filter("grade", FilterValue::any_of([7, 8]))
        .await
        .unwrap();
    mock.wait_for_requests(2).await;
    handle.wait_for_state(DebounceState::Idle).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].query,
        vec![
            ("searchTerm".to_string(), "bio".to_string()),
            ("grade".to_string(), "7,8".to_string())
        ]
    );
    mock.verify();
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_client_paginated_page_change_stays_local() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes")
        .return_ok(Value::Array(classes(1..=15)));
    let coordinator = spawn_collection::<Classes>(&mock);
    let (mut handle, _task) = QueryDebouncer::spawn(coordinator.clone(), &SyncSettings::default());
    mock.wait_for_requests(1).await;
    handle.wait_for_state(DebounceState::Idle).await.unwrap();

    handle.set_page(2).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(mock.requests().len(), 1);
    let selection = coordinator.select(&handle.filters(), 10).await.unwrap();
    assert_eq!(selection.total_pages, 2);
    assert_eq!(selection.visible_items.len(), 5);
    mock.verify();
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_search_supersedes_fetch_in_flight() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes")
        .return_ok(Value::Array(classes(1..=3)));
    let slow_refresh = mock.expect(Method::Get, "/classes").defer();
    mock.expect(Method::Get, "/classes")
        .return_ok(json!([{ "id": "c-9", "name": "Math" }]));
    let coordinator = spawn_collection::<Classes>(&mock);
    let (mut handle, task) = QueryDebouncer::spawn(coordinator.clone(), &SyncSettings::default());
    mock.wait_for_requests(1).await;

    handle.refresh().await.unwrap();
    mock.wait_for_requests(2).await;
    handle.search("math").await.unwrap();
    mock.wait_for_requests(3).await;

    slow_refresh.respond_ok(Value::Array(classes(1..=3)));
    handle.wait_for_state(DebounceState::Idle).await.unwrap();

    let store = coordinator.collection().snapshot().await.unwrap();
    assert_eq!(ids(&store), vec!["c-9"]);
    assert_eq!(store.status(), FetchStatus::Succeeded);
    mock.verify();

    drop(handle);
    task.await.unwrap();
}

/// Answers every list request with a single record for the requested page.
struct PageEcho;

#[async_trait]
impl Gateway for PageEcho {
    async fn request(&self, request: GatewayRequest) -> Result<Value, GatewayError> {
        let page: u64 = request
            .query
            .iter()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(1);
        tokio::task::yield_now().await;
        Ok(json!({
            "data": [{ "id": format!("e-{page}"), "name": format!("Page {page}") }],
            "currentPage": page, "totalPages": 5, "totalItems": 5
        }))
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rapid_page_changes_land_on_the_last_page() {
    for _ in 0..50 {
        let (actor, client) = CollectionActor::<Enterprises>::new(32);
        let actor_task = tokio::spawn(actor.run());
        let coordinator = MutationCoordinator::new(Arc::new(PageEcho), client);
        let (mut handle, task) =
            QueryDebouncer::spawn(coordinator.clone(), &SyncSettings::default());
        handle.wait_for_state(DebounceState::Idle).await.unwrap();

        handle.set_page(2).await.unwrap();
        handle.set_page(3).await.unwrap();
        drop(handle);
        task.await.unwrap();

        let store = coordinator.collection().snapshot().await.unwrap();
        assert_eq!(store.pagination().map(|p| p.current_page), Some(3));
        assert_eq!(ids(&store), vec!["e-3"]);
        assert_eq!(store.status(), FetchStatus::Succeeded);

        drop(coordinator);
        actor_task.await.unwrap();
    }
}
