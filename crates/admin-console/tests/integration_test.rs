use admin_console::cli::{self, Command, ResourceKind};
use admin_console::lifecycle::ConsoleSystem;
use admin_console::resources::Roles;
use admin_console::ConsoleError;
use serde_json::json;
use std::time::Duration;
use sync_framework::mock::MockGateway;
use sync_framework::{
    DebounceState, FilterState, GatewayError, Method, MutableResourceClient, RecordId,
    ResourceClient, SyncSettings,
};

fn system_on(mock: &MockGateway) -> ConsoleSystem {
    ConsoleSystem::new(mock.shared(), SyncSettings::default())
}

/// Full end-to-end flow through the CLI layer with all real actors.
#[tokio::test]
async fn test_list_then_delete_through_cli() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/classes").return_ok(json!([
        { "id": "c-1", "name": "Algebra I", "enterprise": { "name": "North High" } },
        { "id": "c-2", "name": "Biology", "enterprise": { "name": "North High" } },
        { "id": "c-3", "name": "Algebra II", "enterprise": { "name": "South High" } }
    ]));
    mock.expect(Method::Delete, "/classes/c-3").return_ok(json!(null));
    let system = system_on(&mock);

    let lines = cli::run(
        &system,
        Command::List {
            resource: ResourceKind::Classes,
            search: "algebra".into(),
            page: 1,
            filters: Vec::new(),
        },
    )
    .await
    .expect("Failed to list classes");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"c-1\""));
    assert!(lines[1].contains("\"c-3\""));
    assert_eq!(
        mock.requests()[0].query,
        vec![("searchTerm".to_string(), "algebra".to_string())]
    );

    let lines = cli::run(
        &system,
        Command::Delete {
            resource: ResourceKind::Classes,
            id: "c-3".into(),
        },
    )
    .await
    .expect("Failed to delete class");
    assert_eq!(lines, vec!["deleted c-3".to_string()]);

    let remaining = system
        .classes
        .select(&FilterState::new(), 10)
        .await
        .expect("Failed to select classes");
    assert_eq!(remaining.visible_items.len(), 2);

    mock.verify();
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_enterprises_use_server_pages() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/enterprises").return_ok(json!({
        "data": [{ "id": 31, "name": "Westfield" }],
        "currentPage": 4, "totalPages": 4, "totalItems": 31
    }));
    let system = system_on(&mock);

    system
        .enterprises
        .fetch_page(4)
        .await
        .expect("Failed to fetch page");
    let selection = system
        .enterprises
        .select(&FilterState::new().with_page(4), 10)
        .await
        .unwrap();

    assert_eq!(selection.total_pages, 4);
    assert_eq!(selection.visible_items[0].id().as_str(), "31");
    assert_eq!(
        mock.requests()[0].query,
        vec![("page".to_string(), "4".to_string())]
    );
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_promo_code_toggle_and_create() {
    let mock = MockGateway::new();
    mock.expect(Method::Post, "/promo-codes")
        .return_ok(json!({ "id": "p-9", "code": "FALL", "isActive": true }));
    mock.expect(Method::Patch, "/promo-codes/p-9/toggle")
        .return_ok(json!({ "message": "toggled" }));
    let system = system_on(&mock);

    let mut payload = serde_json::Map::new();
    payload.insert("code".into(), json!("FALL"));
    system.promo_codes.create(payload).await.unwrap();

    let lines = cli::run(&system, Command::Toggle { id: "p-9".into() })
        .await
        .unwrap();
    assert_eq!(lines, vec!["toggled p-9".to_string()]);

    let store = system.promo_codes.inner().collection().snapshot().await.unwrap();
    let code = store.find(&RecordId::new("p-9")).unwrap();
    assert_eq!(code.get("isActive"), Some(&json!(false)));

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reports_are_read_only() {
    let mock = MockGateway::new();
    let system = system_on(&mock);

    let result = cli::run(
        &system,
        Command::Delete {
            resource: ResourceKind::Reports,
            id: "r-1".into(),
        },
    )
    .await;

    assert!(matches!(result, Err(ConsoleError::Communication(_))));
    assert!(mock.requests().is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_gateway_errors_map_to_console_errors() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/roles")
        .return_err(GatewayError::Unauthorized("jwt expired".into()));
    mock.expect(Method::Get, "/packages/pk-404")
        .return_err(GatewayError::NotFound("package pk-404".into()));
    let system = system_on(&mock);

    let listed = system.roles.fetch(&FilterState::new()).await;
    assert_eq!(listed, Err(ConsoleError::Unauthorized("jwt expired".into())));

    let fetched = system.packages.get(RecordId::new("pk-404")).await;
    assert_eq!(fetched, Err(ConsoleError::NotFound("package pk-404".into())));

    let roles = system.roles.select(&FilterState::new(), 10).await.unwrap();
    assert_eq!(roles.error.as_deref(), Some("Not authorized: jwt expired"));

    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_list_screen_debounces_search() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/packages").return_ok(json!([
        { "id": "pk-1", "name": "Starter" },
        { "id": "pk-2", "name": "Premium" }
    ]));
    mock.expect(Method::Get, "/packages")
        .return_ok(json!([{ "id": "pk-2", "name": "Premium" }]));
    let system = system_on(&mock);

    let (mut list, task) = system.packages.open_list(&system.settings);
    mock.wait_for_requests(1).await;
    list.search("pre").await.unwrap();
    list.search("prem").await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(mock.requests().len(), 1);

    mock.wait_for_requests(2).await;
    list.wait_for_state(DebounceState::Idle).await.unwrap();

    let selection = system.packages.select(&list.filters(), 10).await.unwrap();
    let names: Vec<_> = selection
        .visible_items
        .iter()
        .filter_map(|r| r.get("name").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(names, vec!["Premium"]);

    drop(list);
    task.await.unwrap();
    mock.verify();
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_open_list_screens() {
    let mock = MockGateway::new();
    mock.expect(Method::Get, "/roles")
        .return_ok(json!([{ "id": "r-1", "name": "Admin" }]));
    let system = system_on(&mock);

    let list = system.open_list::<Roles, _>(&system.roles);
    mock.wait_for_requests(1).await;

    tokio::time::timeout(Duration::from_secs(5), system.shutdown())
        .await
        .expect("Shutdown waited on an open list screen")
        .unwrap();
    assert!(list.search("admin").await.is_err());
    mock.verify();
}
