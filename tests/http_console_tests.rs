use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use model_console::session::{FileTokenStore, MemoryTokenStore, TokenStore};
use model_console::widget::WidgetValue;
use model_console::{ConsoleOptions, Error, ModelConsole, Screen};

async fn mount_introspect(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/admin/introspect"))
        .and(header("x-admin-token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{
                "name": "Post",
                "scalarFields": [
                    { "name": "id", "type": "Int" },
                    { "name": "title", "type": "String" },
                    { "name": "published", "type": "Boolean" }
                ]
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_first_page(server: &MockServer, items: serde_json::Value, total: usize) {
    Mock::given(method("GET"))
        .and(path("/api/admin/records"))
        .and(query_param("model", "Post"))
        .and(query_param("skip", "0"))
        .and(query_param("take", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": items,
            "total": total,
            "idFieldName": "id",
            "scalarFields": ["id", "title", "published"]
        })))
        .mount(server)
        .await;
}

fn console_for(server: &MockServer, store: Arc<dyn TokenStore>) -> ModelConsole {
    let options = ConsoleOptions::default().with_base_url(&server.uri());
    ModelConsole::with_store(&options, store).unwrap()
}

#[tokio::test]
async fn test_connect_and_create_over_http() {
    let server = MockServer::start().await;
    mount_introspect(&server).await;
    mount_first_page(&server, json!([{ "id": 1, "title": "Hello", "published": false }]), 1).await;

    Mock::given(method("POST"))
        .and(path("/api/admin/records"))
        .and(header("x-admin-token", "abc123"))
        .and(body_json(json!({
            "model": "Post",
            "data": { "title": "Second", "published": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "title": "Second", "published": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let console = console_for(&server, Arc::new(MemoryTokenStore::with_token("abc123")));
    console.connect().await.unwrap();

    let view = console.view().await;
    assert!(view.connected);
    assert_eq!(view.selected_model.as_deref(), Some("Post"));
    assert_eq!(view.pagination.range_label(), "showing 1–1 of 1");

    console
        .set_field("title", WidgetValue::Text("Second".to_string()))
        .await
        .unwrap();
    console
        .set_field("published", WidgetValue::Checked(true))
        .await
        .unwrap();
    let saved = console.save().await.unwrap();

    assert_eq!(saved["id"], 2);
    assert!(console.view().await.draft.is_empty());
}

#[tokio::test]
async fn test_server_error_message_reaches_view() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/introspect"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .mount(&server)
        .await;

    let console = console_for(&server, Arc::new(MemoryTokenStore::with_token("stale")));
    let err = console.connect().await.unwrap_err();

    assert!(matches!(
        err,
        Error::RequestFailed {
            status: Some(401),
            ..
        }
    ));
    let view = console.view().await;
    assert!(!view.connected);
    assert_eq!(view.last_error.as_deref(), Some("Unauthorized"));
}

#[tokio::test]
async fn test_plain_failure_falls_back_to_status() {
    let server = MockServer::start().await;
    mount_introspect(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/admin/records"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let console = console_for(&server, Arc::new(MemoryTokenStore::with_token("abc123")));

    assert!(console.connect().await.is_err());
    assert_eq!(
        console.view().await.last_error.as_deref(),
        Some("Request failed (500)")
    );
}

#[tokio::test]
async fn test_token_file_survives_restart() {
    let server = MockServer::start().await;
    mount_introspect(&server).await;
    mount_first_page(&server, json!([]), 0).await;

    let dir = tempdir().unwrap();
    let token_file = dir.path().join("session.json");

    let console = console_for(&server, Arc::new(FileTokenStore::new(&token_file)));
    assert_eq!(console.screen().await, Screen::Login);
    console.save_token("abc123").await.unwrap();

    let restarted = console_for(&server, Arc::new(FileTokenStore::new(&token_file)));
    restarted.connect().await.unwrap();
    assert!(matches!(restarted.screen().await, Screen::Console(view) if view.connected));

    restarted.sign_out().await.unwrap();
    let after_sign_out = console_for(&server, Arc::new(FileTokenStore::new(&token_file)));
    assert_eq!(after_sign_out.screen().await, Screen::Login);
}
