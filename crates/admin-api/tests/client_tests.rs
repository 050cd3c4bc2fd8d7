use model_console_api::{AdminApiError, AdminClient, FieldKind, ListQuery, Record};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup_client(server_uri: &str) -> AdminClient {
    AdminClient::new(server_uri, reqwest::Client::new())
}

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_introspect() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/introspect"))
        .and(header("x-admin-token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "User",
                    "scalarFields": [
                        { "name": "id", "type": "Int" },
                        { "name": "email", "type": "String" },
                        { "name": "profile", "type": "Json" }
                    ]
                },
                { "name": "Order", "scalarFields": [] }
            ]
        })))
        .mount(&server)
        .await;

    let models = setup_client(&server.uri()).introspect("abc123").await.unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "User");
    assert_eq!(models[0].kind_of("profile"), FieldKind::Json);
    assert_eq!(models[1].name, "Order");
}

#[tokio::test]
async fn test_list_records_sends_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/records"))
        .and(query_param("model", "User"))
        .and(query_param("skip", "50"))
        .and(query_param("take", "50"))
        .and(header("x-admin-token", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": 51, "email": "x@example.com" }],
            "total": 51,
            "idFieldName": "id",
            "scalarFields": ["id", "email"]
        })))
        .mount(&server)
        .await;

    let page = setup_client(&server.uri())
        .list_records("abc123", &ListQuery::new("User", 50, 50))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 51);
    assert_eq!(page.id_field_name, "id");
    assert_eq!(page.scalar_fields, vec!["id", "email"]);
}

#[tokio::test]
async fn test_list_records_rejects_zero_take() {
    let client = setup_client("http://127.0.0.1:9");
    let result = client
        .list_records("abc123", &ListQuery::new("User", 0, 0))
        .await;

    assert!(matches!(result, Err(AdminApiError::InvalidParameters(_))));
}

#[tokio::test]
async fn test_mutations_send_expected_bodies() {
    let server = MockServer::start().await;
    let data = record(json!({ "name": "x" }));

    Mock::given(method("POST"))
        .and(path("/api/admin/records"))
        .and(body_json(json!({ "model": "User", "data": { "name": "x" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "name": "x" })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/records"))
        .and(body_json(json!({ "model": "User", "id": 7, "data": { "name": "x" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "name": "x" })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/records"))
        .and(body_json(json!({ "model": "User", "id": 7 })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = setup_client(&server.uri());

    let created = client.create_record("abc123", "User", &data).await.unwrap();
    assert_eq!(created["id"], 7);

    let updated = client
        .update_record("abc123", "User", &json!(7), &data)
        .await
        .unwrap();
    assert_eq!(updated["name"], "x");

    let deleted = client.delete_record("abc123", "User", &json!(7)).await.unwrap();
    assert!(deleted.is_null());
}

#[tokio::test]
async fn test_error_body_conventions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/introspect"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/records"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = setup_client(&server.uri());

    match client.introspect("wrong").await {
        Err(AdminApiError::RequestFailed { status, message }) => {
            assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }

    match client
        .list_records("wrong", &ListQuery::new("User", 0, 20))
        .await
    {
        Err(AdminApiError::RequestFailed { status, message }) => {
            assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
            assert_eq!(message, "Request failed (502)");
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_custom_paths_and_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/schema"))
        .and(header("x-console-key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .mount(&server)
        .await;

    let client = setup_client(&format!("{}/", server.uri()))
        .with_paths("/admin/schema", "/admin/rows")
        .with_token_header("x-console-key");

    let models = client.introspect("k").await.unwrap();
    assert!(models.is_empty());
}
