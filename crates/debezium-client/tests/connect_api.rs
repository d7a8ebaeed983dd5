//! End-to-end tests against an in-process fake Connect server.

use axum::{
    extract::{Path, Query},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use debezium_client::{
    CallContext, CancellationToken, ConnectorConfig, CreateConnectorRequest, DebeziumClient,
    Error, ErrorKind, RunState, TransportError,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

fn connect_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"error_code": status.as_u16(), "message": message})),
    )
        .into_response()
}

fn connector_json(name: &str) -> Value {
    json!({
        "name": name,
        "config": {"connector.class": "io.debezium.connector.postgresql.PostgresConnector", "name": name},
        "tasks": [{"connector": name, "task": 0}],
        "type": "source"
    })
}

fn status_json(name: &str, state: &str) -> Value {
    json!({
        "name": name,
        "connector": {"state": state, "worker_id": "worker-1:8083"},
        "tasks": [{"id": 0, "state": state, "worker_id": "worker-1:8083"}],
        "type": "source"
    })
}

async fn list(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("expand").map(String::as_str) == Some("status") {
        Json(json!({
            "pg-conn": status_json("pg-conn", "RUNNING"),
            "mysql-conn": status_json("mysql-conn", "PAUSED"),
        }))
        .into_response()
    } else {
        Json(json!(["pg-conn", "mysql-conn"])).into_response()
    }
}

async fn create(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) != Some("application/json") {
        return connect_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected JSON");
    }
    let name = body["name"].as_str().unwrap_or_default();
    if name == "pg-conn" {
        return connect_error(StatusCode::CONFLICT, "Connector pg-conn already exists");
    }
    let response = json!({
        "name": name,
        "config": body["config"],
        "tasks": [],
        "type": "source"
    });
    (StatusCode::CREATED, Json(response)).into_response()
}

async fn fetch(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "missing" => connect_error(StatusCode::NOT_FOUND, "Connector missing not found"),
        "garbage" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(connector_json(&name)).into_response()
        }
        _ => Json(connector_json(&name)).into_response(),
    }
}

async fn remove(Path(name): Path<String>) -> Response {
    if name == "missing" {
        return connect_error(StatusCode::NOT_FOUND, "no such connector");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn status(Path(name): Path<String>) -> Response {
    Json(status_json(&name, "RUNNING")).into_response()
}

async fn pause(Path(_name): Path<String>) -> StatusCode {
    StatusCode::ACCEPTED
}

async fn restart_task(Path((name, task)): Path<(String, i32)>) -> Response {
    if task == 0 {
        StatusCode::NO_CONTENT.into_response()
    } else {
        connect_error(
            StatusCode::NOT_FOUND,
            &format!("Task {}-{} not found", name, task),
        )
    }
}

async fn spawn_connect() -> String {
    let app = Router::new()
        .route("/connectors", get(list).post(create))
        .route("/connectors/{name}", get(fetch).delete(remove))
        .route("/connectors/{name}/status", get(status))
        .route("/connectors/{name}/pause", put(pause))
        .route("/connectors/{name}/tasks/{task}/restart", post(restart_task));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Trailing slash on purpose: the client must strip it.
    format!("http://{}/", addr)
}

async fn client() -> DebeziumClient {
    let base_url = spawn_connect().await;
    DebeziumClient::new(&base_url, Duration::from_secs(10)).unwrap()
}

#[tokio::test]
async fn test_create_and_conflict() {
    let client = client().await;
    let ctx = CallContext::background();

    let config = ConnectorConfig::new("io.debezium.connector.postgresql.PostgresConnector")
        .with_tasks_max(1)
        .with("topic.prefix", "inventory");
    let created = client
        .create_connector(&ctx, &CreateConnectorRequest::new("inventory", config))
        .await
        .unwrap();
    assert_eq!(created.name, "inventory");
    assert_eq!(created.config.get("topic.prefix"), Some("inventory"));

    let err = client
        .create_connector(
            &ctx,
            &CreateConnectorRequest::new("pg-conn", ConnectorConfig::new("X")),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.to_string(), "CreateConnector: Connector pg-conn already exists");
}

#[tokio::test]
async fn test_get_delete_and_errors() {
    let client = client().await;
    let ctx = CallContext::background();

    let info = client.get_connector(&ctx, "pg-conn").await.unwrap();
    assert_eq!(info.config_str("name"), Some("pg-conn"));

    let err = client.get_connector(&ctx, "missing").await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.get_connector(&ctx, "garbage").await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));

    client.delete_connector(&ctx, "pg-conn").await.unwrap();
    let err = client.delete_connector(&ctx, "missing").await.unwrap_err();
    assert!(err.to_string().contains("no such connector"));
}

#[tokio::test]
async fn test_names_are_path_escaped() {
    let client = client().await;

    let info = client
        .get_connector(&CallContext::background(), "team/a b")
        .await
        .unwrap();
    assert_eq!(info.name, "team/a b");
}

#[tokio::test]
async fn test_status_pause_and_task_restart() {
    let client = client().await;
    let ctx = CallContext::background();

    let status = client.get_connector_status(&ctx, "pg-conn").await.unwrap();
    assert_eq!(status.state(), RunState::Running);

    client.pause_connector(&ctx, "pg-conn").await.unwrap();
    client.pause_connector(&ctx, "pg-conn").await.unwrap();

    client.restart_connector_task(&ctx, "pg-conn", 0).await.unwrap();
    let err = client
        .restart_connector_task(&ctx, "pg-conn", 9)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "RestartConnectorTask: Task pg-conn-9 not found");
}

#[tokio::test]
async fn test_list_connectors() {
    let client = client().await;
    let ctx = CallContext::background();

    let plain = client.list_connectors(&ctx, false).await.unwrap();
    assert_eq!(plain.names(), ["pg-conn".to_string(), "mysql-conn".to_string()]);
    assert!(plain.statuses().is_empty());

    let expanded = client.list_connectors(&ctx, true).await.unwrap();
    assert_eq!(expanded.len(), 2);
    let mut names = expanded.names().to_vec();
    names.sort();
    let mut keys: Vec<String> = expanded.statuses().keys().cloned().collect();
    keys.sort();
    assert_eq!(names, keys);
    assert_eq!(
        expanded.status("mysql-conn").unwrap().state(),
        RunState::Paused
    );
}

#[tokio::test]
async fn test_call_deadline() {
    let client = client().await;

    let ctx = CallContext::with_timeout(Duration::from_millis(100));
    let err = client.get_connector(&ctx, "slow").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_client_timeout() {
    let base_url = spawn_connect().await;
    let client = DebeziumClient::new(&base_url, Duration::from_millis(100)).unwrap();

    let err = client
        .get_connector(&CallContext::background(), "slow")
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "{:?}", err);
}

#[tokio::test]
async fn test_cancellation() {
    let client = client().await;
    let token = CancellationToken::new();
    let ctx = CallContext::with_cancellation(token.clone());

    let call = tokio::spawn(async move { client.get_connector(&ctx, "slow").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let err = call.await.unwrap().unwrap_err();
    assert!(matches!(
        err,
        Error::Transport {
            source: TransportError::Cancelled,
            ..
        }
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DebeziumClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = client
        .list_connectors(&CallContext::background(), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
