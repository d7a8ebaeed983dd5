use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    Json,
};
use debezium_client::{
    ConnectorConfig, ConnectorInfo, ConnectorList, ConnectorStatus, CreateConnectorRequest,
    CreatedConnector, TaskInfo,
};
use serde::Deserialize;
use tracing::info;

use crate::{handlers::AppState, ApiResponse};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Only `status` is understood
    pub expand: Option<String>,
}

pub async fn list_connectors(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResponse<ConnectorList> {
    let expand_status = match params.expand.as_deref() {
        None => false,
        Some("status") => true,
        Some(other) => {
            return ApiResponse::bad_request(format!("Unsupported expand value '{}'", other))
        }
    };

    match state
        .client
        .list_connectors(&state.call_context(), expand_status)
        .await
    {
        Ok(list) => ApiResponse::success(list, "Connectors retrieved successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn create_connector(
    State(state): State<AppState>,
    body: Result<Json<CreateConnectorRequest>, JsonRejection>,
) -> ApiResponse<CreatedConnector> {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return ApiResponse::bad_request(rejection.body_text()),
    };

    match state
        .client
        .create_connector(&state.call_context(), &request)
        .await
    {
        Ok(created) => {
            info!(connector = %created.name, "Connector created");
            ApiResponse::created(created, "Connector created successfully")
        }
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn get_connector(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResponse<ConnectorInfo> {
    match state.client.get_connector(&state.call_context(), &name).await {
        Ok(connector) => ApiResponse::success(connector, "Connector retrieved successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn delete_connector(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResponse<()> {
    match state
        .client
        .delete_connector(&state.call_context(), &name)
        .await
    {
        Ok(()) => {
            info!(connector = %name, "Connector deleted");
            ApiResponse::<()>::success_no_data("Connector deleted successfully")
        }
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn get_connector_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResponse<ConnectorStatus> {
    match state
        .client
        .get_connector_status(&state.call_context(), &name)
        .await
    {
        Ok(status) => ApiResponse::success(status, "Connector status retrieved successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn update_connector_config(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<ConnectorConfig>, JsonRejection>,
) -> ApiResponse<ConnectorInfo> {
    let Json(config) = match body {
        Ok(body) => body,
        Err(rejection) => return ApiResponse::bad_request(rejection.body_text()),
    };

    match state
        .client
        .update_connector_config(&state.call_context(), &name, &config)
        .await
    {
        Ok(connector) => {
            info!(connector = %name, "Connector config updated");
            ApiResponse::success(connector, "Connector config updated successfully")
        }
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn pause_connector(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResponse<()> {
    match state
        .client
        .pause_connector(&state.call_context(), &name)
        .await
    {
        Ok(()) => ApiResponse::<()>::success_no_data("Connector paused successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn resume_connector(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResponse<()> {
    match state
        .client
        .resume_connector(&state.call_context(), &name)
        .await
    {
        Ok(()) => ApiResponse::<()>::success_no_data("Connector resumed successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn restart_connector(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResponse<()> {
    match state
        .client
        .restart_connector(&state.call_context(), &name)
        .await
    {
        Ok(()) => ApiResponse::<()>::success_no_data("Connector restarted successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResponse<Vec<TaskInfo>> {
    match state
        .client
        .get_connector_tasks(&state.call_context(), &name)
        .await
    {
        Ok(tasks) => ApiResponse::success(tasks, "Tasks retrieved successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}

pub async fn restart_task(
    State(state): State<AppState>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> ApiResponse<()> {
    let Path((name, task)) = match path {
        Ok(path) => path,
        Err(rejection) => return ApiResponse::bad_request(rejection.body_text()),
    };

    match state
        .client
        .restart_connector_task(&state.call_context(), &name, task)
        .await
    {
        Ok(()) => ApiResponse::<()>::success_no_data("Task restarted successfully"),
        Err(e) => ApiResponse::from_client_error(&e),
    }
}
