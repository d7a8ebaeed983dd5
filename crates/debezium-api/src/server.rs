use crate::handlers::{connectors, health_check, AppState};
use crate::request_id::request_id;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    host: String,
    port: u16,
    cors_enabled: bool,
    state: AppState,
}

impl ApiServer {
    pub fn new(host: String, port: u16, cors_enabled: bool, state: AppState) -> Self {
        Self {
            host,
            port,
            cors_enabled,
            state,
        }
    }

    pub fn router(&self) -> Router {
        let mut app = Router::new()
            .route("/health", get(health_check))
            // Connector lifecycle
            .route(
                "/api/connectors",
                get(connectors::list_connectors).post(connectors::create_connector),
            )
            .route(
                "/api/connectors/{name}",
                get(connectors::get_connector).delete(connectors::delete_connector),
            )
            // Runtime control
            .route(
                "/api/connectors/{name}/status",
                get(connectors::get_connector_status),
            )
            .route(
                "/api/connectors/{name}/pause",
                put(connectors::pause_connector),
            )
            .route(
                "/api/connectors/{name}/resume",
                put(connectors::resume_connector),
            )
            .route(
                "/api/connectors/{name}/restart",
                post(connectors::restart_connector),
            )
            // Config
            .route(
                "/api/connectors/{name}/config",
                put(connectors::update_connector_config),
            )
            // Tasks
            .route("/api/connectors/{name}/tasks", get(connectors::list_tasks))
            .route(
                "/api/connectors/{name}/tasks/{task}/restart",
                post(connectors::restart_task),
            )
            .with_state(self.state.clone());

        if self.cors_enabled {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);

            app = app.layer(cors);
        }

        app.layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(request_id))
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("{}:{}", self.host, self.port);
        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
