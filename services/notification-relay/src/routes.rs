use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use fms_utils::ServerConfig;

use crate::response::{ApiError, ApiResponse, MaintenanceSubmission};
use crate::service::NotificationDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<NotificationDispatcher>,
}

pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .route("/send-email", post(send_email))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(config.max_request_size)),
        )
        .with_state(state)
}

async fn welcome() -> Json<ApiResponse> {
    Json(ApiResponse::success("Welcome To FMS API"))
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, health, database) = match state.dispatcher.check_store().await {
        Ok(()) => (StatusCode::OK, "healthy", "up"),
        Err(error) => {
            warn!(error = %error, "Document store ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    };

    (
        status,
        Json(json!({
            "status": health,
            "service": "notification-relay",
            "database": database,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

async fn send_email(
    State(state): State<AppState>,
    MaintenanceSubmission(payload): MaintenanceSubmission,
) -> Result<Json<ApiResponse>, ApiError> {
    state.dispatcher.submit(payload).await?;

    Ok(Json(ApiResponse::success("Email has been sent")))
}
