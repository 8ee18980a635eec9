//! 健康检查与 metrics 端点

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fittrack_adapter_postgres::check_connection;
use fittrack_telemetry::HealthStatus;
use serde::Serialize;

use super::ApiState;

pub(super) fn routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(render_metrics))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn ready(State(state): State<ApiState>) -> (StatusCode, Json<HealthStatus>) {
    let mut status = HealthStatus::new();

    match &state.pool {
        Some(pool) => match check_connection(pool).await {
            Ok(latency) => status.add_check(
                "postgres",
                true,
                Some(format!("{}ms", latency.as_millis())),
            ),
            Err(e) => status.add_check("postgres", false, Some(e.to_string())),
        },
        None => status.add_check("postgres", false, Some("Not configured".to_string())),
    }

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn render_metrics(State(state): State<ApiState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics disabled").into_response(),
    }
}
