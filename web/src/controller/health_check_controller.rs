use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "SSE Streaming Server";

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthStatus {
    status: String,
    timestamp: String,
    service: String,
}

/// GET the service liveness report
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up and responding to requests", body = HealthStatus),
        (status = 500, description = "Internal Server Error")
    )
)]
pub(crate) async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "healthy".to_string(),
            timestamp: sse::message::iso_timestamp(),
            service: SERVICE_NAME.to_string(),
        }),
    )
}
