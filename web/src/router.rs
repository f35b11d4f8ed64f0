use crate::controller::{health_check_controller, stream_controller};
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use service::AppState;
use tower_http::cors::CorsLayer;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "SSE Streaming Example API"
        ),
        paths(
            stream_controller::simple,
            stream_controller::progress,
            stream_controller::realtime,
            stream_controller::chat,
            stream_controller::logs,
            stream_controller::datetime,
            health_check_controller::health_check,
        ),
        components(
            schemas(health_check_controller::HealthStatus)
        ),
        tags(
            (name = "sse_streaming", description = "Server-Sent Events streaming examples")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(stream_routes())
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(cors_layer(&app_state))
}

fn stream_routes() -> Router {
    Router::new()
        .route("/stream/simple", get(stream_controller::simple))
        .route("/stream/progress", get(stream_controller::progress))
        .route("/stream/realtime", get(stream_controller::realtime))
        .route("/stream/chat", get(stream_controller::chat))
        .route("/stream/logs", get(stream_controller::logs))
        .route("/stream/datetime", get(stream_controller::datetime))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
}
