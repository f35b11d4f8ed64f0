//! HTTP surface of the SSE streaming demo: the axum router, the six stream
//! controllers, and the health check.

pub mod controller;
pub mod router;

pub use service::AppState;
