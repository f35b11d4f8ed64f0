//! Controllers for the six `/stream/*` SSE endpoints.
//!
//! Each handler wires a [`sse::producer`] generator into an axum `Sse`
//! response. The connection pulls events one at a time; when the client
//! disconnects, axum drops the stream and the producer's pending timer with
//! it, so no production continues past the connection's lifetime.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sse::producer;
use sse::StreamEvent;
use std::convert::Infallible;

/// GET a finite counted message stream
#[utoipa::path(
    get,
    path = "/stream/simple",
    responses(
        (status = 200, description = "Ten counted messages followed by a complete event", body = String, content_type = "text/event-stream")
    )
)]
pub(crate) async fn simple() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing simple SSE stream");
    sse_response(producer::simple())
}

/// GET a progress simulation stream
#[utoipa::path(
    get,
    path = "/stream/progress",
    responses(
        (status = 200, description = "Percentage updates from 0 to 100", body = String, content_type = "text/event-stream")
    )
)]
pub(crate) async fn progress() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing progress SSE stream");
    sse_response(producer::progress())
}

/// GET a randomized sensor reading stream
#[utoipa::path(
    get,
    path = "/stream/realtime",
    responses(
        (status = 200, description = "Thirty randomized sensor readings", body = String, content_type = "text/event-stream")
    )
)]
pub(crate) async fn realtime() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing realtime SSE stream");
    sse_response(producer::realtime(StdRng::from_entropy()))
}

/// GET a scripted chat stream with typing indicators
#[utoipa::path(
    get,
    path = "/stream/chat",
    responses(
        (status = 200, description = "Five scripted chat turns with typing indicators", body = String, content_type = "text/event-stream")
    )
)]
pub(crate) async fn chat() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing chat SSE stream");
    sse_response(producer::chat())
}

/// GET a randomized log line stream
#[utoipa::path(
    get,
    path = "/stream/logs",
    responses(
        (status = 200, description = "Fifteen randomized log lines", body = String, content_type = "text/event-stream")
    )
)]
pub(crate) async fn logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing logs SSE stream");
    sse_response(producer::logs(StdRng::from_entropy()))
}

/// GET an unbounded server-time stream
#[utoipa::path(
    get,
    path = "/stream/datetime",
    responses(
        (status = 200, description = "Server time every thirty seconds until the client disconnects", body = String, content_type = "text/event-stream")
    )
)]
pub(crate) async fn datetime() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing datetime SSE stream");
    sse_response(producer::clock())
}

/// Wrap a producer into an SSE response with keep-alive comments, so idle
/// gaps (the 30-second datetime interval in particular) don't look like a
/// dead connection to proxies.
fn sse_response<S>(events: S) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: Stream<Item = StreamEvent> + Send + 'static,
{
    Sse::new(events.map(|event| Ok(event.into_sse_event()))).keep_alive(KeepAlive::default())
}
