//! Server-Sent Events (SSE) building blocks for the streaming demo service.
//!
//! This crate owns everything that touches the SSE protocol itself, so the
//! web layer stays a thin routing shell and the test client decodes frames
//! with the exact counterpart of the encoder that produced them.
//!
//! # Architecture
//!
//! - **Typed payloads**: every stream emits strongly typed payload structs
//!   ([`message`]); the SSE event name is derived from the payload type via
//!   the [`message::EventType`] trait, never spelled inline at emit sites.
//! - **One generator per stream**: each endpoint is backed by a lazy
//!   [`producer`] that sleeps its fixed per-step delay and yields the next
//!   event. Producers own no resources beyond the pending timer, so dropping
//!   the stream on client disconnect cancels the remaining production.
//! - **Shared wire framing**: [`frame`] holds the `event:`/`data:` encoder
//!   and the incremental decoder. Server and consumer round-trip through the
//!   same module, so an encoded event always decodes back to its event name
//!   and payload.
//! - **Injectable randomness**: the two randomized producers take the RNG as
//!   a parameter; production passes an entropy-seeded generator, tests pass
//!   a fixed seed.
//!
//! # Modules
//!
//! - `frame`: wire-level `Frame` encoding and the chunk-fed `FrameDecoder`
//! - `message`: payload types, event-name mapping, timestamp formatting
//! - `producer`: the six timed generators behind the `/stream/*` endpoints

pub mod frame;
pub mod message;
pub mod producer;

pub use frame::{Frame, FrameDecoder};
pub use message::{EventType, StreamEvent};
