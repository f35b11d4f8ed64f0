use anyhow::{bail, Result};
use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use log::*;
use serde_json::Value;
use sse::FrameDecoder;
use std::collections::VecDeque;

/// One decoded SSE event: its type name and parsed JSON payload.
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub event_type: String,
    pub data: Value,
}

/// An open SSE connection being decoded incrementally.
pub struct EventStream {
    bytes: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: FrameDecoder,
    ready: VecDeque<EventRecord>,
}

impl EventStream {
    /// Open `base_url + path` as a streaming GET. A non-200 status is a
    /// failure; there is no retry or reconnect.
    pub async fn open(client: &reqwest::Client, base_url: &str, path: &str) -> Result<Self> {
        let url = format!("{base_url}{path}");
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            bail!("{url} returned HTTP {}", response.status());
        }

        Ok(Self {
            bytes: response.bytes_stream().boxed(),
            decoder: FrameDecoder::new(),
            ready: VecDeque::new(),
        })
    }

    /// Next decoded event, or `None` once the server closes the stream.
    ///
    /// Frames whose payload is not valid JSON are skipped rather than
    /// surfaced as errors; a mid-stream transport error ends the stream the
    /// same way a close does.
    pub async fn next_event(&mut self) -> Option<EventRecord> {
        loop {
            if let Some(record) = self.ready.pop_front() {
                return Some(record);
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => {
                    for frame in self.decoder.feed(&chunk) {
                        match frame.json() {
                            Ok(data) => self.ready.push_back(EventRecord {
                                event_type: frame.event,
                                data,
                            }),
                            Err(e) => debug!("Skipping frame with undecodable payload: {e}"),
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!("SSE stream error, treating as end of stream: {e}");
                    return None;
                }
                None => return None,
            }
        }
    }
}
