//! SSE wire framing: the `event:`/`data:` encoder and its incremental
//! decoder counterpart.
//!
//! The decoder intentionally implements the simplified framing this service
//! actually uses - an `event:` line paired with the `data:` line that follows
//! it - while tolerating everything else the full SSE grammar allows on the
//! wire (blank-line block separators, `:` comments used as keep-alives,
//! unknown fields like `id:` or `retry:`). A frame is complete as soon as its
//! `data:` line arrives.

/// Default event type per the SSE spec when no `event:` field is present.
const DEFAULT_EVENT: &str = "message";

/// One SSE frame: an event name plus its raw data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }

    /// Serialize to wire form: `event: <name>\ndata: <payload>\n\n`.
    pub fn encode(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event, self.data)
    }

    /// Parse the data payload as JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.data)
    }
}

/// Incremental decoder fed with raw body chunks.
///
/// Chunk boundaries need not align with line boundaries; a partial trailing
/// line is buffered until the rest arrives. Undecodable input is skipped,
/// never fatal.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    pending_event: Option<String>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning every frame completed by it.
    ///
    /// Only complete lines are converted to text, so a multi-byte character
    /// split across chunks survives intact; a line with invalid UTF-8 is
    /// replaced rather than treated as an error.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(frame) = self.push_line(line.trim_end_matches(['\r', '\n'])) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Process one complete line; returns a frame when a `data:` line closes
    /// the pending block.
    fn push_line(&mut self, line: &str) -> Option<Frame> {
        if line.is_empty() {
            // Block separator in the full grammar. An `event:` line whose
            // `data:` never arrived has nothing to dispatch.
            self.pending_event = None;
            return None;
        }
        if line.starts_with(':') {
            // Comment, typically a keep-alive
            return None;
        }
        if let Some(name) = field_value(line, "event") {
            self.pending_event = Some(name.to_string());
            return None;
        }
        if let Some(data) = field_value(line, "data") {
            let event = self
                .pending_event
                .take()
                .unwrap_or_else(|| DEFAULT_EVENT.to_string());
            return Some(Frame::new(event, data));
        }
        // Unknown field (id:, retry:, ...) - skip and keep reading
        None
    }
}

/// Split a `field: value` line, tolerating the optional space after the colon.
fn field_value<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_exact_wire_form() {
        let frame = Frame::new("progress", r#"{"percentage":55.0}"#);
        assert_eq!(
            frame.encode(),
            "event: progress\ndata: {\"percentage\":55.0}\n\n"
        );
    }

    #[test]
    fn encode_then_decode_round_trips() {
        let frame = Frame::new("sensor_data", r#"{"temperature":23.5,"humidity":61.2}"#);
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.feed(frame.encode().as_bytes());
        assert_eq!(decoded, vec![frame]);
    }

    #[test]
    fn data_without_event_line_gets_default_type() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"data: {\"count\":1}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn partial_lines_buffer_across_chunks() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"event: lo").is_empty());
        assert!(decoder.feed(b"g\ndata: {\"line_num").is_empty());
        let frames = decoder.feed(b"ber\":7}\n\n");
        assert_eq!(frames, vec![Frame::new("log", r#"{"line_number":7}"#)]);
    }

    #[test]
    fn multibyte_characters_survive_chunk_splits() {
        let wire = "event: sensor_data\ndata: {\"unit\":\"°C\"}\n\n".as_bytes();
        // Split inside the two-byte encoding of the degree sign
        let split = wire.iter().position(|&byte| byte == 0xC2).unwrap() + 1;

        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(&wire[..split]).is_empty());
        let frames = decoder.feed(&wire[split..]);
        assert_eq!(frames, vec![Frame::new("sensor_data", "{\"unit\":\"°C\"}")]);
    }

    #[test]
    fn comments_and_unknown_fields_are_skipped() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b": keep-alive\nid: 42\nevent: datetime\ndata: {}\n\n");
        assert_eq!(frames, vec![Frame::new("datetime", "{}")]);
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"event: message\r\ndata: {\"count\":2}\r\n\r\n");
        assert_eq!(frames, vec![Frame::new("message", r#"{"count":2}"#)]);
    }

    #[test]
    fn blank_separated_blocks_decode_independently() {
        let mut decoder = FrameDecoder::new();
        let wire = "event: typing\ndata: {\"is_typing\":true}\n\nevent: message\ndata: {\"id\":1}\n\n";
        let frames = decoder.feed(wire.as_bytes());
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].event, "typing");
        assert_eq!(frames[1].event, "message");
    }

    #[test]
    fn orphan_event_line_does_not_leak_into_next_block() {
        let mut decoder = FrameDecoder::new();
        // An event: line terminated by a blank line carries no data; the
        // following bare data: line must fall back to the default type.
        let frames = decoder.feed(b"event: progress\n\ndata: {\"count\":3}\n\n");
        assert_eq!(frames, vec![Frame::new("message", r#"{"count":3}"#)]);
    }

    #[test]
    fn json_accessor_parses_payload() {
        let frame = Frame::new("log", r#"{"level":"INFO","line_number":1}"#);
        let value = frame.json().unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["line_number"], 1);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"\xFF\xFEgarbage\nevent: log\ndata: {\"count\":9}\n\n");
        assert_eq!(frames, vec![Frame::new("log", r#"{"count":9}"#)]);
    }
}
