//! Typed payloads for every stream event the service emits.
//!
//! Field names here are the wire contract: they serialize 1:1 into the JSON
//! carried on each frame's `data:` line.

use axum::response::sse::Event;
use chrono::Local;
use log::error;
use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// One event as produced by a stream generator, before wire encoding.
///
/// Serialization is untagged: only the payload fields appear in the JSON
/// body, while the event name travels in the frame's `event:` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Message(SimpleMessage),
    Progress(ProgressUpdate),
    SensorData(SensorReading),
    Typing(TypingIndicator),
    Chat(ChatMessage),
    Log(LogLine),
    Clock(ClockTick),
    Complete(CompletionNotice),
}

impl EventType for StreamEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StreamEvent::Message(_) => "message",
            StreamEvent::Progress(_) => "progress",
            StreamEvent::SensorData(_) => "sensor_data",
            StreamEvent::Typing(_) => "typing",
            // Chat turns reuse the default SSE event type, like plain messages
            StreamEvent::Chat(_) => "message",
            StreamEvent::Log(_) => "log",
            StreamEvent::Clock(_) => "datetime",
            StreamEvent::Complete(_) => "complete",
        }
    }
}

impl StreamEvent {
    /// Wire frame carrying this event's name and JSON payload.
    pub fn to_frame(&self) -> serde_json::Result<Frame> {
        Ok(Frame::new(self.event_type(), serde_json::to_string(self)?))
    }

    /// Convert into an axum SSE event ready to be written to a connection.
    pub fn into_sse_event(self) -> Event {
        match serde_json::to_string(&self) {
            Ok(json) => Event::default().event(self.event_type()).data(json),
            Err(e) => {
                // Payloads are plain structs; this indicates a programming error,
                // but a degraded event keeps the stream alive.
                error!("Failed to serialize SSE payload: {e}");
                Event::default().event(self.event_type())
            }
        }
    }
}

/// ISO-8601 local time with microsecond precision and no UTC offset.
pub fn iso_timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleMessage {
    pub message: String,
    pub timestamp: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Processing,
    AlmostDone,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub percentage: f64,
    pub current_step: u32,
    pub total_steps: u32,
    pub status: ProgressStatus,
    pub message: String,
    pub timestamp: String,
}

impl ProgressUpdate {
    /// Snapshot for one step of a `total_steps`-step job.
    ///
    /// Percentage is rounded to one decimal; status is `completed` on the
    /// final step, `almost_done` strictly past the halfway mark, otherwise
    /// `processing`.
    pub fn at_step(current_step: u32, total_steps: u32) -> Self {
        let percentage = round1(current_step as f64 / total_steps as f64 * 100.0);
        let status = if current_step == total_steps {
            ProgressStatus::Completed
        } else if percentage > 50.0 {
            ProgressStatus::AlmostDone
        } else {
            ProgressStatus::Processing
        };

        Self {
            percentage,
            current_step,
            total_steps,
            status,
            message: format!("Processing step {current_step}/{total_steps}"),
            timestamp: iso_timestamp(),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Unit labels sent alongside each sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorUnits {
    pub temperature: String,
    pub humidity: String,
    pub pressure: String,
}

impl Default for SensorUnits {
    fn default() -> Self {
        Self {
            temperature: "°C".to_string(),
            humidity: "%".to_string(),
            pressure: "hPa".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub timestamp: String,
    pub unit: SensorUnits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingIndicator {
    pub is_typing: bool,
    /// Present only while typing is on ("Bot is typing...")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u32,
    pub text: String,
    pub sender: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Debug,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: String,
    pub line_number: u32,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockTick {
    pub datetime: String,
    pub message: String,
    pub interval: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub message: String,
    /// Only chat completions report how many messages were delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_messages: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_match_wire_contract() {
        let simple = StreamEvent::Message(SimpleMessage {
            message: "hi".to_string(),
            timestamp: iso_timestamp(),
            count: 1,
        });
        assert_eq!(simple.event_type(), "message");

        let chat = StreamEvent::Chat(ChatMessage {
            id: 1,
            text: "hi".to_string(),
            sender: "bot".to_string(),
            timestamp: iso_timestamp(),
        });
        assert_eq!(chat.event_type(), "message");

        let tick = StreamEvent::Clock(ClockTick {
            datetime: iso_timestamp(),
            message: "Current server time".to_string(),
            interval: "30 seconds".to_string(),
        });
        assert_eq!(tick.event_type(), "datetime");
    }

    #[test]
    fn progress_status_thresholds() {
        assert_eq!(
            ProgressUpdate::at_step(0, 20).status,
            ProgressStatus::Processing
        );
        // 50% is not "past the halfway mark"
        assert_eq!(
            ProgressUpdate::at_step(10, 20).status,
            ProgressStatus::Processing
        );
        assert_eq!(
            ProgressUpdate::at_step(11, 20).status,
            ProgressStatus::AlmostDone
        );
        assert_eq!(
            ProgressUpdate::at_step(20, 20).status,
            ProgressStatus::Completed
        );
    }

    #[test]
    fn progress_percentage_rounds_to_one_decimal() {
        // 7/20 = 35.0, 1/3 exercises the rounding path
        assert_eq!(ProgressUpdate::at_step(7, 20).percentage, 35.0);
        assert_eq!(ProgressUpdate::at_step(1, 3).percentage, 33.3);
        assert_eq!(ProgressUpdate::at_step(20, 20).percentage, 100.0);
    }

    #[test]
    fn untagged_serialization_emits_payload_fields_only() {
        let event = StreamEvent::Message(SimpleMessage {
            message: "Simple message #3".to_string(),
            timestamp: "2025-01-01T00:00:00.000000".to_string(),
            count: 3,
        });
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(json["message"], "Simple message #3");
        assert_eq!(json["count"], 3);
        assert!(json.get("type").is_none());
    }

    #[test]
    fn completion_omits_absent_total_messages() {
        let simple_done = StreamEvent::Complete(CompletionNotice {
            message: "Stream completed successfully".to_string(),
            total_messages: None,
        });
        let json = serde_json::to_string(&simple_done).unwrap();
        assert!(!json.contains("total_messages"));

        let chat_done = StreamEvent::Complete(CompletionNotice {
            message: "Chat session completed".to_string(),
            total_messages: Some(5),
        });
        let json = serde_json::to_string(&chat_done).unwrap();
        assert!(json.contains("\"total_messages\":5"));
    }

    #[test]
    fn to_frame_round_trips_through_the_decoder() {
        let event = StreamEvent::Progress(ProgressUpdate::at_step(11, 20));
        let frame = event.to_frame().unwrap();

        let mut decoder = crate::frame::FrameDecoder::new();
        let decoded = decoder.feed(frame.encode().as_bytes());

        assert_eq!(decoded, vec![frame]);
        assert_eq!(decoded[0].event, "progress");
        assert_eq!(
            decoded[0].json().unwrap(),
            serde_json::to_value(&event).unwrap()
        );
    }

    #[test]
    fn log_levels_serialize_uppercase() {
        assert_eq!(
            serde_json::to_string(&LogLevel::Warning).unwrap(),
            "\"WARNING\""
        );
        assert_eq!(serde_json::to_string(&LogLevel::Debug).unwrap(), "\"DEBUG\"");
    }

    #[test]
    fn timestamps_are_iso_8601_local() {
        let stamp = iso_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    }
}
