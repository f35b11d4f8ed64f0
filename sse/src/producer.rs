//! Timed event generators, one per `/stream/*` endpoint.
//!
//! Every producer is a lazy `async_stream` generator that sleeps its fixed
//! per-step delay, then yields the next [`StreamEvent`]. The host connection
//! pulls one event at a time, so nothing is buffered ahead of the consumer.
//! Producers own no resources beyond the pending `tokio::time::sleep`:
//! dropping the stream (the client disconnected) cancels the timer and
//! abandons the remaining items.
//!
//! The unbounded [`clock`] stream has no server-side bound and is reclaimed
//! only when the consumer disconnects.

use async_stream::stream;
use futures::Stream;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::message::{
    iso_timestamp, ChatMessage, ClockTick, CompletionNotice, LogLevel, LogLine, ProgressUpdate,
    SensorReading, SensorUnits, SimpleMessage, StreamEvent, TypingIndicator,
};

/// Messages emitted by [`simple`] before its completion event.
pub const SIMPLE_MESSAGE_COUNT: u32 = 10;
pub const SIMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Steps in the [`progress`] simulation; the stream emits `0..=TOTAL` events.
pub const PROGRESS_TOTAL_STEPS: u32 = 20;
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Sensor readings emitted by [`realtime`].
pub const SENSOR_READING_COUNT: u32 = 30;
pub const SENSOR_INTERVAL: Duration = Duration::from_secs(1);

/// Pause between a typing indicator and the chat message it announces.
pub const CHAT_TYPING_DELAY: Duration = Duration::from_secs(2);
/// Pause after a chat turn before the next typing indicator.
pub const CHAT_TURN_DELAY: Duration = Duration::from_secs(1);

/// Log lines emitted by [`logs`].
pub const LOG_LINE_COUNT: u32 = 15;
pub const LOG_INTERVAL: Duration = Duration::from_millis(800);

/// Spacing between [`clock`] ticks.
pub const CLOCK_INTERVAL: Duration = Duration::from_secs(30);

/// Scripted bot replies for the [`chat`] stream.
const CHAT_SCRIPT: [&str; 5] = [
    "Hello! How can I help you today?",
    "I'm here to assist with any questions you might have.",
    "Feel free to ask anything about our services.",
    "I hope you're having a great day!",
    "Is there anything specific you'd like to know?",
];

/// Fixed pool the [`logs`] stream draws messages from.
const LOG_MESSAGES: [&str; 10] = [
    "Application started successfully",
    "Database connection established",
    "User authentication successful",
    "Cache miss - fetching from database",
    "API rate limit approaching",
    "Background task completed",
    "Memory usage: 45%",
    "Network request timeout",
    "Configuration updated",
    "Service health check passed",
];

/// Service name stamped on every emitted log line.
const LOG_SERVICE: &str = "api-server";

/// Ten counted messages at one-second intervals, then a completion event.
pub fn simple() -> impl Stream<Item = StreamEvent> {
    stream! {
        for count in 1..=SIMPLE_MESSAGE_COUNT {
            sleep(SIMPLE_INTERVAL).await;
            yield StreamEvent::Message(SimpleMessage {
                message: format!("Simple message #{count}"),
                timestamp: iso_timestamp(),
                count,
            });
        }

        yield StreamEvent::Complete(CompletionNotice {
            message: "Stream completed successfully".to_string(),
            total_messages: None,
        });
    }
}

/// Progress simulation from 0% to 100% in half-second steps.
pub fn progress() -> impl Stream<Item = StreamEvent> {
    stream! {
        for step in 0..=PROGRESS_TOTAL_STEPS {
            sleep(PROGRESS_INTERVAL).await;
            yield StreamEvent::Progress(ProgressUpdate::at_step(step, PROGRESS_TOTAL_STEPS));
        }
    }
}

/// Thirty randomized sensor readings at one-second intervals.
///
/// The RNG is a parameter so deterministic tests can pass a seeded generator.
pub fn realtime(mut rng: impl Rng + Send) -> impl Stream<Item = StreamEvent> {
    stream! {
        for _ in 0..SENSOR_READING_COUNT {
            sleep(SENSOR_INTERVAL).await;
            yield StreamEvent::SensorData(SensorReading {
                temperature: round2(rng.gen_range(20.0..=30.0)),
                humidity: round2(rng.gen_range(40.0..=80.0)),
                pressure: round2(rng.gen_range(1000.0..=1020.0)),
                timestamp: iso_timestamp(),
                unit: SensorUnits::default(),
            });
        }
    }
}

/// Five scripted chat turns, each a typing-on / message / typing-off triple,
/// closed by a completion event reporting the message total.
pub fn chat() -> impl Stream<Item = StreamEvent> {
    stream! {
        for (index, text) in CHAT_SCRIPT.iter().enumerate() {
            yield StreamEvent::Typing(TypingIndicator {
                is_typing: true,
                message: Some("Bot is typing...".to_string()),
                timestamp: iso_timestamp(),
            });

            sleep(CHAT_TYPING_DELAY).await;

            yield StreamEvent::Chat(ChatMessage {
                id: index as u32 + 1,
                text: (*text).to_string(),
                sender: "bot".to_string(),
                timestamp: iso_timestamp(),
            });

            yield StreamEvent::Typing(TypingIndicator {
                is_typing: false,
                message: None,
                timestamp: iso_timestamp(),
            });

            sleep(CHAT_TURN_DELAY).await;
        }

        yield StreamEvent::Complete(CompletionNotice {
            message: "Chat session completed".to_string(),
            total_messages: Some(CHAT_SCRIPT.len() as u32),
        });
    }
}

/// Fifteen randomized log lines with 1-based line numbers.
pub fn logs(mut rng: impl Rng + Send) -> impl Stream<Item = StreamEvent> {
    stream! {
        for line_number in 1..=LOG_LINE_COUNT {
            sleep(LOG_INTERVAL).await;
            yield StreamEvent::Log(LogLine {
                level: LogLevel::ALL[rng.gen_range(0..LogLevel::ALL.len())],
                message: LOG_MESSAGES[rng.gen_range(0..LOG_MESSAGES.len())].to_string(),
                timestamp: iso_timestamp(),
                line_number,
                service: LOG_SERVICE.to_string(),
            });
        }
    }
}

/// Unbounded clock: a tick immediately on connect, then one every 30 seconds.
/// Terminates only when the consumer disconnects.
pub fn clock() -> impl Stream<Item = StreamEvent> {
    stream! {
        loop {
            yield StreamEvent::Clock(ClockTick {
                datetime: iso_timestamp(),
                message: "Current server time".to_string(),
                interval: "30 seconds".to_string(),
            });

            sleep(CLOCK_INTERVAL).await;
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
