//! One scenario per stream endpoint: consume events until the stream's
//! termination condition is met, validating payloads along the way.

use anyhow::{bail, Context, Result};
use colored::*;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

use crate::sse_client::EventStream;

pub struct ScenarioResult {
    pub name: &'static str,
    pub passed: bool,
    pub events_received: usize,
    pub detail: Option<String>,
}

impl ScenarioResult {
    fn pass(name: &'static str, events_received: usize) -> Self {
        Self {
            name,
            passed: true,
            events_received,
            detail: None,
        }
    }

    fn fail(name: &'static str, events_received: usize, detail: String) -> Self {
        Self {
            name,
            passed: false,
            events_received,
            detail: Some(detail),
        }
    }
}

/// Probe `/health` before running any scenario.
pub async fn check_health(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let url = format!("{base_url}/health");
    let response = client.get(&url).send().await.with_context(|| {
        format!("Cannot connect to {url} - is the server running? Start it with `cargo run`")
    })?;

    if !response.status().is_success() {
        bail!("Health check failed: HTTP {}", response.status());
    }

    let body: Value = response.json().await?;
    if body["status"] != "healthy" {
        bail!("Unexpected health payload: {body}");
    }
    Ok(())
}

/// Simple stream: ten counted messages, then an explicit completion event.
pub async fn simple(client: &reqwest::Client, base_url: &str) -> Result<ScenarioResult> {
    println!("{} Connecting to /stream/simple...", "→".blue());
    let mut stream = EventStream::open(client, base_url, "/stream/simple").await?;

    let mut counts = Vec::new();
    let mut completed = false;

    while let Some(event) = stream.next_event().await {
        match event.event_type.as_str() {
            "message" => {
                println!(
                    "  {} {}",
                    "✓".green(),
                    event.data["message"].as_str().unwrap_or("<no message>")
                );
                counts.push(event.data["count"].as_u64().unwrap_or(0));
            }
            "complete" => {
                completed = true;
                break;
            }
            other => log::debug!("Ignoring {other} event"),
        }
    }

    let expected: Vec<u64> = (1..=10).collect();
    if completed && counts == expected {
        Ok(ScenarioResult::pass("simple", counts.len()))
    } else {
        Ok(ScenarioResult::fail(
            "simple",
            counts.len(),
            format!("counts {counts:?}, completed={completed}"),
        ))
    }
}

/// Progress stream: done when the percentage reaches 100.0.
pub async fn progress(client: &reqwest::Client, base_url: &str) -> Result<ScenarioResult> {
    println!("{} Connecting to /stream/progress...", "→".blue());
    let mut stream = EventStream::open(client, base_url, "/stream/progress").await?;

    let mut received = 0;
    let mut consistent = true;
    let mut finished = false;
    let mut expected_step = 0;

    while let Some(event) = stream.next_event().await {
        if event.event_type != "progress" {
            continue;
        }
        received += 1;

        let percentage = event.data["percentage"].as_f64().unwrap_or(-1.0);
        println!(
            "  {} {} - {percentage}%",
            "✓".green(),
            event.data["message"].as_str().unwrap_or("<no message>")
        );

        if event.data["current_step"].as_u64() != Some(expected_step)
            || !progress_consistent(&event.data)
        {
            consistent = false;
        }
        expected_step += 1;

        if percentage == 100.0 {
            finished = event.data["status"] == "completed";
            break;
        }
    }

    if finished && consistent {
        Ok(ScenarioResult::pass("progress", received))
    } else {
        Ok(ScenarioResult::fail(
            "progress",
            received,
            format!("finished={finished}, consistent={consistent}"),
        ))
    }
}

/// Realtime stream: consume sensor readings for at most `duration`.
pub async fn realtime(
    client: &reqwest::Client,
    base_url: &str,
    duration: Duration,
) -> Result<ScenarioResult> {
    println!(
        "{} Connecting to /stream/realtime for {}s...",
        "→".blue(),
        duration.as_secs()
    );
    let mut stream = EventStream::open(client, base_url, "/stream/realtime").await?;

    let deadline = Instant::now() + duration;
    let mut received = 0;
    let mut all_in_range = true;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match tokio::time::timeout(remaining, stream.next_event()).await {
            Ok(Some(event)) => {
                if event.event_type != "sensor_data" {
                    continue;
                }
                received += 1;
                println!(
                    "  {} T: {}°C | H: {}% | P: {}hPa",
                    "✓".green(),
                    event.data["temperature"],
                    event.data["humidity"],
                    event.data["pressure"]
                );
                if !sensor_reading_in_range(&event.data) {
                    all_in_range = false;
                }
            }
            Ok(None) => break,
            // Time budget spent; the stream is abandoned mid-production
            Err(_) => break,
        }
    }

    if received > 0 && all_in_range {
        Ok(ScenarioResult::pass("realtime", received))
    } else {
        Ok(ScenarioResult::fail(
            "realtime",
            received,
            format!("received={received}, all_in_range={all_in_range}"),
        ))
    }
}

/// Chat stream: typing/message/typing triples until the completion event.
pub async fn chat(client: &reqwest::Client, base_url: &str) -> Result<ScenarioResult> {
    println!("{} Connecting to /stream/chat...", "→".blue());
    let mut stream = EventStream::open(client, base_url, "/stream/chat").await?;

    let mut steps = Vec::new();
    let mut messages = 0;
    let mut total_reported = None;

    while let Some(event) = stream.next_event().await {
        match event.event_type.as_str() {
            "typing" => {
                steps.push(if event.data["is_typing"] == true {
                    ChatStep::TypingOn
                } else {
                    ChatStep::TypingOff
                });
            }
            "message" => {
                steps.push(ChatStep::Message);
                messages += 1;
                println!(
                    "  {} Bot: {}",
                    "✓".green(),
                    event.data["text"].as_str().unwrap_or("<no text>")
                );
            }
            "complete" => {
                total_reported = event.data["total_messages"].as_u64();
                break;
            }
            other => log::debug!("Ignoring {other} event"),
        }
    }

    let passed = messages == 5 && total_reported == Some(5) && chat_sequence_valid(&steps);
    if passed {
        Ok(ScenarioResult::pass("chat", steps.len()))
    } else {
        Ok(ScenarioResult::fail(
            "chat",
            steps.len(),
            format!("messages={messages}, total_reported={total_reported:?}, steps={steps:?}"),
        ))
    }
}

/// Log stream: stop after `max_logs` lines.
pub async fn logs(
    client: &reqwest::Client,
    base_url: &str,
    max_logs: usize,
) -> Result<ScenarioResult> {
    println!(
        "{} Connecting to /stream/logs (max {max_logs} lines)...",
        "→".blue()
    );
    let mut stream = EventStream::open(client, base_url, "/stream/logs").await?;

    let mut received = 0;
    let mut valid = true;

    while received < max_logs {
        let Some(event) = stream.next_event().await else {
            break;
        };
        if event.event_type != "log" {
            continue;
        }
        received += 1;

        let level = event.data["level"].as_str().unwrap_or("?");
        println!(
            "  {} [{}] {}",
            "✓".green(),
            level,
            event.data["message"].as_str().unwrap_or("<no message>")
        );

        if !log_line_valid(&event.data, received as u64) {
            valid = false;
        }
    }

    if received == max_logs && valid {
        Ok(ScenarioResult::pass("logs", received))
    } else {
        Ok(ScenarioResult::fail(
            "logs",
            received,
            format!("received={received}/{max_logs}, valid={valid}"),
        ))
    }
}

/// Datetime stream: unbounded on the server side, so the consumer supplies
/// its own stopping condition (`max_ticks`).
pub async fn datetime(
    client: &reqwest::Client,
    base_url: &str,
    max_ticks: usize,
) -> Result<ScenarioResult> {
    println!(
        "{} Connecting to /stream/datetime (stopping after {max_ticks} ticks)...",
        "→".blue()
    );
    let mut stream = EventStream::open(client, base_url, "/stream/datetime").await?;

    let mut stamps: Vec<String> = Vec::new();

    while stamps.len() < max_ticks {
        let Some(event) = stream.next_event().await else {
            break;
        };
        if event.event_type != "datetime" {
            continue;
        }
        let stamp = event.data["datetime"].as_str().unwrap_or("").to_string();
        println!("  {} Server time: {stamp}", "✓".green());
        stamps.push(stamp);
    }

    // ISO-8601 strings sort chronologically
    let ordered = stamps.windows(2).all(|pair| pair[0] <= pair[1]);
    if stamps.len() == max_ticks && ordered {
        Ok(ScenarioResult::pass("datetime", stamps.len()))
    } else {
        Ok(ScenarioResult::fail(
            "datetime",
            stamps.len(),
            format!("ticks={}/{max_ticks}, ordered={ordered}", stamps.len()),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatStep {
    TypingOn,
    Message,
    TypingOff,
}

/// Chat events must repeat typing-on / message / typing-off exactly.
fn chat_sequence_valid(steps: &[ChatStep]) -> bool {
    steps.len() % 3 == 0
        && steps.chunks(3).all(|turn| {
            turn == &[ChatStep::TypingOn, ChatStep::Message, ChatStep::TypingOff]
        })
}

fn sensor_reading_in_range(data: &Value) -> bool {
    let in_range = |field: &str, low: f64, high: f64| {
        data[field]
            .as_f64()
            .is_some_and(|value| (low..=high).contains(&value))
    };
    in_range("temperature", 20.0, 30.0)
        && in_range("humidity", 40.0, 80.0)
        && in_range("pressure", 1000.0, 1020.0)
}

/// Percentage must match its step, to one decimal.
fn progress_consistent(data: &Value) -> bool {
    let (Some(percentage), Some(step), Some(total)) = (
        data["percentage"].as_f64(),
        data["current_step"].as_u64(),
        data["total_steps"].as_u64(),
    ) else {
        return false;
    };
    total > 0 && percentage == (step as f64 / total as f64 * 100.0 * 10.0).round() / 10.0
}

fn log_line_valid(data: &Value, expected_line: u64) -> bool {
    let level_ok = matches!(
        data["level"].as_str(),
        Some("INFO" | "WARNING" | "ERROR" | "DEBUG")
    );
    level_ok && data["line_number"].as_u64() == Some(expected_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_sequence_accepts_repeated_triples() {
        let steps = [
            ChatStep::TypingOn,
            ChatStep::Message,
            ChatStep::TypingOff,
            ChatStep::TypingOn,
            ChatStep::Message,
            ChatStep::TypingOff,
        ];
        assert!(chat_sequence_valid(&steps));
    }

    #[test]
    fn chat_sequence_rejects_missing_typing_off() {
        let steps = [ChatStep::TypingOn, ChatStep::Message, ChatStep::TypingOn];
        assert!(!chat_sequence_valid(&steps));
        assert!(!chat_sequence_valid(&[ChatStep::Message]));
    }

    #[test]
    fn sensor_ranges_are_enforced() {
        assert!(sensor_reading_in_range(&json!({
            "temperature": 25.5, "humidity": 60.0, "pressure": 1010.0
        })));
        assert!(!sensor_reading_in_range(&json!({
            "temperature": 31.0, "humidity": 60.0, "pressure": 1010.0
        })));
        assert!(!sensor_reading_in_range(&json!({
            "humidity": 60.0, "pressure": 1010.0
        })));
    }

    #[test]
    fn progress_consistency_checks_the_rounded_formula() {
        assert!(progress_consistent(&json!({
            "percentage": 35.0, "current_step": 7, "total_steps": 20
        })));
        assert!(progress_consistent(&json!({
            "percentage": 33.3, "current_step": 1, "total_steps": 3
        })));
        assert!(!progress_consistent(&json!({
            "percentage": 36.0, "current_step": 7, "total_steps": 20
        })));
    }

    #[test]
    fn log_lines_need_known_level_and_position() {
        let line = json!({"level": "WARNING", "line_number": 3});
        assert!(log_line_valid(&line, 3));
        assert!(!log_line_valid(&line, 4));
        assert!(!log_line_valid(&json!({"level": "FATAL", "line_number": 3}), 3));
    }
}
