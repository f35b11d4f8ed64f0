use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::Duration;

mod output;
mod scenarios;
mod sse_client;

use output::print_test_summary;

#[derive(Parser)]
#[command(name = "sse-test-client")]
#[command(about = "SSE Streaming Test Client")]
struct Cli {
    /// Base URL of the streaming server
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Stream scenario to run
    #[arg(long, value_enum, default_value_t = StreamChoice::All)]
    stream: StreamChoice,

    /// Seconds of sensor data to consume before stopping
    #[arg(long, default_value_t = 10)]
    duration_secs: u64,

    /// Number of log lines to consume before stopping
    #[arg(long, default_value_t = 10)]
    max_logs: usize,

    /// Number of datetime ticks to consume before disconnecting
    #[arg(long, default_value_t = 2)]
    max_ticks: usize,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum StreamChoice {
    /// Counted messages with an explicit completion event
    Simple,
    /// Percentage updates up to 100%
    Progress,
    /// Randomized sensor readings, consumed on a time budget
    Realtime,
    /// Scripted chat with typing indicators
    Chat,
    /// Randomized log lines
    Logs,
    /// Unbounded server-time ticks
    Datetime,
    /// Run every scenario in sequence
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    let client = reqwest::Client::new();

    println!("{} Checking server health...", "→".blue());
    scenarios::check_health(&client, &cli.base_url).await?;
    println!("{} Server is healthy", "✓".green());

    println!("\n{}", "=== STREAM PHASE ===".bright_white().bold());

    let duration = Duration::from_secs(cli.duration_secs);
    let mut results = Vec::new();

    match cli.stream {
        StreamChoice::Simple => {
            results.push(scenarios::simple(&client, &cli.base_url).await?);
        }
        StreamChoice::Progress => {
            results.push(scenarios::progress(&client, &cli.base_url).await?);
        }
        StreamChoice::Realtime => {
            results.push(scenarios::realtime(&client, &cli.base_url, duration).await?);
        }
        StreamChoice::Chat => {
            results.push(scenarios::chat(&client, &cli.base_url).await?);
        }
        StreamChoice::Logs => {
            results.push(scenarios::logs(&client, &cli.base_url, cli.max_logs).await?);
        }
        StreamChoice::Datetime => {
            results.push(scenarios::datetime(&client, &cli.base_url, cli.max_ticks).await?);
        }
        StreamChoice::All => {
            results.push(scenarios::simple(&client, &cli.base_url).await?);
            results.push(scenarios::progress(&client, &cli.base_url).await?);
            results.push(scenarios::realtime(&client, &cli.base_url, duration).await?);
            results.push(scenarios::chat(&client, &cli.base_url).await?);
            results.push(scenarios::logs(&client, &cli.base_url, cli.max_logs).await?);
            results.push(scenarios::datetime(&client, &cli.base_url, cli.max_ticks).await?);
        }
    }

    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|result| result.passed);
    if all_passed {
        println!("\n{}", "All streams passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some streams failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
