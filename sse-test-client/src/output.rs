use colored::*;

use crate::scenarios::ScenarioResult;

pub fn print_test_summary(results: &[ScenarioResult]) {
    for result in results {
        let status = if result.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        println!(
            "  {status}  {:<10} ({} events)",
            result.name, result.events_received
        );
        if let Some(detail) = &result.detail {
            println!("        {}", detail.dimmed());
        }
    }

    let passed = results.iter().filter(|result| result.passed).count();
    println!("\n  {passed}/{} scenarios passed", results.len());
}
