//! # Suite Runner and Report
//!
//! Runs the three checks strictly in order, prints progress as it goes,
//! and collects per-check outcomes for the final summary. A failed check
//! never aborts the suite; the remaining checks still run so one report
//! shows everything that is wrong with the endpoint.

use crate::{client::ProbeClient, config::Config, streaming::StreamEvent};
use futures_util::{pin_mut, StreamExt};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::debug;

/// Outcome of a single check.
#[derive(Debug)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    /// One-line summary shown in the report table
    pub detail: String,
}

/// Outcomes of a full suite run, in execution order.
#[derive(Debug)]
pub struct SuiteReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.passed).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total()
    }
}

/// Run the smoke-test suite against the endpoint.
pub async fn run_suite(client: &ProbeClient, config: &Config) -> SuiteReport {
    println!("🚀 Smoke-testing LLM endpoint");
    println!("📍 Target: {}", client.base_url());
    println!("🧠 Model: {}", client.model_id());
    println!("{}", "=".repeat(50));

    let mut outcomes = Vec::new();

    println!("\n🧪 Check: Health");
    println!("{}", "-".repeat(30));
    outcomes.push(check_health(client, config).await);

    println!("\n🧪 Check: Completion");
    println!("{}", "-".repeat(30));
    outcomes.push(check_completion(client, config).await);

    if config.skip_streaming {
        println!("\n⏭️  Streaming check skipped");
    } else {
        println!("\n🧪 Check: Streaming");
        println!("{}", "-".repeat(30));
        outcomes.push(check_streaming(client, config).await);
    }

    SuiteReport { outcomes }
}

/// Print the summary table and the final verdict.
pub fn print_summary(report: &SuiteReport) {
    println!("\n{}", "=".repeat(50));
    println!("📊 Results:");
    for outcome in &report.outcomes {
        let status = if outcome.passed { "✅ PASSED" } else { "❌ FAILED" };
        println!("   {}: {} ({})", outcome.name, status, outcome.detail);
    }

    println!(
        "\n🎯 Total: {}/{} checks passed",
        report.passed_count(),
        report.total()
    );

    if report.all_passed() {
        println!("🎉 All checks passed! The endpoint looks healthy.");
    } else {
        println!("⚠️  Some checks failed. Check the endpoint configuration and logs.");
    }
}

async fn check_health(client: &ProbeClient, config: &Config) -> CheckOutcome {
    match client
        .health(Duration::from_secs(config.health_timeout))
        .await
    {
        Ok(health) if health.is_healthy() => {
            println!("✅ Health check: {}", health.status);
            if !health.body.is_empty() {
                println!("   Response: {}", health.body.trim_end());
            }
            CheckOutcome {
                name: "Health Check",
                passed: true,
                detail: format!("HTTP {}", health.status),
            }
        }
        Ok(health) => {
            println!("❌ Health check: {}", health.status);
            CheckOutcome {
                name: "Health Check",
                passed: false,
                detail: format!("HTTP {}", health.status),
            }
        }
        Err(err) => {
            println!("❌ Health check failed: {}", err);
            CheckOutcome {
                name: "Health Check",
                passed: false,
                detail: err.to_string(),
            }
        }
    }
}

async fn check_completion(client: &ProbeClient, config: &Config) -> CheckOutcome {
    let request =
        client.completion_request(&config.prompt, config.max_tokens, config.temperature, false);

    println!("🔄 Sending completion request...");
    let start = Instant::now();

    match client
        .chat_completion(&request, Duration::from_secs(config.completion_timeout))
        .await
    {
        Ok(response) => {
            let elapsed = start.elapsed().as_secs_f64();
            println!("✅ Completion: 200 ({:.2}s)", elapsed);
            match response.content() {
                Some(content) => {
                    println!("   Model answer:");
                    println!("   {}", content);
                    CheckOutcome {
                        name: "Completion",
                        passed: true,
                        detail: format!("{} chars in {:.2}s", content.chars().count(), elapsed),
                    }
                }
                None => {
                    println!("❌ Completion response carried no content");
                    CheckOutcome {
                        name: "Completion",
                        passed: false,
                        detail: "response carried no content".to_string(),
                    }
                }
            }
        }
        Err(err) => {
            println!("❌ Completion failed: {}", err);
            CheckOutcome {
                name: "Completion",
                passed: false,
                detail: err.to_string(),
            }
        }
    }
}

async fn check_streaming(client: &ProbeClient, config: &Config) -> CheckOutcome {
    let request = client.completion_request(
        &config.stream_prompt,
        config.stream_max_tokens,
        config.stream_temperature,
        true,
    );

    println!("🔄 Requesting streamed completion...");
    let start = Instant::now();

    let stream = match client
        .stream_chat_completion(&request, Duration::from_secs(config.streaming_timeout))
        .await
    {
        Ok(stream) => stream,
        Err(err) => {
            println!("❌ Streaming failed: {}", err);
            return CheckOutcome {
                name: "Streaming",
                passed: false,
                detail: err.to_string(),
            };
        }
    };

    println!("✅ Streaming response:");
    pin_mut!(stream);

    let mut full_response = String::new();
    let mut finished = false;

    while let Some(event) = stream.next().await {
        match event {
            Ok(StreamEvent::Fragment(text)) => {
                // Echo fragments as they arrive, like a terminal chat
                print!("{}", text);
                let _ = io::stdout().flush();
                full_response.push_str(&text);
            }
            Ok(StreamEvent::Done) => {
                finished = true;
            }
            Err(err) => {
                println!("\n❌ Stream interrupted: {}", err);
                return CheckOutcome {
                    name: "Streaming",
                    passed: false,
                    detail: format!(
                        "interrupted after {} chars: {}",
                        full_response.chars().count(),
                        err
                    ),
                };
            }
        }
    }

    if !finished {
        debug!("stream ended without [DONE] sentinel");
    }

    let elapsed = start.elapsed().as_secs_f64();
    println!("\n\n✅ Streaming completed ({:.2}s)", elapsed);
    CheckOutcome {
        name: "Streaming",
        passed: true,
        detail: format!(
            "{} chars in {:.2}s",
            full_response.chars().count(),
            elapsed
        ),
    }
}
