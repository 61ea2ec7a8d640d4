//! # llmprobe - LLM Endpoint Smoke Tester
//!
//! Runs a health check, a synchronous completion and a streamed
//! completion against a remote OpenAI-compatible inference endpoint and
//! prints a pass/fail report. Exit code 0 means every check passed.

use llmprobe::{report, Config, ProbeClient};
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse configuration from CLI args and .env file
    let config = Config::parse_args();

    // Log the target safely (mask path/query and any inline credentials)
    let safe_url = match url::Url::parse(&config.base_url) {
        Ok(url) => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("unknown")),
        Err(_) => "invalid-url".to_string(),
    };
    info!("Probing endpoint: {}", safe_url);
    info!("Model: {}", config.model_id);

    let client = match ProbeClient::new(&config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Failed to initialize probe client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let suite = report::run_suite(&client, &config).await;
    report::print_summary(&suite);

    if suite.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
