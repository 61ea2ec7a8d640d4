//! Manual test against a live inference endpoint.
//!
//! Set these environment variables before running:
//! - PROBE_URL: the endpoint base URL
//! - PROBE_TOKEN: the authorization token (optional)
//! - PROBE_MODEL: the model ID to use
//!
//! Run with: cargo test test_real_endpoint -- --ignored --nocapture

use futures::{pin_mut, StreamExt};
use llmprobe::{Config, ProbeClient, StreamEvent};
use std::env;
use std::time::Duration;

#[tokio::test]
#[ignore]
async fn test_real_endpoint() {
    let mut config = Config::for_test();
    config.base_url =
        env::var("PROBE_URL").unwrap_or_else(|_| "http://localhost:3423".to_string());
    config.api_key = env::var("PROBE_TOKEN").ok();
    config.model_id = env::var("PROBE_MODEL").unwrap_or_else(|_| "llama".to_string());

    println!("Testing endpoint: {}", config.base_url);
    println!("Using model: {}", config.model_id);

    let client = ProbeClient::new(&config).unwrap();

    let health = client
        .health(Duration::from_secs(config.health_timeout))
        .await
        .expect("health request failed");
    println!("Health: HTTP {} - {}", health.status, health.body);
    assert!(health.is_healthy());

    let request = client.completion_request("Hello! What's 2+2?", 50, 0.7, false);
    let response = client
        .chat_completion(&request, Duration::from_secs(config.completion_timeout))
        .await
        .expect("completion request failed");
    println!("Completion: {:?}", response.content());
    assert!(response.content().is_some());

    let request = client.completion_request("Tell me a short joke.", 50, 0.8, true);
    let stream = client
        .stream_chat_completion(&request, Duration::from_secs(config.streaming_timeout))
        .await
        .expect("streaming request failed");
    pin_mut!(stream);

    let mut fragments = 0usize;
    while let Some(event) = stream.next().await {
        match event.expect("stream interrupted") {
            StreamEvent::Fragment(text) => {
                print!("{}", text);
                fragments += 1;
            }
            StreamEvent::Done => println!("\n[stream complete]"),
        }
    }
    assert!(fragments > 0, "endpoint streamed no content");
}
