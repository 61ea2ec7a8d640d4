//! # llmprobe Configuration
//!
//! Configuration from command-line arguments, environment variables and
//! .env file loading. Every knob maps to one CLI flag and one environment
//! variable, so the probe can run unattended in CI or be pointed at an
//! endpoint ad hoc from a shell.

use clap::Parser;
use std::env;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(name = "llmprobe")]
#[command(about = "Smoke-test an OpenAI-compatible LLM inference endpoint: health check, completion, and streaming")]
#[command(version)]
pub struct Config {
    /// Base URL of the inference endpoint
    #[arg(long, env = "PROBE_URL", default_value = "http://localhost:3423")]
    pub base_url: String,

    /// API key sent as a bearer token (falls back to VLLM_API_KEY)
    #[arg(long, env = "PROBE_TOKEN")]
    pub api_key: Option<String>,

    /// Model identifier to request
    #[arg(long, env = "PROBE_MODEL", default_value = "llama")]
    pub model_id: String,

    /// Prompt for the synchronous completion check
    #[arg(
        long,
        env = "PROBE_PROMPT",
        default_value = "Hello! How are you? Please answer briefly."
    )]
    pub prompt: String,

    /// Prompt for the streaming check
    #[arg(
        long,
        env = "PROBE_STREAM_PROMPT",
        default_value = "Tell me a short story about a cat. Start with 'Once upon a time there was a cat'."
    )]
    pub stream_prompt: String,

    /// Token budget for the synchronous completion check
    #[arg(long, env = "PROBE_MAX_TOKENS", default_value = "100")]
    pub max_tokens: u32,

    /// Token budget for the streaming check
    #[arg(long, env = "PROBE_STREAM_MAX_TOKENS", default_value = "150")]
    pub stream_max_tokens: u32,

    /// Sampling temperature for the synchronous completion check
    #[arg(long, env = "PROBE_TEMPERATURE", default_value = "0.7")]
    pub temperature: f32,

    /// Sampling temperature for the streaming check
    #[arg(long, env = "PROBE_STREAM_TEMPERATURE", default_value = "0.8")]
    pub stream_temperature: f32,

    /// Health check timeout in seconds
    #[arg(long, env = "PROBE_HEALTH_TIMEOUT", default_value = "10")]
    pub health_timeout: u64,

    /// Synchronous completion timeout in seconds
    #[arg(long, env = "PROBE_COMPLETION_TIMEOUT", default_value = "30")]
    pub completion_timeout: u64,

    /// Streaming completion timeout in seconds (whole stream)
    #[arg(long, env = "PROBE_STREAMING_TIMEOUT", default_value = "60")]
    pub streaming_timeout: u64,

    /// Skip the streaming check (for endpoints that reject stream: true)
    #[arg(long, env = "PROBE_SKIP_STREAMING", default_value = "false")]
    pub skip_streaming: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from command line arguments and environment.
    ///
    /// Loads a .env file if one exists, parses arguments, initializes
    /// logging, and validates the result. Exits non-zero on invalid
    /// configuration before any network traffic happens.
    pub fn parse_args() -> Self {
        // Load .env file if it exists (ignore errors if file doesn't exist)
        let _ = dotenv::dotenv();

        let config = Self::parse();

        config.setup_logging();

        if let Err(err) = config.validate() {
            eprintln!("Configuration validation failed: {}", err);
            std::process::exit(1);
        }

        config
    }

    /// The token to authenticate with, if any.
    ///
    /// Checks `--api-key` / `PROBE_TOKEN` first, then falls back to
    /// `VLLM_API_KEY` for compatibility with vLLM deployments.
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("VLLM_API_KEY").ok().filter(|key| !key.is_empty()))
    }

    /// Create a test configuration with minimal required fields.
    /// This is used for testing purposes only.
    pub fn for_test() -> Self {
        Self {
            base_url: "http://localhost:3423".to_string(),
            api_key: None,
            model_id: "test-model".to_string(),
            prompt: "Hello! How are you? Please answer briefly.".to_string(),
            stream_prompt: "Tell me a short story about a cat.".to_string(),
            max_tokens: 100,
            stream_max_tokens: 150,
            temperature: 0.7,
            stream_temperature: 0.8,
            health_timeout: 10,
            completion_timeout: 30,
            streaming_timeout: 60,
            skip_streaming: false,
            log_level: "info".to_string(),
        }
    }

    /// Initialize the tracing subscriber with the configured log level.
    fn setup_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(&self.log_level)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .try_init();
    }

    /// Validate configuration values and provide helpful error messages.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Endpoint URL cannot be empty. Please specify a valid base URL.".to_string());
        }

        match Url::parse(&self.base_url) {
            Ok(url) => {
                if !["http", "https"].contains(&url.scheme()) {
                    return Err(format!(
                        "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
                        url.scheme()
                    ));
                }

                if url.host().is_none() {
                    return Err(
                        "Endpoint URL must include a host (e.g., 'http://localhost:3423')."
                            .to_string(),
                    );
                }

                if url.scheme() == "http" && self.effective_api_key().is_some() {
                    eprintln!(
                        "⚠️  Warning: sending a bearer token over plain HTTP. \
                        Consider using HTTPS if the endpoint supports it."
                    );
                }
            }
            Err(err) => {
                return Err(format!(
                    "Invalid endpoint URL '{}': {}. \
                    Please provide a valid URL (e.g., 'http://localhost:3423').",
                    self.base_url, err
                ));
            }
        }

        if self.model_id.is_empty() {
            return Err("Model ID cannot be empty. Please specify a valid model identifier.".to_string());
        }

        if self.health_timeout == 0 || self.completion_timeout == 0 || self.streaming_timeout == 0 {
            return Err("Timeouts must be greater than 0 seconds.".to_string());
        }

        if self.max_tokens == 0 || self.stream_max_tokens == 0 {
            return Err("Token budgets must be greater than 0.".to_string());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str())
            && !self.log_level.contains('=')
        {
            return Err(format!(
                "Invalid log level '{}'. Valid options are: {}",
                self.log_level,
                valid_log_levels.join(", ")
            ));
        }

        Ok(())
    }
}
