//! # llmprobe - LLM Endpoint Smoke Tester
//!
//! A diagnostic CLI for smoke-testing remote OpenAI-compatible inference
//! endpoints (vLLM, LightLLM, LiteLLM proxies and cloud providers).
//! llmprobe runs three sequential checks against a target endpoint and
//! prints a pass/fail report:
//!
//! 1. **Health check** - `GET /health`
//! 2. **Completion** - `POST /v1/chat/completions` with `stream: false`
//! 3. **Streaming** - `POST /v1/chat/completions` with `stream: true`,
//!    decoding the Server-Sent-Events body incrementally
//!
//! ## Architecture
//!
//! - [`config`] - Configuration from CLI arguments, environment and .env
//! - [`error`] - Error taxonomy for transport and decoding failures
//! - [`schemas`] - OpenAI-compatible request/response structures
//! - [`core`] - HTTP client factory (pooling, compression, timeouts)
//! - [`client`] - The probe client issuing the three checks
//! - [`streaming`] - Incremental SSE decoder for streamed completions
//! - [`report`] - Sequential check runner and report printing
//!
//! llmprobe is deliberately not a client library: it holds no state
//! across runs, performs no retries, and coordinates no concurrent
//! requests. One connection at a time, consumed to completion.

// Core infrastructure
pub mod core;
pub mod client;
pub mod config;
pub mod error;
pub mod schemas;

// Domain modules
pub mod report;
pub mod streaming;

// Re-export commonly used types for convenience
pub use client::ProbeClient;
pub use config::Config;
pub use error::ProbeError;
pub use report::{run_suite, CheckOutcome, SuiteReport};
pub use schemas::{ChatCompletionRequest, ChatCompletionResponse, Message};
pub use streaming::{decode_body, decoder::StreamEvent};

/// The result type used throughout the crate
pub type Result<T> = std::result::Result<T, ProbeError>;
