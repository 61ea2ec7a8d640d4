//! # Schemas Module
//!
//! Client-side data structures for the OpenAI-compatible chat completions
//! API, covering both regular and streamed responses. Streamed chunk types
//! are deliberately lenient: fields the endpoint omits deserialize to their
//! defaults instead of failing the whole chunk.

use serde::{Deserialize, Serialize};

/// # Chat Completion Request
///
/// The request body sent to `/v1/chat/completions`. Only the fields the
/// probe actually exercises are present; the endpoint fills in its own
/// defaults for everything else.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// List of messages in the conversation
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,
    /// Whether to stream the response (Server-Sent Events)
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Option<String>,
}

impl Message {
    /// Build a user-role message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// The generated text of the first choice, if the endpoint returned one.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub index: Option<u32>,
    pub message: Message,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// # Streaming Response Structures
///
/// One `ChatCompletionChunk` arrives per SSE `data:` line. A chunk with no
/// `choices` carries nothing for the probe and is skipped by the decoder.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

/// A single choice in a streaming completion chunk.
#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    /// Delta content for this chunk; empty object when the endpoint omits it
    #[serde(default)]
    pub delta: StreamDelta,
    /// Finish reason (null until the final chunk)
    pub finish_reason: Option<String>,
}

/// The incremental piece of the response carried by one chunk.
#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    /// Role (only in the first chunk)
    pub role: Option<String>,
    /// Content delta
    pub content: Option<String>,
}
