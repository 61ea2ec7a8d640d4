//! # Probe Client
//!
//! Builds and sends the three diagnostic requests. Request construction
//! is stateless: the client owns a pooled HTTP connection, the endpoint
//! base URL, the model id and an optional bearer token, and nothing else
//! survives between checks.

use crate::{
    config::Config,
    core::http_client::HttpClientBuilder,
    error::ProbeError,
    schemas::{ChatCompletionRequest, ChatCompletionResponse, Message},
    streaming::{self, StreamEvent},
    Result,
};
use futures_util::Stream;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

/// Result of a health check: the endpoint's status code and raw body.
#[derive(Debug)]
pub struct HealthStatus {
    pub status: u16,
    pub body: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Client for one target endpoint, shared by all three checks.
#[derive(Clone, Debug)]
pub struct ProbeClient {
    /// HTTP client with connection pooling
    client: Client,
    /// Base URL of the inference endpoint, without trailing slash
    base_url: String,
    /// Model identifier sent with completion requests
    model_id: String,
    /// Optional bearer token
    api_key: Option<String>,
}

impl ProbeClient {
    /// Build a probe client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = HttpClientBuilder::from_config(config)
            .build()
            .map_err(|e| ProbeError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            api_key: config.effective_api_key(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn has_auth(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build a completion request body for the configured model.
    pub fn completion_request(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
        stream: bool,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model_id.clone(),
            messages: vec![Message::user(prompt)],
            max_tokens,
            temperature,
            stream,
        }
    }

    /// `GET /health` with the given time budget.
    ///
    /// Any HTTP answer counts as an answer: non-2xx statuses are reported
    /// in the returned [`HealthStatus`], not as errors. Only transport
    /// failures (refused, timeout, reset) surface as `Err`.
    pub async fn health(&self, timeout: Duration) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        debug!("GET {}", url);

        let response = self.client.get(&url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("health response status: {}", status);

        Ok(HealthStatus { status, body })
    }

    /// `POST /v1/chat/completions` with `stream: false`.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> Result<ChatCompletionResponse> {
        let response = self.post_completions(request, timeout).send().await?;

        let status = response.status();
        debug!("completion response status: {}", status);

        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ProbeError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let parsed = serde_json::from_slice::<ChatCompletionResponse>(&bytes)?;
        Ok(parsed)
    }

    /// `POST /v1/chat/completions` with `stream: true`.
    ///
    /// Returns a lazy event stream bound to this one response body. The
    /// caller drives it to completion; dropping the stream closes the
    /// connection, which is the only cancellation there is.
    pub async fn stream_chat_completion(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> Result<impl Stream<Item = Result<StreamEvent>>> {
        let response = self.post_completions(request, timeout).send().await?;

        let status = response.status();
        debug!("streaming response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(streaming::decode_body(response.bytes_stream()))
    }

    fn post_completions(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> RequestBuilder {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!("POST {} (stream: {})", url, request.stream);

        let mut builder = self.client.post(&url).json(request).timeout(timeout);
        if let Some(token) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = Config::for_test();
        let client = ProbeClient::new(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let mut config = Config::for_test();
        config.base_url = "http://localhost:3423/".to_string();
        let client = ProbeClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3423");
    }

    #[test]
    fn test_completion_request_shape() {
        let config = Config::for_test();
        let client = ProbeClient::new(&config).unwrap();
        let request = client.completion_request("hi", 100, 0.7, true);

        assert_eq!(request.model, "test-model");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert!(request.stream);
    }

    #[test]
    fn test_auth_detection() {
        let mut config = Config::for_test();
        config.api_key = Some("sk-test".to_string());
        let client = ProbeClient::new(&config).unwrap();
        assert!(client.has_auth());
    }
}
