use std::time::Duration;
use serde::{Serialize, Deserialize};
use async_trait::async_trait;
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Azure OpenAI client for deployment-scoped chat completions
#[derive(Debug)]
pub struct AzureOpenAi {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Resource endpoint URL, e.g. https://my-resource.openai.azure.com
    endpoint: String,
    /// Deployment name addressed in the request path
    deployment: String,
    /// API version query parameter
    api_version: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completion request
#[derive(Debug, Default, Serialize)]
pub struct ChatRequest {
    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new empty chat request. The model is addressed through the
    /// deployment in the request path, not the body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u64,
    /// Number of completion tokens
    pub completion_tokens: u64,
    /// Total number of tokens
    pub total_tokens: u64,
}

/// One completion choice in a chat response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChatMessage,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// The completion choices
    pub choices: Vec<ChatChoice>,

    /// Token usage information
    pub usage: Option<TokenUsage>,
}

impl AzureOpenAi {
    /// Create a new Azure OpenAI client with default retry settings
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self::new_with_config(api_key, endpoint, deployment, api_version, 3, 1000, 120)
    }

    /// Create a new Azure OpenAI client with retry and timeout configuration
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// The deployment-scoped chat-completions URL
    fn request_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    /// Complete a chat request with retry logic.
    ///
    /// Server errors and network errors are retried with exponential
    /// backoff; client errors fail immediately.
    pub async fn complete_chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = self.request_url();
        let mut attempt = 0u32;
        let mut last_error: Option<ProviderError> = None;

        while attempt <= self.max_retries {
            let result = self.client.post(&url)
                .header("Content-Type", "application/json")
                .header("api-key", &self.api_key)
                .json(&request)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<ChatResponse>().await.map_err(|e| {
                            ProviderError::ParseError(format!(
                                "Failed to parse Azure OpenAI response: {}", e
                            ))
                        });
                    }

                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    if status.is_server_error() {
                        // Server error - can retry
                        error!(
                            "Azure OpenAI API error ({}): {} - attempt {}/{}",
                            status, error_text, attempt + 1, self.max_retries + 1
                        );
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        // Client error - don't retry
                        error!("Azure OpenAI API error ({}): {}", status, error_text);
                        return Err(match status.as_u16() {
                            401 | 403 => ProviderError::AuthenticationError(error_text),
                            429 => ProviderError::RateLimitExceeded(error_text),
                            code => ProviderError::ApiError {
                                status_code: code,
                                message: error_text,
                            },
                        });
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    error!(
                        "Azure OpenAI network error: {} - attempt {}/{}",
                        e, attempt + 1, self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Azure OpenAI request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    /// Send a one-token probe to verify endpoint, deployment and credentials
    pub async fn probe(&self) -> Result<(), ProviderError> {
        let request = ChatRequest::new()
            .add_message("user", "Hello")
            .max_tokens(10);

        self.complete_chat(request).await?;
        Ok(())
    }

    /// Extract text from an Azure OpenAI response
    pub fn extract_text_from_response(response: &ChatResponse) -> String {
        response.choices
            .iter()
            .map(|choice| choice.message.content.as_str())
            .collect()
    }
}

#[async_trait]
impl Provider for AzureOpenAi {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.complete_chat(request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.probe().await
    }

    fn extract_text(response: &ChatResponse) -> String {
        Self::extract_text_from_response(response)
    }
}
