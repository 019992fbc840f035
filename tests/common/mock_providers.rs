/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Echoes every statement back, cleaned
 * - `MockProvider::short(keep)` - Returns only the first `keep` statements
 * - `MockProvider::extra(n)` - Returns `n` trailing statements too many
 * - `MockProvider::empty()` - Returns an empty response
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vttclean::errors::ProviderError;
use vttclean::providers::Provider;

static STATEMENT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[STATEMENT \d+\]").unwrap()
});

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The combined batch prompt
    pub prompt: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The response text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Echo every statement back with a [CLEANED] prefix
    Working,
    /// Return only the first `keep` statements
    Short { keep: usize },
    /// Return `extra` additional trailing statements
    Extra { extra: usize },
    /// Return an empty response
    Empty,
    /// Always fail with an error
    Failing,
}

/// Mock provider for testing cleanup behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of completed requests
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that echoes every statement
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that drops all but the first `keep` statements
    pub fn short(keep: usize) -> Self {
        Self::new(MockBehavior::Short { keep })
    }

    /// Create a mock that returns `extra` statements too many
    pub fn extra(extra: usize) -> Self {
        Self::new(MockBehavior::Extra { extra })
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests completed so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Pull the statement bodies back out of a batch prompt
    pub fn parse_prompt_statements(prompt: &str) -> Vec<(String, String)> {
        let mut parts = STATEMENT_MARKER.split(prompt);
        parts.next(); // instructions before the first marker

        parts
            .map(|part| {
                let mut speaker = String::new();
                let mut body_lines = Vec::new();
                for line in part.trim().lines() {
                    if let Some(name) = line.strip_prefix("Speaker: ") {
                        speaker = name.to_string();
                    } else {
                        body_lines.push(line);
                    }
                }
                (speaker, body_lines.join("\n").trim().to_string())
            })
            .collect()
    }

    /// Generate a properly formatted batch response with markers
    pub fn generate_batch_response(entries: &[(String, String)]) -> String {
        let mut response = String::new();
        for (i, (speaker, body)) in entries.iter().enumerate() {
            response.push_str(&format!("[STATEMENT {}]\n", i));
            response.push_str(&format!("Speaker: {}\n", speaker));
            response.push_str(&format!("[CLEANED] {}\n\n", body));
        }
        response
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: MockRequest) -> Result<MockResponse, ProviderError> {
        if self.behavior == MockBehavior::Failing {
            return Err(ProviderError::RequestFailed("mock provider failure".to_string()));
        }

        self.request_count.fetch_add(1, Ordering::SeqCst);

        if let Some(generator) = self.custom_response {
            return Ok(MockResponse { text: generator(&request) });
        }

        let mut entries = Self::parse_prompt_statements(&request.prompt);
        let text = match self.behavior {
            MockBehavior::Working => Self::generate_batch_response(&entries),
            MockBehavior::Short { keep } => {
                entries.truncate(keep);
                Self::generate_batch_response(&entries)
            }
            MockBehavior::Extra { extra } => {
                for i in 0..extra {
                    entries.push(("Nobody".to_string(), format!("made-up statement {}", i)));
                }
                Self::generate_batch_response(&entries)
            }
            MockBehavior::Empty => String::new(),
            MockBehavior::Failing => unreachable!(),
        };

        Ok(MockResponse { text })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        if self.behavior == MockBehavior::Failing {
            return Err(ProviderError::ConnectionError("mock connection failure".to_string()));
        }
        Ok(())
    }

    fn extract_text(response: &MockResponse) -> String {
        response.text.clone()
    }
}
