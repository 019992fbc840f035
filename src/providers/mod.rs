/*!
 * Provider implementations for the transcript cleanup backend.
 *
 * This module contains the client for the LLM service the cleanup pipeline
 * delegates to:
 * - Azure OpenAI: deployment-scoped chat-completions API
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for cleanup backends.
///
/// The cleanup service only needs three things from a backend: send one
/// request, probe the connection, and pull plain text out of a response.
/// Keeping the request/response types associated lets mocks stand in for
/// the real client in tests without touching the service code.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request against the backend
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Verify the backend is reachable with the configured credentials
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract the response's text content
    fn extract_text(response: &Self::Response) -> String;
}

pub mod azure_openai;
