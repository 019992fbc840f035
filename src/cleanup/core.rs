/*!
 * Core cleanup service implementation.
 *
 * This module contains the CleanupService, which sends batches of speaker
 * turns to the configured LLM backend and maps the response back onto the
 * turns. The model is an opaque collaborator: the service only owns the
 * marker protocol around it, never the cleanup semantics.
 */

use std::time::{Duration, Instant};
use anyhow::{Result, anyhow, Context};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::app_config::CleanupConfig;
use crate::providers::azure_openai::{AzureOpenAi, ChatRequest, TokenUsage};
use crate::transcript_processor::Turn;
use super::prompts::PromptTemplate;

// @const: Statement marker as it appears in prompts and responses
static STATEMENT_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[STATEMENT \d+\]").unwrap()
});

/// Token usage statistics for tracking API consumption
#[derive(Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Deployment (model) name
    pub deployment: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider: String::new(),
            deployment: String::new(),
        }
    }

    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, deployment: String) -> Self {
        Self {
            provider,
            deployment,
            ..Self::new()
        }
    }

    /// Record one completed API request
    pub fn record(&mut self, duration: Duration, usage: Option<&TokenUsage>) {
        self.api_duration += duration;
        if let Some(usage) = usage {
            self.prompt_tokens += usage.prompt_tokens;
            self.completion_tokens += usage.completion_tokens;
            self.total_tokens += usage.total_tokens;
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Deployment: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes",
            self.provider,
            self.deployment,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            self.start_time.elapsed().as_secs_f64() / 60.0,
            self.api_duration.as_secs_f64() / 60.0,
        )
    }
}

/// One parsed slot of the cleanup response. The backend is expected to echo
/// one marker per statement; trailing statements it never echoed come back
/// as `Missing` and fall back to the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// The response carried text for this statement (possibly empty)
    Matched(String),

    /// The response ended before this statement
    Missing,
}

/// Build the combined prompt text for one batch of turns.
///
/// Each turn is wrapped with a numbered `[STATEMENT i]` marker and a
/// `Speaker:` line so the response can be split back apart.
pub fn build_batch_prompt(batch: &[Turn]) -> String {
    let mut combined = String::new();
    for (i, turn) in batch.iter().enumerate() {
        combined.push_str(&format!("\n\n[STATEMENT {}]\n", i));
        combined.push_str(&format!("Speaker: {}\n", turn.speaker));
        combined.push_str(&turn.full_text());
    }

    format!("{}\n\n{}", PromptTemplate::CLEANING_INSTRUCTIONS, combined)
}

/// Split a cleanup response into per-statement segments.
///
/// The response is split on `[STATEMENT N]` markers; anything before the
/// first marker is discarded. Within each segment, any reintroduced
/// `Speaker:` line is dropped. A response with more segments than requested
/// is truncated to the requested count; a short response is topped up with
/// `Missing` slots.
pub fn parse_segments(response: &str, expected: usize) -> Vec<Segment> {
    let mut parts = STATEMENT_MARKER_REGEX.split(response);
    // Discard everything before the first marker
    parts.next();

    let mut segments: Vec<Segment> = parts
        .map(|part| {
            let kept: Vec<&str> = part
                .trim()
                .lines()
                .filter(|line| !line.starts_with("Speaker:"))
                .collect();
            Segment::Matched(kept.join("\n").trim().to_string())
        })
        .collect();

    if segments.len() > expected {
        warn!(
            "Cleanup response contained {} statements where {} were requested, dropping the trailing {}",
            segments.len(),
            expected,
            segments.len() - expected
        );
        segments.truncate(expected);
    }

    while segments.len() < expected {
        segments.push(Segment::Missing);
    }

    segments
}

/// Resolve segments into replacement texts, one per turn in order.
/// `Missing` slots fall back to the turn's original text, so a short
/// response never loses statements.
pub fn resolve_replacements(batch: &[Turn], segments: Vec<Segment>) -> Vec<String> {
    debug_assert_eq!(batch.len(), segments.len());

    let mut padded = 0usize;
    let replacements = batch
        .iter()
        .zip(segments)
        .map(|(turn, segment)| match segment {
            Segment::Matched(text) => text,
            Segment::Missing => {
                padded += 1;
                turn.full_text()
            }
        })
        .collect();

    if padded > 0 {
        warn!(
            "Cleanup response was short: {} of {} statements keep their original text",
            padded,
            batch.len()
        );
    }

    replacements
}

/// Cleanup provider implementation variants
enum CleanupProviderImpl {
    /// Azure OpenAI chat-completions service
    AzureOpenAi {
        /// Client instance
        client: AzureOpenAi,
    },
}

/// Main cleanup service for transcript batches
pub struct CleanupService {
    /// Provider implementation
    provider: CleanupProviderImpl,

    /// Configuration for the cleanup service
    pub config: CleanupConfig,
}

impl CleanupService {
    /// Create a new cleanup service with the given configuration
    pub fn new(config: CleanupConfig) -> Result<Self> {
        validate_endpoint(&config.endpoint)?;

        let client = AzureOpenAi::new_with_config(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.deployment.clone(),
            config.api_version.clone(),
            config.retry_count,
            config.retry_backoff_ms,
            config.timeout_secs,
        );

        Ok(Self {
            provider: CleanupProviderImpl::AzureOpenAi { client },
            config,
        })
    }

    /// Test the connection to the cleanup provider
    pub async fn test_connection(&self) -> Result<()> {
        match &self.provider {
            CleanupProviderImpl::AzureOpenAi { client } => {
                client.probe().await?;
            }
        }
        Ok(())
    }

    /// Clean one batch of turns, returning one replacement text per turn in
    /// order. The marker protocol guarantees the output length matches the
    /// batch length whatever the backend returned.
    pub async fn clean_batch(
        &self,
        batch: &[Turn],
        stats: &mut TokenUsageStats,
    ) -> Result<Vec<String>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let request = ChatRequest::new()
            .add_message("system", PromptTemplate::TRANSCRIPT_EDITOR)
            .add_message("user", build_batch_prompt(batch))
            .temperature(0.3);

        let started = Instant::now();
        let response = match &self.provider {
            CleanupProviderImpl::AzureOpenAi { client } => client.complete_chat(request).await?,
        };
        stats.record(started.elapsed(), response.usage.as_ref());

        let text = AzureOpenAi::extract_text_from_response(&response);
        let segments = parse_segments(&text, batch.len());
        Ok(resolve_replacements(batch, segments))
    }
}

/// Check that an endpoint string parses as a URL with a host
fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(anyhow!("Cleanup endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)
    } else {
        Url::parse(&format!("https://{}", endpoint))
    }
    .with_context(|| format!("Invalid cleanup endpoint: {}", endpoint))?;

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(())
}
