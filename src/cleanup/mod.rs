/*!
 * Transcript cleanup services.
 *
 * This module contains the LLM-facing half of the pipeline:
 * - `chunking`: partitioning speaker turns into budget-bounded batches
 * - `prompts`: prompt templates for the cleanup request
 * - `core`: the cleanup service, batch prompt assembly and response parsing
 */

// Re-export main types for easier usage
pub use self::chunking::{TranscriptChunker, estimate_tokens};
pub use self::core::{CleanupService, Segment, TokenUsageStats};
pub use self::prompts::PromptTemplate;

// Submodules
pub mod chunking;
pub mod core;
pub mod prompts;
