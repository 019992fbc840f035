/*!
 * # vttclean - VTT Transcript Cleaner
 *
 * A Rust library for cleaning up WebVTT meeting transcripts using AI.
 *
 * ## Features
 *
 * - Parse WebVTT caption files with inline `<v Speaker>` voice tags
 * - Reconstruct continuous speaker statements from disjoint caption cues
 * - Partition statements into batches bounded by a token budget
 * - Clean up each batch through the Azure OpenAI chat-completions API
 * - Render raw and cleaned Markdown transcripts, the cleaned one written
 *   incrementally so partial progress survives interruption
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript_processor`: WebVTT parsing and speaker-turn grouping
 * - `cleanup`: AI-powered transcript cleanup:
 *   - `cleanup::chunking`: Batch chunking under a size budget
 *   - `cleanup::core`: Core cleanup service and response handling
 *   - `cleanup::prompts`: Prompt templates
 * - `exporter`: Markdown rendering of grouped transcripts
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementation for the LLM backend:
 *   - `providers::azure_openai`: Azure OpenAI API client
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod transcript_processor;
pub mod cleanup;
pub mod exporter;
pub mod app_controller;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use transcript_processor::{Cue, CueCollection, Timestamp, Turn, group_cues};
pub use cleanup::{CleanupService, TranscriptChunker};
pub use exporter::MarkdownExporter;
pub use errors::{AppError, CleanupError, ProviderError, TranscriptError};
