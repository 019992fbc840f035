use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Speaker-turn grouping config
    #[serde(default)]
    pub grouping: GroupingConfig,

    /// Batch chunking config
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Cleanup service config
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Output document config
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speaker-turn grouping configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroupingConfig {
    /// Maximum silence between cues, in seconds, for them to merge
    /// into one speaker turn
    #[serde(default = "default_max_gap_seconds")]
    pub max_gap_seconds: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_gap_seconds: default_max_gap_seconds(),
        }
    }
}

/// Batch chunking configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Size budget per batch, in estimated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

/// Cleanup service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CleanupConfig {
    // @field: Azure OpenAI resource endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Deployment (model) name
    #[serde(default = "String::new")]
    pub deployment: String,

    // @field: API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Retry attempts on transient failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff in milliseconds between retries
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl CleanupConfig {
    /// Names of the environment variables backing credentials that are
    /// still empty. An empty list means the service can be constructed.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_empty() {
            missing.push("AZURE_OPENAI_API_KEY");
        }
        if self.endpoint.is_empty() {
            missing.push("AZURE_OPENAI_ENDPOINT");
        }
        if self.deployment.is_empty() {
            missing.push("AZURE_OPENAI_DEPLOYMENT");
        }
        missing
    }

    /// Whether every required credential is present
    pub fn has_credentials(&self) -> bool {
        self.missing_credentials().is_empty()
    }
}

/// Output document configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Path of the raw grouped transcript
    #[serde(default = "default_raw_path")]
    pub raw_path: String,

    /// Path of the cleaned transcript
    #[serde(default = "default_cleaned_path")]
    pub cleaned_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_path: default_raw_path(),
            cleaned_path: default_cleaned_path(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal progress output
    #[default]
    Info,
    /// Verbose output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.grouping.max_gap_seconds < 0.0 {
            return Err(anyhow!(
                "grouping.max_gap_seconds must be non-negative, got {}",
                self.grouping.max_gap_seconds
            ));
        }

        if self.chunking.max_tokens == 0 {
            return Err(anyhow!("chunking.max_tokens must be greater than zero"));
        }

        if self.cleanup.timeout_secs == 0 {
            return Err(anyhow!("cleanup.timeout_secs must be greater than zero"));
        }

        if self.output.raw_path.is_empty() || self.output.cleaned_path.is_empty() {
            return Err(anyhow!("output paths cannot be empty"));
        }

        Ok(())
    }
}

// Default value functions used by serde

fn default_max_gap_seconds() -> f64 {
    5.0
}

fn default_max_tokens() -> usize {
    8000
}

fn default_api_version() -> String {
    "2024-02-15-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_raw_path() -> String {
    "transcript_raw.md".to_string()
}

fn default_cleaned_path() -> String {
    "transcript_cleaned.md".to_string()
}
