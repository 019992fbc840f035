// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod cleanup;
mod errors;
mod exporter;
mod file_utils;
mod providers;
mod transcript_processor;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean a WebVTT meeting transcript (default command)
    Clean(CleanArgs),

    /// Generate shell completions for vttclean
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct CleanArgs {
    /// Input WebVTT transcript file
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Maximum silence in seconds between cues merged into one statement
    #[arg(short = 'g', long)]
    max_gap: Option<f64>,

    /// Batch size budget in estimated tokens
    #[arg(short = 't', long)]
    max_tokens: Option<usize>,

    /// Raw transcript output path
    #[arg(short, long)]
    raw_output: Option<String>,

    /// Cleaned transcript output path
    #[arg(short = 'o', long)]
    cleaned_output: Option<String>,

    /// Export the raw grouped transcript only, skipping the cleanup service
    #[arg(short, long)]
    skip_cleanup: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Azure OpenAI API key
    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Azure OpenAI resource endpoint
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    endpoint: Option<String>,

    /// Azure OpenAI deployment name
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT")]
    deployment: Option<String>,

    /// Azure OpenAI API version
    #[arg(long, env = "AZURE_OPENAI_API_VERSION")]
    api_version: Option<String>,
}

/// vttclean - VTT Transcript Cleaner
///
/// Parses WebVTT meeting transcripts, groups captions into speaker
/// statements and cleans them up through Azure OpenAI.
#[derive(Parser, Debug)]
#[command(name = "vttclean")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered meeting transcript cleanup tool")]
#[command(long_about = "vttclean parses WebVTT meeting transcripts, reconstructs speaker statements from caption cues and cleans them up with Azure OpenAI.

EXAMPLES:
    vttclean meeting.vtt                        # Clean using default config
    vttclean -f meeting.vtt                     # Force overwrite existing files
    vttclean -s meeting.vtt                     # Raw grouped export only, no API calls
    vttclean -g 2.5 meeting.vtt                 # Merge cues up to 2.5s apart
    vttclean -t 2000 meeting.vtt                # Smaller cleanup batches
    vttclean -o cleaned.md -r raw.md meeting.vtt
    vttclean --log-level debug meeting.vtt      # Verbose output
    vttclean completions bash > vttclean.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist, a
    default one will be created automatically.

    Azure OpenAI credentials come from AZURE_OPENAI_API_KEY,
    AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_DEPLOYMENT and (optionally)
    AZURE_OPENAI_API_VERSION, or from the matching flags. Without
    credentials, only the raw grouped transcript is written.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input WebVTT transcript file
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Maximum silence in seconds between cues merged into one statement
    #[arg(short = 'g', long)]
    max_gap: Option<f64>,

    /// Batch size budget in estimated tokens
    #[arg(short = 't', long)]
    max_tokens: Option<usize>,

    /// Raw transcript output path
    #[arg(short, long)]
    raw_output: Option<String>,

    /// Cleaned transcript output path
    #[arg(short = 'o', long)]
    cleaned_output: Option<String>,

    /// Export the raw grouped transcript only, skipping the cleanup service
    #[arg(short, long)]
    skip_cleanup: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Azure OpenAI API key
    #[arg(long, env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Azure OpenAI resource endpoint
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    endpoint: Option<String>,

    /// Azure OpenAI deployment name
    #[arg(long, env = "AZURE_OPENAI_DEPLOYMENT")]
    deployment: Option<String>,

    /// Azure OpenAI API version
    #[arg(long, env = "AZURE_OPENAI_API_VERSION")]
    api_version: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vttclean", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Clean(args)) => run_clean(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_file = cli.input_file.ok_or_else(|| {
                anyhow!("INPUT_FILE is required when no subcommand is specified")
            })?;

            let clean_args = CleanArgs {
                input_file,
                force_overwrite: cli.force_overwrite,
                max_gap: cli.max_gap,
                max_tokens: cli.max_tokens,
                raw_output: cli.raw_output,
                cleaned_output: cli.cleaned_output,
                skip_cleanup: cli.skip_cleanup,
                config_path: cli.config_path,
                log_level: cli.log_level,
                api_key: cli.api_key,
                endpoint: cli.endpoint,
                deployment: cli.deployment,
                api_version: cli.api_version,
            };
            run_clean(clean_args).await
        }
    }
}

async fn run_clean(options: CleanArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        let config = Config::default();
        config.save_to_file(config_path)?;
        log::info!("Created default configuration at {}", config_path);
        config
    };

    // Apply the configured log level unless the command line already set one
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    // Command line and environment overrides
    if let Some(max_gap) = options.max_gap {
        config.grouping.max_gap_seconds = max_gap;
    }
    if let Some(max_tokens) = options.max_tokens {
        config.chunking.max_tokens = max_tokens;
    }
    if let Some(raw_output) = options.raw_output {
        config.output.raw_path = raw_output;
    }
    if let Some(cleaned_output) = options.cleaned_output {
        config.output.cleaned_path = cleaned_output;
    }
    if let Some(api_key) = options.api_key {
        config.cleanup.api_key = api_key;
    }
    if let Some(endpoint) = options.endpoint {
        config.cleanup.endpoint = endpoint;
    }
    if let Some(deployment) = options.deployment {
        config.cleanup.deployment = deployment;
    }
    if let Some(api_version) = options.api_version {
        config.cleanup.api_version = api_version;
    }

    let controller = Controller::with_config(config)?;
    controller.run(&options.input_file, options.force_overwrite, options.skip_cleanup).await
}
