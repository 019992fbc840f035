use anyhow::{Result, Context};
use log::{warn, info, debug};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::cleanup::chunking::TranscriptChunker;
use crate::cleanup::core::{CleanupService, TokenUsageStats};
use crate::exporter::MarkdownExporter;
use crate::file_utils::FileManager;
use crate::transcript_processor::{CueCollection, Turn};

// @module: Application controller for transcript processing

/// Main application controller for transcript cleanup
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the main workflow for one transcript file
    pub async fn run(&self, input_file: &Path, force_overwrite: bool, skip_cleanup: bool) -> Result<()> {
        // Start timing the process
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let raw_path = Path::new(&self.config.output.raw_path);
        let cleaned_path = Path::new(&self.config.output.cleaned_path);

        // Skip if output already exists and no force flag
        if (raw_path.exists() || cleaned_path.exists()) && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        info!("Step 1: Parsing transcript...");
        let collection = CueCollection::parse_vtt_file(input_file)?;
        info!("Parsed {} cues", collection.cues.len());

        info!("Step 2: Grouping cues by speaker...");
        let turns = collection.group_into_turns(self.config.grouping.max_gap_seconds);
        info!("Grouped into {} statements", turns.len());

        info!("Step 3: Exporting raw transcript...");
        FileManager::write_to_file(raw_path, &MarkdownExporter::render_raw(&turns))?;
        info!("Raw transcript written to {}", raw_path.display());

        if skip_cleanup {
            info!("Cleanup disabled, stopping after the raw export");
            self.log_statistics(&turns);
            return Ok(());
        }

        let missing = self.config.cleanup.missing_credentials();
        if !missing.is_empty() {
            warn!(
                "Missing cleanup configuration: {}. Writing the raw transcript only.",
                missing.join(", ")
            );
            self.log_statistics(&turns);
            return Ok(());
        }

        info!("Step 4: Creating batches for cleanup...");
        let chunker = TranscriptChunker::new(self.config.chunking.max_tokens);
        let batches = chunker.create_batches(&turns);
        info!("Created {} batches", batches.len());

        let service = CleanupService::new(self.config.cleanup.clone())?;
        let mut usage = TokenUsageStats::with_provider_info(
            "azure-openai".to_string(),
            self.config.cleanup.deployment.clone(),
        );

        info!("Step 5: Cleaning transcript...");

        // Header goes out first; every batch after it is a single append, so
        // an interrupted run leaves a well-formed document covering all
        // completed batches.
        FileManager::write_to_file(cleaned_path, &MarkdownExporter::cleaned_header())?;

        let progress_bar = ProgressBar::new(batches.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let mut exporter = MarkdownExporter::new();
        let mut processed = 0usize;

        for (batch_index, batch) in batches.iter().enumerate() {
            progress_bar.set_message(format!("batch {}/{}", batch_index + 1, batches.len()));

            let replacements = service.clean_batch(batch, &mut usage).await
                .with_context(|| format!(
                    "Cleanup failed at batch {} of {}; batches already written are kept",
                    batch_index + 1,
                    batches.len()
                ))?;

            let rendered = exporter.render_batch(batch, &replacements);
            FileManager::append_to_file(cleaned_path, &rendered)?;

            processed += batch.len();
            debug!("Processed {}/{} statements", processed, turns.len());
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("done");
        info!("Cleaned transcript written to {}", cleaned_path.display());
        info!("{}", usage.summary());

        self.log_statistics(&turns);
        info!("Finished in {:.1}s", start_time.elapsed().as_secs_f64());

        Ok(())
    }

    /// Log the per-speaker statement breakdown for the run
    fn log_statistics(&self, turns: &[Turn]) {
        if turns.is_empty() {
            info!("No statements found in transcript");
            return;
        }

        let mut per_speaker: BTreeMap<&str, usize> = BTreeMap::new();
        for turn in turns {
            *per_speaker.entry(turn.speaker.as_str()).or_insert(0) += 1;
        }

        let total_chars: usize = turns.iter().map(|turn| turn.full_text().len()).sum();

        info!("Total speakers: {}", per_speaker.len());
        info!("Total statements: {}", turns.len());
        info!("Average statement length: {} chars", total_chars / turns.len());
        for (speaker, count) in &per_speaker {
            info!("  - {}: {} statements", speaker, count);
        }
    }
}
