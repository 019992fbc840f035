/*!
 * Batch chunking of speaker turns.
 *
 * Turns are partitioned into batches whose combined estimated size stays
 * within a configured budget, so each batch fits a single request to the
 * length-limited cleanup backend. Turns are never split across batches.
 */

use log::{debug, error};

use crate::transcript_processor::Turn;

/// Pluggable size estimator used for the budget check
pub type SizeEstimator = fn(&Turn) -> usize;

/// Reference size estimate: roughly four characters per token
pub fn estimate_tokens(turn: &Turn) -> usize {
    turn.full_text().len() / 4
}

/// Chunks speaker turns into batches for LLM processing
pub struct TranscriptChunker {
    // @field: Size budget per batch, in estimator units
    max_tokens: usize,

    // @field: Size estimator applied to every turn
    estimator: SizeEstimator,
}

impl TranscriptChunker {
    /// Create a chunker with the given budget and the reference estimator
    pub fn new(max_tokens: usize) -> Self {
        TranscriptChunker {
            max_tokens,
            estimator: estimate_tokens,
        }
    }

    /// Replace the size estimator. The same estimator is used for every
    /// budget check, so any consistent estimate works.
    pub fn with_estimator(mut self, estimator: SizeEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Partition turns into batches that fit within the budget.
    ///
    /// Greedy single pass: a batch is closed once adding the next turn would
    /// exceed the budget, except that the check only fires when the batch
    /// already holds at least one turn. A turn whose own estimate exceeds the
    /// budget therefore still lands in a batch of its own rather than being
    /// dropped. Concatenating the batches in order reproduces the input
    /// sequence exactly.
    pub fn create_batches(&self, turns: &[Turn]) -> Vec<Vec<Turn>> {
        let mut batches = Vec::new();
        let mut current_batch: Vec<Turn> = Vec::new();
        let mut current_size = 0usize;

        for turn in turns {
            let turn_size = (self.estimator)(turn);

            if current_size + turn_size > self.max_tokens && !current_batch.is_empty() {
                batches.push(std::mem::take(&mut current_batch));
                current_size = 0;
            }

            if turn_size > self.max_tokens {
                debug!(
                    "Turn by {} at {} is oversized ({} units against a budget of {}), placing it in its own batch",
                    turn.speaker, turn.start, turn_size, self.max_tokens
                );
            }

            current_batch.push(turn.clone());
            current_size += turn_size;
        }

        if !current_batch.is_empty() {
            batches.push(current_batch);
        }

        // Guard against accidental loss of turns during chunking
        let total_batched: usize = batches.iter().map(|batch| batch.len()).sum();
        if total_batched != turns.len() {
            error!(
                "CRITICAL ERROR: Lost turns during chunking! Original: {}, After chunking: {}",
                turns.len(),
                total_batched
            );
        } else if log::max_level() >= log::LevelFilter::Debug {
            for (i, batch) in batches.iter().enumerate() {
                let batch_size: usize = batch.iter().map(|t| (self.estimator)(t)).sum();
                debug!(
                    "Batch {}: {} turns, {} estimated units",
                    i + 1,
                    batch.len(),
                    batch_size
                );
            }
        }

        batches
    }
}
