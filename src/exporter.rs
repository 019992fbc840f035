/*!
 * Markdown rendering of grouped transcripts.
 *
 * The exporter assembles document text only; writing it out is the
 * controller's job. Cleaned output is rendered one batch at a time against
 * the same exporter value, so speaker sections continue correctly across
 * batch boundaries.
 */

use std::fmt::Write;

use crate::transcript_processor::{Timestamp, Turn};

/// Where the section reducer currently is in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionState {
    /// No speaker section has been opened yet
    NoSectionYet,

    /// Inside the section of the given speaker
    InSection(String),
}

/// What a visible entry requires before its own lines are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionChange {
    /// First section of the document: heading, no separator
    FirstSection,

    /// Speaker changed: separator line, then heading
    NewSection,

    /// Same speaker as the previous visible entry
    SameSection,
}

/// Reducer tracking the speaker of the last entry that produced visible
/// output. Entries that are skipped must not be fed through `advance`, which
/// is exactly what gives cleaned mode its one-heading-per-visible-run shape.
#[derive(Debug, Clone, Default)]
pub struct SectionTracker {
    state: Option<String>,
}

impl SectionTracker {
    /// Start before any section
    pub fn new() -> Self {
        Self::default()
    }

    /// Current reducer state
    pub fn state(&self) -> SectionState {
        match &self.state {
            None => SectionState::NoSectionYet,
            Some(speaker) => SectionState::InSection(speaker.clone()),
        }
    }

    /// Advance past one visible entry and report what it opens
    pub fn advance(&mut self, speaker: &str) -> SectionChange {
        match self.state.as_deref() {
            None => {
                self.state = Some(speaker.to_string());
                SectionChange::FirstSection
            }
            Some(current) if current == speaker => SectionChange::SameSection,
            Some(_) => {
                self.state = Some(speaker.to_string());
                SectionChange::NewSection
            }
        }
    }
}

/// Renders grouped turns as a speaker-sectioned Markdown document
#[derive(Debug, Default)]
pub struct MarkdownExporter {
    tracker: SectionTracker,
}

impl MarkdownExporter {
    /// Create an exporter with no section open
    pub fn new() -> Self {
        Self::default()
    }

    /// Header of the raw document
    pub fn raw_header() -> String {
        "# Meeting Transcript\n\n*Grouped by speaker with timestamps*\n\n".to_string()
    }

    /// Header of the cleaned document
    pub fn cleaned_header() -> String {
        "# Cleaned Meeting Transcript\n\n".to_string()
    }

    /// Render the complete raw document for a turn sequence
    pub fn render_raw(turns: &[Turn]) -> String {
        let mut exporter = Self::new();
        let mut out = Self::raw_header();
        for turn in turns {
            exporter.render_entry(&mut out, &turn.speaker, &turn.start, &turn.full_text());
        }
        out
    }

    /// Render one cleaned batch: each turn paired with its replacement text.
    /// A replacement that trims to nothing is omitted entirely and leaves the
    /// section state untouched, so the next visible entry decides the heading.
    pub fn render_batch(&mut self, batch: &[Turn], replacements: &[String]) -> String {
        let mut out = String::new();
        for (turn, replacement) in batch.iter().zip(replacements) {
            if replacement.trim().is_empty() {
                continue;
            }
            self.render_entry(&mut out, &turn.speaker, &turn.start, replacement);
        }
        out
    }

    /// Emit one visible entry: section heading when the visible speaker
    /// changed, then the bolded timestamp line and the entry text.
    fn render_entry(&mut self, out: &mut String, speaker: &str, start: &Timestamp, text: &str) {
        match self.tracker.advance(speaker) {
            SectionChange::FirstSection => {
                let _ = write!(out, "## {}\n\n", speaker);
            }
            SectionChange::NewSection => {
                let _ = write!(out, "\n## {}\n\n", speaker);
            }
            SectionChange::SameSection => {}
        }

        let _ = write!(out, "**{}**  \n", start);
        let _ = write!(out, "{}\n\n", text);
    }
}
