use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::cmp::Ordering;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::debug;

use crate::errors::TranscriptError;

// @module: WebVTT transcript parsing and speaker-turn grouping

// @const: VTT cue timing line regex
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+:\d+:\d+\.\d+)\s*-->\s*(\d+:\d+:\d+\.\d+)").unwrap()
});

// @const: Inline voice tag regex, e.g. <v Alice Johnson>
static VOICE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<v\s+([^>]+)>").unwrap()
});

/// A cue timestamp carrying the original `HH:MM:SS.mmm` text together with
/// the seconds value derived from it. The text is what gets rendered back
/// out; the seconds value is what gap arithmetic and ordering use.
#[derive(Debug, Clone)]
pub struct Timestamp {
    // @field: Original textual representation, carried through unchanged
    text: String,

    // @field: Derived seconds value
    seconds: f64,
}

impl Timestamp {
    /// Parse a `HH:MM:SS.mmm` timestamp. Fails if fewer than three
    /// colon-separated components are present or any component is not numeric.
    pub fn parse(text: &str) -> Result<Self, TranscriptError> {
        let seconds = Self::parse_seconds(text)?;
        Ok(Timestamp {
            text: text.to_string(),
            seconds,
        })
    }

    /// Convert a `HH:MM:SS.mmm` timestamp to seconds
    pub fn parse_seconds(text: &str) -> Result<f64, TranscriptError> {
        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() < 3 {
            return Err(TranscriptError::MalformedTimestamp(text.to_string()));
        }

        let hours: u64 = parts[0].trim().parse()
            .map_err(|_| TranscriptError::MalformedTimestamp(text.to_string()))?;
        let minutes: u64 = parts[1].trim().parse()
            .map_err(|_| TranscriptError::MalformedTimestamp(text.to_string()))?;
        let seconds: f64 = parts[2].trim().parse()
            .map_err(|_| TranscriptError::MalformedTimestamp(text.to_string()))?;

        Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
    }

    /// Seconds since the start of the recording
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// The original textual representation
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.seconds.total_cmp(&other.seconds) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds.total_cmp(&other.seconds)
    }
}

// @struct: Single parsed caption cue
#[derive(Debug, Clone)]
pub struct Cue {
    // @field: Cue identifier line
    pub id: String,

    // @field: Cue start time
    pub start: Timestamp,

    // @field: Cue end time
    pub end: Timestamp,

    // @field: Speaker name, "Unknown" when no voice tag was present
    pub speaker: String,

    // @field: Cue text with voice-tag markup stripped
    pub text: String,
}

impl Cue {
    /// Creates a new cue - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(
        id: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
        speaker: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Cue {
            id: id.into(),
            start,
            end,
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(f, "{} --> {}", self.start, self.end)?;
        writeln!(f, "{}: {}", self.speaker, self.text)
    }
}

/// A maximal run of time-contiguous cues attributed to one speaker
#[derive(Debug, Clone)]
pub struct Turn {
    /// Speaker name shared by every cue in the turn
    pub speaker: String,

    /// Start time of the first cue
    pub start: Timestamp,

    /// End time of the last cue
    pub end: Timestamp,

    /// The cues making up the turn, in source order
    pub cues: Vec<Cue>,
}

impl Turn {
    /// Build a turn from a non-empty run of same-speaker cues
    fn from_cues(cues: Vec<Cue>) -> Self {
        debug_assert!(!cues.is_empty(), "a turn always holds at least one cue");
        Turn {
            speaker: cues[0].speaker.clone(),
            start: cues[0].start.clone(),
            end: cues[cues.len() - 1].end.clone(),
            cues,
        }
    }

    /// Combined text of all cues, joined with single spaces
    pub fn full_text(&self) -> String {
        self.cues
            .iter()
            .map(|cue| cue.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} ({} --> {})", self.speaker, self.start, self.end)?;
        writeln!(f, "{}", self.full_text())
    }
}

/// Collection of parsed cues with their source file
#[derive(Debug)]
pub struct CueCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Parsed cues in source order
    pub cues: Vec<Cue>,
}

impl CueCollection {
    /// Create an empty cue collection
    pub fn new(source_file: PathBuf) -> Self {
        CueCollection {
            source_file,
            cues: Vec::new(),
        }
    }

    /// Parse a WebVTT file into a cue collection
    pub fn parse_vtt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript file: {}", path.display()))?;

        Ok(CueCollection {
            source_file: path.to_path_buf(),
            cues: Self::parse_vtt_string(&content),
        })
    }

    /// Parse WebVTT content into cues.
    ///
    /// Content before and including the `WEBVTT` header line is skipped, then
    /// cue blocks are scanned line by line: an identifier line, a timing line
    /// containing `-->`, one or more text lines, and a blank terminator.
    /// A block whose timing line does not match the expected pattern is
    /// dropped without error. Empty content yields an empty cue list.
    pub fn parse_vtt_string(content: &str) -> Vec<Cue> {
        let lines: Vec<&str> = content.lines().collect();
        let mut i = 0;

        // Skip everything up to and including the WEBVTT header line
        while i < lines.len() && !lines[i].trim().starts_with("WEBVTT") {
            i += 1;
        }
        if i >= lines.len() {
            return Vec::new();
        }
        i += 1;

        // Skip blank lines after the header
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }

        let mut cues = Vec::new();
        let mut current_id: Option<String> = None;
        let mut current_timing: Option<String> = None;
        let mut current_text: Vec<String> = Vec::new();

        while i < lines.len() {
            let line = lines[i].trim();

            // Blank line terminates the current record
            if line.is_empty() {
                Self::flush_record(&mut cues, &mut current_id, &mut current_timing, &mut current_text);
                i += 1;
                continue;
            }

            if current_timing.is_some() {
                // Once the timing line is held, every non-blank line is text
                current_text.push(line.to_string());
            } else if line.contains("-->") {
                current_timing = Some(line.to_string());
            } else {
                // Identifier line; a later one overwrites a pending identifier
                current_id = Some(line.to_string());
            }
            i += 1;
        }

        // A record reaching end-of-input without a trailing blank line
        // still gets emitted
        Self::flush_record(&mut cues, &mut current_id, &mut current_timing, &mut current_text);

        cues
    }

    /// Finish the pending record: emit a cue when identifier, timing line and
    /// text were all collected, otherwise discard the partial record.
    fn flush_record(
        cues: &mut Vec<Cue>,
        current_id: &mut Option<String>,
        current_timing: &mut Option<String>,
        current_text: &mut Vec<String>,
    ) {
        let id = current_id.take();
        let timing = current_timing.take();
        let text_lines = std::mem::take(current_text);

        let (Some(id), Some(timing)) = (id, timing) else {
            return;
        };
        if text_lines.is_empty() {
            return;
        }

        let Some(caps) = TIMING_REGEX.captures(&timing) else {
            debug!("Skipping cue block {}: unrecognized timing line: {}", id, timing);
            return;
        };

        let (Ok(start), Ok(end)) = (Timestamp::parse(&caps[1]), Timestamp::parse(&caps[2])) else {
            debug!("Skipping cue block {}: unparseable timestamps in: {}", id, timing);
            return;
        };

        let joined = text_lines.join(" ");
        let (speaker, text) = Self::extract_speaker(&joined);

        cues.push(Cue {
            id,
            start,
            end,
            speaker,
            text,
        });
    }

    /// Extract the speaker from a `<v Name>` voice tag, stripping all
    /// voice-tag markup from the text. Without a tag the speaker is "Unknown"
    /// and the text is used verbatim.
    fn extract_speaker(text: &str) -> (String, String) {
        match VOICE_TAG_REGEX.captures(text) {
            Some(caps) => {
                let speaker = caps[1].trim().to_string();
                let stripped = VOICE_TAG_REGEX.replace_all(text, "");
                let stripped = stripped.replace("</v>", "");
                (speaker, stripped.trim().to_string())
            }
            None => ("Unknown".to_string(), text.to_string()),
        }
    }

    /// Group this collection's cues into speaker turns
    pub fn group_into_turns(&self, max_gap_seconds: f64) -> Vec<Turn> {
        group_cues(&self.cues, max_gap_seconds)
    }
}

impl fmt::Display for CueCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Transcript Cue Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}

/// Group an ordered cue sequence into speaker turns.
///
/// Consecutive cues merge into the current turn while they share its speaker
/// and the silence between the previous cue's end and the next cue's start
/// stays within `max_gap_seconds`. The cue order is taken as given: no
/// reordering happens, and a negative gap (overlapping cues) still merges
/// when the speaker matches.
pub fn group_cues(cues: &[Cue], max_gap_seconds: f64) -> Vec<Turn> {
    let mut turns = Vec::new();
    let mut current: Vec<Cue> = Vec::new();

    for cue in cues {
        if let Some(last) = current.last() {
            let gap = cue.start.seconds() - last.end.seconds();
            if cue.speaker == last.speaker && gap <= max_gap_seconds {
                current.push(cue.clone());
                continue;
            }
            turns.push(Turn::from_cues(std::mem::take(&mut current)));
        }
        current.push(cue.clone());
    }

    if !current.is_empty() {
        turns.push(Turn::from_cues(current));
    }

    turns
}
