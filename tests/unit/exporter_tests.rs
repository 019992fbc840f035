/*!
 * Tests for Markdown rendering and speaker-section tracking
 */

use vttclean::exporter::{MarkdownExporter, SectionChange, SectionState, SectionTracker};
use crate::common;

/// Count occurrences of a substring
fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Test the section reducer walks NoSectionYet -> InSection transitions
#[test]
fn test_section_tracker_withSpeakerSequence_shouldReportChanges() {
    let mut tracker = SectionTracker::new();
    assert_eq!(tracker.state(), SectionState::NoSectionYet);

    assert_eq!(tracker.advance("Alice"), SectionChange::FirstSection);
    assert_eq!(tracker.advance("Alice"), SectionChange::SameSection);
    assert_eq!(tracker.advance("Bob"), SectionChange::NewSection);
    assert_eq!(tracker.advance("Alice"), SectionChange::NewSection);
    assert_eq!(tracker.state(), SectionState::InSection("Alice".to_string()));
}

/// Test the raw document shape: title, subtitle, one heading per speaker run
#[test]
fn test_render_raw_withTwoSpeakers_shouldSectionBySpeaker() {
    let turns = vec![
        common::turn("Alice", 1, 3, "Good morning."),
        common::turn("Alice", 5, 8, "Let's start."),
        common::turn("Bob", 10, 12, "Thanks."),
    ];

    let doc = MarkdownExporter::render_raw(&turns);

    assert!(doc.starts_with("# Meeting Transcript\n\n*Grouped by speaker with timestamps*\n\n"));
    assert_eq!(count(&doc, "## Alice"), 1);
    assert_eq!(count(&doc, "## Bob"), 1);
    assert_eq!(count(&doc, "**"), 6); // three bolded timestamp lines
    assert!(doc.contains("**00:00:01.000**  \nGood morning.\n\n"));

    // Separator line appears between sections, not before the first one
    assert!(!doc.contains("timestamps*\n\n\n"));
    assert!(doc.contains("\n\n## Bob"));
}

/// Test the raw document for an empty turn sequence is just the header
#[test]
fn test_render_raw_withNoTurns_shouldBeHeaderOnly() {
    let doc = MarkdownExporter::render_raw(&[]);
    assert_eq!(doc, MarkdownExporter::raw_header());
}

/// Test the cleaned header carries no subtitle
#[test]
fn test_cleaned_header_shouldOnlyHaveTitle() {
    assert_eq!(MarkdownExporter::cleaned_header(), "# Cleaned Meeting Transcript\n\n");
}

/// Test the skip-and-reattribute property: an empty replacement contributes
/// nothing and does not trigger or suppress a heading
#[test]
fn test_render_batch_withEmptyMiddleEntry_shouldSkipAndReattribute() {
    let batch = vec![
        common::turn("A", 0, 1, "original x"),
        common::turn("A", 2, 3, "original dropped"),
        common::turn("B", 4, 5, "original y"),
    ];
    let replacements = vec!["x".to_string(), "".to_string(), "y".to_string()];

    let mut exporter = MarkdownExporter::new();
    let doc = exporter.render_batch(&batch, &replacements);

    assert_eq!(count(&doc, "## A"), 1);
    assert_eq!(count(&doc, "## B"), 1);
    assert!(!doc.contains("original dropped"));
    assert!(doc.contains("x\n\n"));
    assert!(doc.contains("y\n\n"));
}

/// Test an empty entry from another speaker does not break up a run:
/// heading count equals the count of maximal visible-speaker runs
#[test]
fn test_render_batch_withInvisibleSpeakerBetween_shouldKeepOneRun() {
    let batch = vec![
        common::turn("A", 0, 1, "first"),
        common::turn("B", 2, 3, "gone"),
        common::turn("A", 4, 5, "second"),
    ];
    let replacements = vec!["first".to_string(), "  \n ".to_string(), "second".to_string()];

    let mut exporter = MarkdownExporter::new();
    let doc = exporter.render_batch(&batch, &replacements);

    assert_eq!(count(&doc, "## A"), 1);
    assert_eq!(count(&doc, "## B"), 0);
}

/// Test section state persists across batches: a speaker run spanning a
/// batch boundary gets exactly one heading
#[test]
fn test_render_batch_withRunAcrossBatches_shouldNotRepeatHeading() {
    let batch1 = vec![common::turn("Alice", 0, 1, "part one")];
    let batch2 = vec![
        common::turn("Alice", 2, 3, "part two"),
        common::turn("Bob", 4, 5, "reply"),
    ];

    let mut exporter = MarkdownExporter::new();
    let doc1 = exporter.render_batch(&batch1, &["part one".to_string()]);
    let doc2 = exporter.render_batch(&batch2, &["part two".to_string(), "reply".to_string()]);

    let combined = format!("{}{}", doc1, doc2);
    assert_eq!(count(&combined, "## Alice"), 1);
    assert_eq!(count(&combined, "## Bob"), 1);

    // The continuation entry starts directly with its timestamp line
    assert!(doc2.starts_with("**"));
}

/// Test every visible entry renders its bolded timestamp and text
#[test]
fn test_render_batch_withVisibleEntries_shouldRenderTimestampLines() {
    let batch = vec![
        common::turn("Alice", 61, 62, "one"),
        common::turn("Alice", 63, 64, "two"),
    ];
    let replacements = vec!["one".to_string(), "two".to_string()];

    let mut exporter = MarkdownExporter::new();
    let doc = exporter.render_batch(&batch, &replacements);

    assert!(doc.contains("**00:01:01.000**  \none\n\n"));
    assert!(doc.contains("**00:01:03.000**  \ntwo\n\n"));
    assert_eq!(count(&doc, "## Alice"), 1);
}
