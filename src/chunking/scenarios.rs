use tracing::{debug, trace};

use super::types::{ChunkRecord, Extraction};

pub const DEFAULT_MARKER: &str = "Scenario";

#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    /// Keyword a trimmed line must start with to open a new section
    pub marker: String,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

struct Section<'a> {
    title: &'a str,
    start: usize,
    end: usize,
}

/// Split a feature file into one chunk per marker line.
///
/// Each chunk runs from its marker line up to the next marker. Lines before the first
/// marker are not part of any scenario.
pub fn segment_scenarios(text: &str, source: &str, options: &ScenarioOptions) -> Extraction {
    let mut extraction = Extraction::default();
    let mut current: Option<Section> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let trimmed = line.trim();

        if trimmed.starts_with(options.marker.as_str()) {
            if let Some(section) = current.take() {
                finish(&mut extraction, text, source, section);
            }
            current = Some(Section {
                title: trimmed,
                start,
                end: offset,
            });
        } else if let Some(section) = current.as_mut() {
            section.end = offset;
        } else if !trimmed.is_empty() {
            trace!("Ignoring preamble line in {}: {}", source, trimmed);
        }
    }

    if let Some(section) = current {
        finish(&mut extraction, text, source, section);
    }

    debug!("Extracted {} scenarios from {}", extraction.chunks.len(), source);

    extraction
}

fn finish(extraction: &mut Extraction, text: &str, source: &str, section: Section) {
    extraction.push(ChunkRecord::scenario(
        source,
        section.title,
        &text[section.start..section.end],
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkKind;

    const FEATURE: &str = "\n\nFeature: Checkout\n  As a shopper\n\n  Scenario: Pay by card\n    Given a cart\n\n    When I pay\n    Then I see a receipt\n\n  Scenario Outline: Pay with <method>\n    Given <method>\n\n    Examples:\n      | method |\n      | cash   |\n";

    fn segment(text: &str) -> Extraction {
        segment_scenarios(text, "checkout.feature", &ScenarioOptions::default())
    }

    #[test]
    fn test_one_chunk_per_marker() {
        let extraction = segment(FEATURE);
        let names: Vec<_> = extraction.chunks.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["Scenario: Pay by card", "Scenario Outline: Pay with <method>"]);
        assert!(extraction.chunks.iter().all(|c| c.kind == ChunkKind::BehaviorScenario));
        assert!(extraction.chunks.iter().all(|c| c.container.is_none()));
    }

    #[test]
    fn test_content_runs_to_next_marker_and_keeps_inner_blanks() {
        let extraction = segment(FEATURE);

        assert_eq!(
            extraction.chunks[0].content,
            "Scenario: Pay by card\n    Given a cart\n\n    When I pay\n    Then I see a receipt"
        );
        assert!(extraction.chunks[1].content.ends_with("| cash   |"));
    }

    #[test]
    fn test_two_scenarios_with_steps() {
        let text = "Scenario: A\n  Given x\nScenario: B\n  Given y\n  Then z\n";
        let extraction = segment(text);

        assert_eq!(extraction.chunks.len(), 2);
        assert_eq!(extraction.chunks[0].content, "Scenario: A\n  Given x");
        assert_eq!(extraction.chunks[1].name, "Scenario: B");
        assert_eq!(extraction.chunks[1].content, "Scenario: B\n  Given y\n  Then z");
    }

    #[test]
    fn test_leading_blank_lines_are_dropped() {
        let extraction = segment("\n\n   \nScenario: Only\n  Given x\n");

        assert_eq!(extraction.chunks.len(), 1);
        assert_eq!(extraction.chunks[0].content, "Scenario: Only\n  Given x");
    }

    #[test]
    fn test_marker_without_steps() {
        let extraction = segment("Scenario: A\nScenario: B");

        assert_eq!(extraction.chunks.len(), 2);
        assert_eq!(extraction.chunks[0].content, "Scenario: A");
        assert_eq!(extraction.chunks[1].content, "Scenario: B");
    }

    #[test]
    fn test_no_markers() {
        assert!(segment("Feature: Nothing here\n  Some text\n").chunks.is_empty());
    }

    #[test]
    fn test_indented_markers_are_flat() {
        let text = "Scenario: Outer\n      Scenario: Nested\n  Given x\n";
        let extraction = segment(text);

        assert_eq!(extraction.chunks.len(), 2);
        assert_eq!(extraction.chunks[1].content, "Scenario: Nested\n  Given x");
    }

    #[test]
    fn test_crlf_is_preserved_inside_content() {
        let extraction = segment("Scenario: A\r\n  Given x\r\n");

        assert_eq!(extraction.chunks[0].name, "Scenario: A");
        assert_eq!(extraction.chunks[0].content, "Scenario: A\r\n  Given x");
    }

    #[test]
    fn test_custom_marker() {
        let options = ScenarioOptions {
            marker: "Rule".to_string(),
        };
        let extraction = segment_scenarios("Rule: one\n  x\nRule: two\n", "r.feature", &options);

        assert_eq!(extraction.chunks.len(), 2);
    }
}
