// ABOUTME: Best-effort extraction of labeled sections from free-text model output
// ABOUTME: Never fails; sections that cannot be located come back empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

//! Headings are searched in a fixed order, each search starting where the
//! previous heading ended, so matched windows never overlap. A section's body
//! runs until the next heading that was found.
//!
//! Accepted heading shapes (case-insensitive):
//!
//! ```text
//! ## Guidance
//! **Insights:**
//! 3. Practical Steps
//! Integration: text may continue on the same line
//! ```

use regex::{Match, Regex};
use std::sync::LazyLock;

/// Sections extracted from a synthesis response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    /// Narrative overview of the day
    pub interpretation: String,
    /// Direct advice
    pub guidance: String,
    /// Observations, one per item
    pub insights: Vec<String>,
    /// Concrete actions, one per item
    pub steps: Vec<String>,
    /// Closing paragraph
    pub integration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Interpretation,
    Guidance,
    Insights,
    Steps,
    Integration,
}

const SEARCH_ORDER: [Section; 5] = [
    Section::Interpretation,
    Section::Guidance,
    Section::Insights,
    Section::Steps,
    Section::Integration,
];

fn heading_regex(keywords: &str) -> Option<Regex> {
    // groups: 1 hashes, 2 bold, 3 list number, 4 bold, 5 bold, 6 colon, 7 bold
    Regex::new(&format!(
        r"(?im)^[ \t]*(#{{1,6}}[ \t]*)?(\*\*|__)?(\d+[.)][ \t]*)?(\*\*|__)?[ \t]*(?:{keywords})\b[ \t]*(\*\*|__)?[ \t]*(:)?[ \t]*(\*\*|__)?[ \t]*"
    ))
    .ok()
}

static INTERPRETATION_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| heading_regex(r"(?:overall[ \t]+|daily[ \t]+)?(?:interpretation|overview)"));
static GUIDANCE_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| heading_regex(r"(?:daily[ \t]+)?(?:guidance|advice)"));
static INSIGHTS_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| heading_regex(r"(?:key[ \t]+)?insights"));
static STEPS_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| heading_regex(r"(?:practical[ \t]+|action[ \t]+|next[ \t]+)?steps|action[ \t]+items"));
static INTEGRATION_HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| heading_regex(r"integration"));

static LIST_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•+]|\d+[.)])\s+").ok());

impl Section {
    fn heading(self) -> Option<&'static Regex> {
        let pattern = match self {
            Self::Interpretation => &INTERPRETATION_HEADING,
            Self::Guidance => &GUIDANCE_HEADING,
            Self::Insights => &INSIGHTS_HEADING,
            Self::Steps => &STEPS_HEADING,
            Self::Integration => &INTEGRATION_HEADING,
        };
        pattern.as_ref()
    }
}

/// A plain sentence that happens to start with a keyword is not a heading
fn is_heading(text: &str, captures: &regex::Captures<'_>, whole: Match<'_>) -> bool {
    let decorated = [1, 2, 3, 4, 5, 6, 7]
        .iter()
        .any(|i| captures.get(*i).is_some());
    if decorated {
        return true;
    }
    let rest_of_line = text[whole.end()..].lines().next().unwrap_or("");
    rest_of_line.trim().is_empty()
}

struct Located {
    section: Section,
    start: usize,
    body_start: usize,
}

fn locate(text: &str) -> Vec<Located> {
    let mut found = Vec::new();
    let mut cursor = 0;
    for section in SEARCH_ORDER {
        let Some(regex) = section.heading() else {
            continue;
        };
        let hit = regex.captures_iter(&text[cursor..]).find_map(|captures| {
            let whole = captures.get(0)?;
            let start = cursor + whole.start();
            let at_line_start = start == 0 || text[..start].ends_with('\n');
            (at_line_start && is_heading(&text[cursor..], &captures, whole)).then(|| Located {
                section,
                start,
                body_start: cursor + whole.end(),
            })
        });
        if let Some(located) = hit {
            cursor = located.body_start;
            found.push(located);
        }
    }
    found
}

fn split_items(body: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut current_is_item = false;
    for line in body.lines().map(str::trim) {
        if line.is_empty() {
            current_is_item = false;
            continue;
        }
        let marker = LIST_MARKER.as_ref().and_then(|re| re.find(line));
        match marker {
            Some(m) => {
                items.push(line[m.end()..].trim().to_owned());
                current_is_item = true;
            }
            None => match items.last_mut() {
                Some(last) if current_is_item => {
                    last.push(' ');
                    last.push_str(line);
                }
                _ => {
                    items.push(line.to_owned());
                    current_is_item = true;
                }
            },
        }
    }
    items.retain(|item| !item.is_empty());
    items
}

/// Extract the five labeled sections from a model response
///
/// When no heading at all is found, the whole trimmed text becomes the
/// interpretation.
#[must_use]
pub fn parse_sections(text: &str) -> ParsedSections {
    let located = locate(text);
    if located.is_empty() {
        return ParsedSections {
            interpretation: text.trim().to_owned(),
            ..ParsedSections::default()
        };
    }

    let mut parsed = ParsedSections::default();
    for (index, entry) in located.iter().enumerate() {
        let end = located.get(index + 1).map_or(text.len(), |next| next.start);
        let body = text.get(entry.body_start..end).unwrap_or("").trim();
        match entry.section {
            Section::Interpretation => body.clone_into(&mut parsed.interpretation),
            Section::Guidance => body.clone_into(&mut parsed.guidance),
            Section::Insights => parsed.insights = split_items(body),
            Section::Steps => parsed.steps = split_items(body),
            Section::Integration => body.clone_into(&mut parsed.integration),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_requires_decoration_or_own_line() {
        let parsed = parse_sections("Guidance is something we all need.\n\n## Guidance\nRest early.");
        assert_eq!(parsed.guidance, "Rest early.");
    }

    #[test]
    fn test_inline_heading_body() {
        let parsed = parse_sections("Interpretation: a calm day.\nIntegration: carry it forward.");
        assert_eq!(parsed.interpretation, "a calm day.");
        assert_eq!(parsed.integration, "carry it forward.");
    }

    #[test]
    fn test_split_items_joins_continuations() {
        let items = split_items("- first point\n  continues here\n- second\n\n3. third");
        assert_eq!(items, vec!["first point continues here", "second", "third"]);
    }
}
