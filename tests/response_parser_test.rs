// ABOUTME: Tests for section extraction from free-text model output
// ABOUTME: Exercises representative malformed and partial responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use energy_forecast::interpretation::{parse_sections, ParsedSections};

#[test]
fn test_markdown_headings_fill_every_section() {
    let text = "## Interpretation\nA steady day.\n\n## Guidance\nRest.\n\n## Key Insights\n• one\n• two\n\n## Next Steps\n- walk\n\n## Integration\nDone.";

    let parsed = parse_sections(text);

    assert_eq!(parsed.interpretation, "A steady day.");
    assert_eq!(parsed.guidance, "Rest.");
    assert_eq!(parsed.insights, vec!["one", "two"]);
    assert_eq!(parsed.steps, vec!["walk"]);
    assert_eq!(parsed.integration, "Done.");
}

#[test]
fn test_bold_inline_headings() {
    let text = "**Interpretation:** a quiet start\n**Guidance:** keep meetings short";

    let parsed = parse_sections(text);

    assert_eq!(parsed.interpretation, "a quiet start");
    assert_eq!(parsed.guidance, "keep meetings short");
    assert!(parsed.insights.is_empty());
}

#[test]
fn test_numbered_uppercase_headings() {
    let text = "1. INTERPRETATION\nBright.\n2. GUIDANCE\nAct early.\n3. Practical Steps\n1) Plan\n2) Do";

    let parsed = parse_sections(text);

    assert_eq!(parsed.interpretation, "Bright.");
    assert_eq!(parsed.guidance, "Act early.");
    assert_eq!(parsed.steps, vec!["Plan", "Do"]);
}

#[test]
fn test_text_without_headings_becomes_interpretation() {
    let parsed = parse_sections("  Insights are everywhere today.\nTake it slow.  ");

    assert_eq!(parsed.interpretation, "Insights are everywhere today.\nTake it slow.");
    assert!(parsed.guidance.is_empty());
    assert!(parsed.insights.is_empty());
}

#[test]
fn test_empty_output_yields_empty_sections() {
    assert_eq!(parse_sections(""), ParsedSections::default());
    assert_eq!(parse_sections("   \n"), ParsedSections::default());
}

#[test]
fn test_truncated_output_keeps_what_arrived() {
    let parsed = parse_sections("## Interpretation\nA long day ahead.\n## Guidance\n");

    assert_eq!(parsed.interpretation, "A long day ahead.");
    assert!(parsed.guidance.is_empty());
    assert!(parsed.integration.is_empty());
}

#[test]
fn test_out_of_order_headings_do_not_overlap() {
    let parsed = parse_sections("## Guidance\nFirst.\n## Interpretation\nSecond.");

    assert_eq!(parsed.interpretation, "Second.");
    assert!(parsed.guidance.is_empty());
}

#[test]
fn test_insight_items_join_wrapped_lines() {
    let text = "## Insights\n- energy rises\n  after noon\n* patience helps\n\n## Integration\nCarry on.";

    let parsed = parse_sections(text);

    assert_eq!(parsed.insights, vec!["energy rises after noon", "patience helps"]);
    assert_eq!(parsed.integration, "Carry on.");
}
