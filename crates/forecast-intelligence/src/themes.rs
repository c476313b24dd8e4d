// ABOUTME: Theme extraction from symbolic readings and synthesis text
// ABOUTME: Frequency ranking with first-appearance tie breaking, case-insensitive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Energy Forecast Contributors

use crate::constants::limits::MAX_KEY_THEMES;
use crate::models::SymbolicReading;
use serde_json::Value;

/// Reading fields that carry theme lists
const THEME_FIELDS: [&str; 4] = ["themes", "keywords", "key_themes", "keyThemes"];

/// Words recognized as themes in free text
const THEME_LEXICON: [&str; 20] = [
    "abundance",
    "balance",
    "change",
    "clarity",
    "communication",
    "connection",
    "courage",
    "creativity",
    "focus",
    "growth",
    "harmony",
    "intuition",
    "patience",
    "reflection",
    "renewal",
    "rest",
    "stability",
    "transformation",
    "wisdom",
    "purpose",
];

/// Title-case a theme for display
fn display_form(theme: &str) -> String {
    theme
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rank themes by frequency; ties keep first appearance order
///
/// Comparison is case-insensitive and the result is title-cased.
#[must_use]
pub fn rank_themes<'a, I>(themes: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for theme in themes {
        let key = theme.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    // stable sort keeps first appearance among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(key, _)| display_form(&key))
        .collect()
}

fn collect_theme_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>, depth: usize) {
    let Some(map) = value.as_object() else {
        return;
    };
    for field in THEME_FIELDS {
        if let Some(Value::Array(items)) = map.get(field) {
            out.extend(items.iter().filter_map(Value::as_str));
        }
    }
    if depth > 0 {
        for nested in map.values().filter(|v| v.is_object()) {
            collect_theme_strings(nested, out, depth - 1);
        }
    }
}

/// Themes named by the readings plus lexicon words found in the synthesis,
/// ranked and capped
#[must_use]
pub fn extract_themes(readings: &[SymbolicReading], synthesis: &str) -> Vec<String> {
    let mut found: Vec<&str> = Vec::new();
    for reading in readings {
        collect_theme_strings(&reading.data, &mut found, 1);
    }

    let lowered = synthesis.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mut lexicon_hits: Vec<&str> = Vec::new();
    for word in &words {
        if let Some(entry) = THEME_LEXICON.iter().find(|entry| *entry == word) {
            lexicon_hits.push(*entry);
        }
    }

    rank_themes(found.into_iter().chain(lexicon_hits), MAX_KEY_THEMES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rank_by_frequency_then_first_appearance() {
        let ranked = rank_themes(
            ["focus", "Growth", "balance", "growth", "Balance", "rest"],
            3,
        );
        assert_eq!(ranked, vec!["Growth", "Balance", "Focus"]);
    }

    #[test]
    fn test_multi_word_display_form() {
        assert_eq!(rank_themes(["inner WISDOM"], 5), vec!["Inner Wisdom"]);
        assert!(rank_themes(["  ", ""], 5).is_empty());
    }

    #[test]
    fn test_extract_from_readings_and_synthesis() {
        let readings = vec![
            SymbolicReading {
                engine: "iching".to_owned(),
                data: json!({ "hexagram": { "keywords": ["patience", "renewal"] } }),
            },
            SymbolicReading {
                engine: "tarot".to_owned(),
                data: json!({ "themes": ["transformation", "patience"], "cards": [] }),
            },
        ];
        let themes = extract_themes(
            &readings,
            "A day of transformation; patience brings clarity.",
        );
        assert_eq!(themes[0], "Patience");
        assert_eq!(themes[1], "Transformation");
        assert!(themes.contains(&"Renewal".to_owned()));
        assert!(themes.contains(&"Clarity".to_owned()));
        assert!(themes.len() <= MAX_KEY_THEMES);
    }
}
