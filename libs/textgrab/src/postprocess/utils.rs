use std::cmp::Ordering;

use super::strict::apply_strict_filter;
use super::types::PostProcessConfig;
use crate::image2text::{Fragment, RecognitionResult};

fn compare_positions(a: &Fragment, b: &Fragment) -> Ordering {
    // NaN positions go last
    a.position
        .is_nan()
        .cmp(&b.position.is_nan())
        .then_with(|| a.position.partial_cmp(&b.position).unwrap_or(Ordering::Equal))
}

/// Returns true when `text` starts with or contains any denylisted pattern.
pub fn is_denied(text: &str, denylist: &[String]) -> bool {
    denylist
        .iter()
        .filter(|pattern| !pattern.is_empty())
        .any(|pattern| text.starts_with(pattern.as_str()) || text.contains(pattern.as_str()))
}

/// Sorts fragments top to bottom, trims them and drops noise and interface
/// chrome. Positions are kept so the survivors can be grouped.
pub fn prepare_lines(mut fragments: RecognitionResult, config: &PostProcessConfig) -> Vec<Fragment> {
    fragments.sort_by(compare_positions);

    let total = fragments.len();
    let lines: Vec<Fragment> = fragments
        .into_iter()
        .filter_map(|fragment| {
            let text = fragment.text.trim();
            if text.chars().count() < config.min_chars {
                log::trace!("Dropping short fragment {:?}", text);
                return None;
            }
            if is_denied(text, &config.denylist) {
                log::trace!("Dropping denylisted fragment {:?}", text);
                return None;
            }
            Some(Fragment::new(text, fragment.position))
        })
        .collect();

    log::debug!("Kept {} of {} fragments after noise filtering", lines.len(), total);

    if config.strict {
        apply_strict_filter(lines)
    } else {
        lines
    }
}

/// Splits lines into groups wherever two consecutive lines are further apart
/// than `threshold`.
pub fn group_lines(lines: &[Fragment], threshold: f64) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut previous_position: Option<f64> = None;

    for line in lines {
        if let Some(previous) = previous_position {
            if (line.position - previous).abs() > threshold && !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(line.text.clone());
        previous_position = Some(line.position);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Turns a recognition result into the lines to print, with one blank line
/// between groups and none after the last.
pub fn post_process(fragments: RecognitionResult, config: &PostProcessConfig) -> Vec<String> {
    let lines = prepare_lines(fragments, config);
    let groups = group_lines(&lines, config.proximity_threshold);

    let mut output = Vec::with_capacity(lines.len() + groups.len());
    for (i, group) in groups.into_iter().enumerate() {
        if i > 0 {
            output.push(String::new());
        }
        output.extend(group);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::DEFAULT_DENYLIST;

    fn fragments(items: &[(&str, f64)]) -> RecognitionResult {
        items.iter().map(|(text, y)| Fragment::new(*text, *y)).collect()
    }

    #[test]
    fn test_output_follows_top_to_bottom_order() {
        let output = post_process(
            fragments(&[("Hello", 0.90), ("World", 0.10)]),
            &PostProcessConfig::default(),
        );

        assert_eq!(output, vec!["World", "", "Hello"]);
    }

    #[test]
    fn test_single_character_is_dropped() {
        for position in [0.0, 0.5, 0.99] {
            let output = post_process(
                fragments(&[(" a ", position), ("kept line", 0.2)]),
                &PostProcessConfig::default(),
            );
            assert_eq!(output, vec!["kept line"]);
        }
    }

    #[test]
    fn test_min_chars_counts_characters_not_bytes() {
        let output = post_process(fragments(&[("完成", 0.1), ("好", 0.12)]), &PostProcessConfig::default());
        assert_eq!(output, vec!["完成"]);
    }

    #[test]
    fn test_import_statement_is_dropped() {
        let output = post_process(
            fragments(&[("import (", 0.3), ("  import (  ", 0.31), ("Plain text", 0.32)]),
            &PostProcessConfig::default(),
        );
        assert_eq!(output, vec!["Plain text"]);
    }

    #[test]
    fn test_denylist_matches_prefix_and_substring() {
        let denylist = vec!["EXPLORER".to_string(), ".go".to_string()];
        assert!(is_denied("EXPLORER: project", &denylist));
        assert!(is_denied("cmd > main.go", &denylist));
        assert!(!is_denied("Going home", &denylist));
        assert!(!is_denied("anything", &[String::new()]));
    }

    #[test]
    fn test_extension_entries_match_inside_words() {
        let input = fragments(&[("Visit example.gov today", 0.1), ("Subscribe to our .rss feed", 0.12)]);

        let default_output = post_process(input.clone(), &PostProcessConfig::default());
        assert!(default_output.is_empty());

        let config = PostProcessConfig {
            denylist: DEFAULT_DENYLIST
                .iter()
                .filter(|pattern| !matches!(**pattern, ".go" | ".rs"))
                .map(|pattern| pattern.to_string())
                .collect(),
            ..PostProcessConfig::default()
        };
        let output = post_process(input, &config);
        assert_eq!(output, vec!["Visit example.gov today", "Subscribe to our .rss feed"]);
    }

    #[test]
    fn test_denylist_is_configurable() {
        let config = PostProcessConfig {
            denylist: vec!["secret".to_string()],
            ..PostProcessConfig::default()
        };
        let output = post_process(
            fragments(&[("import (", 0.1), ("top secret memo", 0.11)]),
            &config,
        );
        assert_eq!(output, vec!["import ("]);
    }

    #[test]
    fn test_close_fragments_share_a_group() {
        let output = post_process(
            fragments(&[("First line", 0.50), ("Second line", 0.48)]),
            &PostProcessConfig::default(),
        );
        assert_eq!(output, vec!["Second line", "First line"]);
    }

    #[test]
    fn test_distant_fragments_are_separated_by_one_blank_line() {
        let output = post_process(
            fragments(&[("First line", 0.50), ("Second line", 0.40)]),
            &PostProcessConfig::default(),
        );
        assert_eq!(output, vec!["Second line", "", "First line"]);
    }

    #[test]
    fn test_gap_is_measured_between_surviving_fragments() {
        // the dropped fragment sits between the two kept ones
        let output = post_process(
            fragments(&[("Heading", 0.10), ("x", 0.14), ("Body text", 0.18)]),
            &PostProcessConfig::default(),
        );
        assert_eq!(output, vec!["Heading", "", "Body text"]);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let config = PostProcessConfig {
            proximity_threshold: 0.2,
            ..PostProcessConfig::default()
        };
        let output = post_process(fragments(&[("First line", 0.50), ("Second line", 0.40)]), &config);
        assert_eq!(output, vec!["Second line", "First line"]);
    }

    #[test]
    fn test_no_trailing_blank_line() {
        let output = post_process(
            fragments(&[("one", 0.1), ("two", 0.3), ("three", 0.6)]),
            &PostProcessConfig::default(),
        );
        assert_eq!(output, vec!["one", "", "two", "", "three"]);
        assert_ne!(output.last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_rerun_on_output_keeps_content() {
        let input = fragments(&[
            ("Meeting notes", 0.05),
            ("import (", 0.07),
            ("Agenda for Monday", 0.08),
            ("a", 0.2),
            ("Budget review", 0.4),
            ("Hiring plan", 0.42),
        ]);
        let config = PostProcessConfig::default();
        let first = post_process(input, &config);

        let rerun_input: RecognitionResult = first
            .iter()
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| Fragment::new(line.as_str(), i as f64 * (config.proximity_threshold * 2.0)))
            .collect();
        let second = post_process(rerun_input, &config);

        let content = |lines: &[String]| -> Vec<String> {
            lines.iter().filter(|l| !l.is_empty()).cloned().collect()
        };
        assert_eq!(content(&first), content(&second));
        assert_eq!(
            content(&first),
            vec!["Meeting notes", "Agenda for Monday", "Budget review", "Hiring plan"]
        );
    }

    #[test]
    fn test_empty_input_produces_empty_output() {
        let output = post_process(Vec::new(), &PostProcessConfig::default());
        assert!(output.is_empty());
        assert!(group_lines(&[], 0.05).is_empty());
    }

    #[test]
    fn test_nan_positions_sort_last() {
        let output = post_process(
            fragments(&[("Unknown spot", f64::NAN), ("Top line", 0.1)]),
            &PostProcessConfig::default(),
        );
        assert_eq!(output.first().map(String::as_str), Some("Top line"));
        assert_eq!(output.last().map(String::as_str), Some("Unknown spot"));
    }
}
