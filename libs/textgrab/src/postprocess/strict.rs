use once_cell::sync::Lazy;
use regex::Regex;

use crate::image2text::Fragment;

static SKIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d+月\d+日",          // date
        r"^[上下]午\d+:\d+",      // time
        r"^Open\s",
        r"^S\s?Code",
        r"^f\d+\s",              // function key hints
        r"^@id:",
        r"^import[（(]",
        r#"^""#,                 // quoted strings
        r"^\d+$",                // line numbers
        r"^Step\s+Id:",
        r"uses\s+Open\s+VSX",
        r"marketplace",
        r"Checked\s+command",
        r"^回\s",                 // icon glyphs
        r"^[〉›>\[\]{}()]+$",     // brackets only
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static RE_HAN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Han}{3,}").unwrap());

const CONTENT_INDICATORS: &[&str] = &[
    "✅", "❌", "🚀", "📝", "📸", "🔍", "⏱️", "⚠️", "回應", "已送出", "執行", "完成", "失敗", "成功",
];

const LONG_LINE_CHARS: usize = 20;
const MIN_KEPT_CHARS: usize = 50;
const MIN_INPUT_CHARS: usize = 100;

fn is_skipped(text: &str) -> bool {
    SKIP_PATTERNS.iter().any(|re| re.is_match(text))
}

fn looks_like_content(text: &str) -> bool {
    CONTENT_INDICATORS.iter().any(|indicator| text.contains(indicator))
        || RE_HAN_RUN.is_match(text)
        || text.chars().count() > LONG_LINE_CHARS
}

fn total_chars(lines: &[Fragment]) -> usize {
    lines.iter().map(|line| line.text.chars().count()).sum()
}

/// Keeps only lines that read like messages or prose.
///
/// Falls back to the unfiltered lines when the filter would leave almost
/// nothing of a substantial input.
pub fn apply_strict_filter(lines: Vec<Fragment>) -> Vec<Fragment> {
    let kept: Vec<Fragment> = lines
        .iter()
        .filter(|line| !is_skipped(&line.text) && looks_like_content(&line.text))
        .cloned()
        .collect();

    let kept_chars = total_chars(&kept);
    let input_chars = total_chars(&lines);
    if kept_chars < MIN_KEPT_CHARS && input_chars > MIN_INPUT_CHARS {
        log::warn!(
            "Strict filter kept {} of {} characters, returning lines unfiltered",
            kept_chars,
            input_chars
        );
        return lines;
    }

    log::debug!("Strict filter kept {} of {} lines", kept.len(), lines.len());
    kept
}
