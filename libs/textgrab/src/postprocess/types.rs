use serde::{Deserialize, Serialize};

/// Literal patterns marking interface chrome rather than document content:
/// menu and panel names, code syntax, breadcrumb glyphs, file extensions and
/// editor status messages.
///
/// Patterns are plain substrings with no word boundaries, so an extension
/// entry also rejects prose that merely contains it: `.go` drops
/// "example.gov" and `.rs` drops "our .rss feed". Callers reading documents
/// that mention such names should replace the list in their config.
pub const DEFAULT_DENYLIST: &[&str] = &[
    // menus and panels
    "File Edit",
    "Selection View",
    "EXPLORER",
    "OPEN EDITORS",
    "OUTLINE",
    "TIMELINE",
    "Source Control",
    "Open VSX",
    "marketplace",
    "Checked command",
    "Step Id:",
    "@id:",
    // code syntax
    "import (",
    "package main",
    "func (",
    "func main",
    "#include",
    "})",
    ":=",
    "=>",
    "fn main",
    // breadcrumbs
    " › ",
    " > ",
    "〉",
    // file extensions
    ".go",
    ".swift",
    ".rs",
    ".json",
    ".yaml",
    ".md",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Fragments shorter than this after trimming are recognition noise.
    pub min_chars: usize,
    /// Maximum vertical distance between consecutive fragments of one group,
    /// as a fraction of the image height.
    pub proximity_threshold: f64,
    pub denylist: Vec<String>,
    pub strict: bool,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            min_chars: Self::get_default_min_chars(),
            proximity_threshold: Self::get_default_proximity_threshold(),
            denylist: DEFAULT_DENYLIST.iter().map(|p| p.to_string()).collect(),
            strict: false,
        }
    }
}

impl PostProcessConfig {
    pub fn get_default_min_chars() -> usize {
        2
    }

    pub fn get_default_proximity_threshold() -> f64 {
        0.05
    }
}
