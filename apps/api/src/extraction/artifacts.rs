//! Artifact detection: flags text that is really undecoded PDF structure.

use std::sync::LazyLock;

use regex::RegexSet;

/// Structural markers of a raw PDF container. Any single hit marks the text
/// as contaminated.
static PDF_ARTIFACT_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // indirect object references: /Contents 4 0 R
        r"/\w+\s+\d+\s+\d+\s+R",
        // text object delimiters
        r"BT\s+ET",
        r"Td\s+Tj",
        // content stream bodies
        r"(?i)stream.*endstream",
        r"/Font\s+\d+\s+\d+\s+R",
        r"/Type\s+/Page",
        r"/MediaBox\s+\[",
        r"/Parent\s+\d+\s+\d+\s+R",
    ])
    .expect("artifact patterns are valid")
});

/// Returns true when `text` contains leftover PDF markup rather than prose.
pub fn looks_like_binary_artifact(text: &str) -> bool {
    PDF_ARTIFACT_PATTERNS.is_match(text)
}
