//! Markdown stripping

use super::{apply_rules, Rule};
use std::sync::LazyLock;

// Fenced code goes first so its content is never read as emphasis.
static MARKDOWN_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // Fenced code blocks
        Rule::new(r"(?s)```.*?```", ""),
        // Inline code
        Rule::new(r"`([^`]+)`", "${1}"),
        // Raw HTML tags
        Rule::new(r"<[^>]+>", ""),
        // Images keep their alt text
        Rule::new(r"!\[([^\]]*)\]\([^)]+\)", "${1}"),
        // Links keep their text
        Rule::new(r"\[([^\]]+)\]\([^)]+\)", "${1}"),
        // Emphasis
        Rule::new(r"\*\*([^*]+)\*\*", "${1}"),
        Rule::new(r"__([^_]+)__", "${1}"),
        Rule::new(r"\*([^*]+)\*", "${1}"),
        Rule::new(r"_([^_]+)_", "${1}"),
        Rule::new(r"~~([^~]+)~~", "${1}"),
        // Headings
        Rule::new(r"(?m)^#{1,6}\s+", ""),
        // Blockquotes
        Rule::new(r"(?m)^>\s+", ""),
        // Bullet and ordered list markers
        Rule::new(r"(?m)^[*+-]\s+", ""),
        Rule::new(r"(?m)^\d+\.\s+", ""),
        // Horizontal rules
        Rule::new(r"(?m)^[-*]{3,}$", ""),
        // Table separator rows
        Rule::new(r"(?m)^\|[\s\-|:]+\|$", ""),
        // Remaining table pipes
        Rule::new(r"\|", " "),
        // Footnote references
        Rule::new(r"\[\^[^\]]+\]", ""),
        // Task list checkboxes
        Rule::new(r"(?m)^\s*\[[ xX]\]\s+", ""),
    ]
});

pub(super) fn strip(text: &str) -> String {
    apply_rules(&MARKDOWN_RULES, text.to_string())
        .trim()
        .to_string()
}
