//! Markup stripping
//!
//! Reduces Markdown and wiki markup to readable plain text so that two
//! documents can be compared on their content rather than their syntax.
//! The transform is lossy: it keeps what a reader would see and drops the
//! rest.
//!
//! Each format is an ordered list of rewrite stages. Stages are total:
//! markup a stage does not recognize is left in place.

mod markdown;
mod wiki;

pub use wiki::{MAX_TABLE_PASSES, MAX_TEMPLATE_PASSES};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The markup dialect of an input document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkupFormat {
    #[default]
    #[serde(rename = "plain")]
    PlainText,
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "wiki")]
    WikiMarkup,
}

impl MarkupFormat {
    /// Guess a format from a file extension, defaulting to plain text
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("md" | "markdown" | "mdown" | "mkd") => MarkupFormat::Markdown,
            Some("wiki" | "wikitext" | "mediawiki") => MarkupFormat::WikiMarkup,
            _ => MarkupFormat::PlainText,
        }
    }
}

impl FromStr for MarkupFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" | "txt" => Ok(MarkupFormat::PlainText),
            "markdown" | "md" => Ok(MarkupFormat::Markdown),
            "wiki" | "wikitext" | "mediawiki" => Ok(MarkupFormat::WikiMarkup),
            other => Err(format!(
                "unknown format '{other}' (expected plain, markdown or wiki)"
            )),
        }
    }
}

impl fmt::Display for MarkupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupFormat::PlainText => f.write_str("plain"),
            MarkupFormat::Markdown => f.write_str("markdown"),
            MarkupFormat::WikiMarkup => f.write_str("wiki"),
        }
    }
}

/// Strip markup from `text`, returning plain text.
///
/// Plain text and empty input are returned unchanged.
pub fn normalize(text: &str, format: MarkupFormat) -> String {
    if text.is_empty() {
        return String::new();
    }
    let result = match format {
        MarkupFormat::PlainText => return text.to_string(),
        MarkupFormat::Markdown => markdown::strip(text),
        MarkupFormat::WikiMarkup => wiki::strip(text),
    };
    tracing::debug!(
        %format,
        input_len = text.len(),
        output_len = result.len(),
        "stripped markup"
    );
    result
}

/// A single regex rewrite
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// Run rules in order, each over the previous one's output
fn apply_rules(rules: &[Rule], text: String) -> String {
    rules.iter().fold(text, |acc, rule| rule.apply(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_identity() {
        for text in ["", "  spaced  ", "**not stripped**", "[[Link]]\n{{t}}"] {
            assert_eq!(normalize(text, MarkupFormat::PlainText), text);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize("", MarkupFormat::Markdown), "");
        assert_eq!(normalize("", MarkupFormat::WikiMarkup), "");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            MarkupFormat::from_path(Path::new("notes/README.MD")),
            MarkupFormat::Markdown
        );
        assert_eq!(
            MarkupFormat::from_path(Path::new("page.wikitext")),
            MarkupFormat::WikiMarkup
        );
        assert_eq!(
            MarkupFormat::from_path(Path::new("plain.txt")),
            MarkupFormat::PlainText
        );
        assert_eq!(
            MarkupFormat::from_path(Path::new("no_extension")),
            MarkupFormat::PlainText
        );
    }

    #[test]
    fn test_format_parse_and_display() {
        for format in [
            MarkupFormat::PlainText,
            MarkupFormat::Markdown,
            MarkupFormat::WikiMarkup,
        ] {
            assert_eq!(format.to_string().parse::<MarkupFormat>(), Ok(format));
        }
        assert_eq!("MD".parse::<MarkupFormat>(), Ok(MarkupFormat::Markdown));
        assert!("html".parse::<MarkupFormat>().is_err());
    }
}
