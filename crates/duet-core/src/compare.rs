//! The full comparison pipeline: normalize, align, build

use crate::diff::{DiffBuilder, DiffError, DiffResult};
use crate::engine::{Granularity, LineDiffEngine, SimilarEngine};
use crate::markup::{self, MarkupFormat};
use crate::punctuation;
use serde::{Deserialize, Serialize};

/// Options controlling how two documents are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    pub left_format: MarkupFormat,
    pub right_format: MarkupFormat,
    /// Map CJK punctuation to ASCII on both sides before aligning
    pub ignore_punctuation: bool,
    pub granularity: Granularity,
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the same markup format for both sides
    pub fn with_format(mut self, format: MarkupFormat) -> Self {
        self.left_format = format;
        self.right_format = format;
        self
    }

    pub fn with_formats(mut self, left: MarkupFormat, right: MarkupFormat) -> Self {
        self.left_format = left;
        self.right_format = right;
        self
    }

    pub fn with_ignore_punctuation(mut self, enabled: bool) -> Self {
        self.ignore_punctuation = enabled;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }
}

/// Apply the text stages of the pipeline to one side
pub fn prepare(text: &str, format: MarkupFormat, ignore_punctuation: bool) -> String {
    let plain = markup::normalize(text, format);
    if ignore_punctuation {
        punctuation::normalize_punctuation(&plain)
    } else {
        plain
    }
}

/// Compare two raw documents with the default engine
pub fn compare(left: &str, right: &str, options: &CompareOptions) -> Result<DiffResult, DiffError> {
    let builder = DiffBuilder::new(SimilarEngine::new().with_granularity(options.granularity));
    compare_with(&builder, left, right, options)
}

/// Compare two raw documents with a caller-supplied builder.
///
/// The builder's engine decides the sub-line granularity, so
/// `options.granularity` is not consulted here.
pub fn compare_with<E: LineDiffEngine>(
    builder: &DiffBuilder<E>,
    left: &str,
    right: &str,
    options: &CompareOptions,
) -> Result<DiffResult, DiffError> {
    let left = prepare(left, options.left_format, options.ignore_punctuation);
    let right = prepare(right, options.right_format, options.ignore_punctuation);
    builder.build(&left, &right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeKind;

    #[test]
    fn test_markup_is_stripped_before_diffing() {
        let options = CompareOptions::new().with_format(MarkupFormat::Markdown);
        let result = compare("# Title\n**same**", "Title\nsame", &options).unwrap();

        assert!(result.is_identical());
        assert_eq!(result.left_lines[0].text(), "Title");
    }

    #[test]
    fn test_mixed_formats() {
        let options =
            CompareOptions::new().with_formats(MarkupFormat::Markdown, MarkupFormat::WikiMarkup);
        let result = compare("**bold** text", "'''bold''' text", &options).unwrap();
        assert!(result.is_identical());
    }

    #[test]
    fn test_ignore_punctuation() {
        let left = "你好，世界！";
        let right = "你好,世界!";

        let strict = compare(left, right, &CompareOptions::new()).unwrap();
        assert_eq!(strict.left_lines[0].kind(), ChangeKind::Modified);

        let relaxed = compare(
            left,
            right,
            &CompareOptions::new().with_ignore_punctuation(true),
        )
        .unwrap();
        assert!(relaxed.is_identical());
    }

    #[test]
    fn test_prepare_plain_is_identity() {
        assert_eq!(prepare("  **x**  ", MarkupFormat::PlainText, false), "  **x**  ");
    }
}
