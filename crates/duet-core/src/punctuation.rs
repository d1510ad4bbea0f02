//! CJK punctuation folding

/// Full-width and typographic punctuation with its ASCII equivalent.
/// No replacement is itself a key, so one pass is enough.
const PUNCTUATION_TABLE: &[(char, char)] = &[
    ('，', ','),
    ('。', '.'),
    ('；', ';'),
    ('：', ':'),
    ('？', '?'),
    ('！', '!'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('（', '('),
    ('）', ')'),
    ('【', '['),
    ('】', ']'),
    ('《', '<'),
    ('》', '>'),
    ('、', ','),
    ('—', '-'),
    ('…', '.'),
];

fn ascii_equivalent(ch: char) -> Option<char> {
    PUNCTUATION_TABLE
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|(_, to)| *to)
}

/// Replace CJK punctuation with its ASCII counterpart
pub fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|ch| ascii_equivalent(ch).unwrap_or(ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_width_punctuation() {
        assert_eq!(normalize_punctuation("你好，世界！"), "你好,世界!");
        assert_eq!(
            normalize_punctuation("【注】《书》（一）、二；三：四？"),
            "[注]<书>(一),二;三:四?"
        );
    }

    #[test]
    fn test_quotes_dashes_and_ellipsis() {
        assert_eq!(
            normalize_punctuation("\u{201C}hi\u{201D} \u{2018}x\u{2019} a—b…"),
            "\"hi\" 'x' a-b."
        );
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_punctuation("甲，乙。丙…“丁”");
        assert_eq!(normalize_punctuation(&once), once);
    }

    #[test]
    fn test_table_outputs_are_not_keys() {
        for (_, to) in PUNCTUATION_TABLE {
            assert!(ascii_equivalent(*to).is_none(), "{to:?} would be re-substituted");
        }
    }

    #[test]
    fn test_empty_and_ascii_untouched() {
        assert_eq!(normalize_punctuation(""), "");
        assert_eq!(normalize_punctuation("plain, text."), "plain, text.");
    }
}
