//! Highlight intent resolution
//!
//! Decides *what* a piece of a diff line should look like, leaving *how*
//! (colours, fonts) to the presentation layer.

use crate::change::{ChangeKind, Line, Piece};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How changes are highlighted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    /// Whole-line styling, with character detail on modified lines
    #[default]
    Smart,
    /// One style per line
    #[serde(rename = "line")]
    WholeLine,
    /// Strong per-piece styling on modified lines
    #[serde(rename = "char")]
    CharacterLevel,
}

impl HighlightMode {
    /// Cycle to the next mode
    pub fn next(self) -> Self {
        match self {
            HighlightMode::Smart => HighlightMode::WholeLine,
            HighlightMode::WholeLine => HighlightMode::CharacterLevel,
            HighlightMode::CharacterLevel => HighlightMode::Smart,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            HighlightMode::Smart => "same content muted, modified parts marked precisely",
            HighlightMode::WholeLine => "each line marked as same or different",
            HighlightMode::CharacterLevel => "every changed character marked",
        }
    }
}

impl FromStr for HighlightMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smart" => Ok(HighlightMode::Smart),
            "line" | "whole-line" => Ok(HighlightMode::WholeLine),
            "char" | "character" => Ok(HighlightMode::CharacterLevel),
            other => Err(format!(
                "unknown highlight mode '{other}' (expected smart, line or char)"
            )),
        }
    }
}

impl fmt::Display for HighlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightMode::Smart => f.write_str("smart"),
            HighlightMode::WholeLine => f.write_str("line"),
            HighlightMode::CharacterLevel => f.write_str("char"),
        }
    }
}

/// The visual treatment a run of text should receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleIntent {
    /// No styling
    Plain,
    /// An unchanged line
    SameBackground,
    /// Unchanged text inside a modified line
    SameMuted,
    /// A whole deleted line
    DeletedLine,
    /// A whole inserted line
    InsertedLine,
    /// Deleted text inside a modified line
    DeletedStrong,
    /// Inserted text inside a modified line
    InsertedStrong,
    /// Modified text inside a modified line
    ModifiedAccent,
    /// Alignment filler
    PlaceholderMuted,
}

impl StyleIntent {
    pub const ALL: [StyleIntent; 9] = [
        StyleIntent::Plain,
        StyleIntent::SameBackground,
        StyleIntent::SameMuted,
        StyleIntent::DeletedLine,
        StyleIntent::InsertedLine,
        StyleIntent::DeletedStrong,
        StyleIntent::InsertedStrong,
        StyleIntent::ModifiedAccent,
        StyleIntent::PlaceholderMuted,
    ];
}

/// Resolve the intent for `piece` of `line` under `mode`
pub fn resolve(line: &Line, piece: &Piece, mode: HighlightMode) -> StyleIntent {
    match mode {
        HighlightMode::Smart if line.is_split() => smart_piece_intent(piece.kind),
        HighlightMode::Smart => line_intent(line.kind()),
        HighlightMode::WholeLine => line_intent(piece.kind),
        HighlightMode::CharacterLevel if line.is_split() => piece_intent(piece.kind),
        HighlightMode::CharacterLevel => line_intent(piece.kind),
    }
}

fn line_intent(kind: ChangeKind) -> StyleIntent {
    match kind {
        ChangeKind::Unchanged => StyleIntent::SameBackground,
        ChangeKind::Deleted => StyleIntent::DeletedLine,
        ChangeKind::Inserted => StyleIntent::InsertedLine,
        ChangeKind::Imaginary => StyleIntent::PlaceholderMuted,
        ChangeKind::Modified => StyleIntent::Plain,
    }
}

fn smart_piece_intent(kind: ChangeKind) -> StyleIntent {
    match kind {
        ChangeKind::Unchanged => StyleIntent::SameMuted,
        ChangeKind::Deleted => StyleIntent::DeletedStrong,
        ChangeKind::Inserted => StyleIntent::InsertedStrong,
        ChangeKind::Modified | ChangeKind::Imaginary => StyleIntent::ModifiedAccent,
    }
}

fn piece_intent(kind: ChangeKind) -> StyleIntent {
    match kind {
        ChangeKind::Unchanged | ChangeKind::Imaginary => StyleIntent::Plain,
        ChangeKind::Deleted => StyleIntent::DeletedStrong,
        ChangeKind::Inserted => StyleIntent::InsertedStrong,
        ChangeKind::Modified => StyleIntent::ModifiedAccent,
    }
}

/// A run of text with the intent it should be drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledRun<'a> {
    pub text: &'a str,
    pub intent: StyleIntent,
}

/// The runs to draw for `line`, in order.
///
/// Split lines yield one run per non-empty piece, except in whole-line
/// mode, which draws the line as a single run.
pub fn styled_runs(line: &Line, mode: HighlightMode) -> Vec<StyledRun<'_>> {
    if line.is_split() && mode != HighlightMode::WholeLine {
        return line
            .pieces()
            .iter()
            .filter(|piece| !piece.is_empty())
            .map(|piece| StyledRun {
                text: &piece.text,
                intent: resolve(line, piece, mode),
            })
            .collect();
    }
    vec![StyledRun {
        text: line.text(),
        intent: line_intent(line.kind()),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_line() -> Line {
        Line::modified(
            "cat nap",
            vec![
                Piece::new("cat", ChangeKind::Unchanged, 0),
                Piece::new(" ", ChangeKind::Modified, 3),
                Piece::new("", ChangeKind::Inserted, 4),
                Piece::new("nap", ChangeKind::Deleted, 4),
            ],
        )
    }

    #[test]
    fn test_smart_split_line_uses_piece_kinds() {
        let line = split_line();
        let intents: Vec<_> = line
            .pieces()
            .iter()
            .map(|p| resolve(&line, p, HighlightMode::Smart))
            .collect();
        assert_eq!(
            intents,
            vec![
                StyleIntent::SameMuted,
                StyleIntent::ModifiedAccent,
                StyleIntent::InsertedStrong,
                StyleIntent::DeletedStrong,
            ]
        );
    }

    #[test]
    fn test_smart_whole_lines_use_line_kind() {
        let cases = [
            (ChangeKind::Unchanged, StyleIntent::SameBackground),
            (ChangeKind::Deleted, StyleIntent::DeletedLine),
            (ChangeKind::Inserted, StyleIntent::InsertedLine),
            (ChangeKind::Imaginary, StyleIntent::PlaceholderMuted),
            (ChangeKind::Modified, StyleIntent::Plain),
        ];
        for (kind, expected) in cases {
            let line = Line::whole("x", kind);
            assert_eq!(
                resolve(&line, &line.pieces()[0], HighlightMode::Smart),
                expected,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn test_character_level_split_line() {
        let line = split_line();
        let pieces = line.pieces();
        let mode = HighlightMode::CharacterLevel;
        assert_eq!(resolve(&line, &pieces[0], mode), StyleIntent::Plain);
        assert_eq!(resolve(&line, &pieces[1], mode), StyleIntent::ModifiedAccent);
        assert_eq!(resolve(&line, &pieces[3], mode), StyleIntent::DeletedStrong);
    }

    #[test]
    fn test_character_level_filler_piece_is_plain() {
        let line = Line::modified(
            "ab",
            vec![
                Piece::new("a", ChangeKind::Imaginary, 0),
                Piece::new("b", ChangeKind::Inserted, 1),
            ],
        );
        let pieces = line.pieces();
        let mode = HighlightMode::CharacterLevel;
        assert_eq!(resolve(&line, &pieces[0], mode), StyleIntent::Plain);
        assert_eq!(resolve(&line, &pieces[1], mode), StyleIntent::InsertedStrong);
    }

    #[test]
    fn test_whole_line_and_character_agree_on_single_piece_lines() {
        for kind in [
            ChangeKind::Unchanged,
            ChangeKind::Deleted,
            ChangeKind::Inserted,
            ChangeKind::Imaginary,
            ChangeKind::Modified,
        ] {
            let line = Line::whole("x", kind);
            let piece = &line.pieces()[0];
            assert_eq!(
                resolve(&line, piece, HighlightMode::WholeLine),
                resolve(&line, piece, HighlightMode::CharacterLevel)
            );
        }
    }

    #[test]
    fn test_styled_runs_skip_empty_pieces() {
        let line = split_line();
        let runs = styled_runs(&line, HighlightMode::Smart);
        assert_eq!(runs.len(), 3);
        let text: String = runs.iter().map(|r| r.text).collect();
        assert_eq!(text, "cat nap");
    }

    #[test]
    fn test_styled_runs_whole_line_mode() {
        let line = split_line();
        let runs = styled_runs(&line, HighlightMode::WholeLine);
        assert_eq!(
            runs,
            vec![StyledRun {
                text: "cat nap",
                intent: StyleIntent::Plain
            }]
        );

        let deleted = Line::whole("gone", ChangeKind::Deleted);
        assert_eq!(
            styled_runs(&deleted, HighlightMode::CharacterLevel)[0].intent,
            StyleIntent::DeletedLine
        );
    }

    #[test]
    fn test_mode_cycle_and_parse() {
        let mut mode = HighlightMode::Smart;
        for _ in 0..3 {
            mode = mode.next();
            assert_eq!(mode.to_string().parse::<HighlightMode>(), Ok(mode));
        }
        assert_eq!(mode, HighlightMode::Smart);
        assert!("bold".parse::<HighlightMode>().is_err());
    }
}
