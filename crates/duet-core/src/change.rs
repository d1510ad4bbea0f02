//! Change representation for the side-by-side diff model

use serde::{Deserialize, Serialize};

/// The classification of a line, or of a run of characters within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Present on both sides with identical content
    Unchanged,
    /// Only present on the right side
    Inserted,
    /// Only present on the left side
    Deleted,
    /// Present on both sides with differing content
    Modified,
    /// Filler row that keeps both sides vertically aligned
    Imaginary,
}

impl ChangeKind {
    /// Check if this is an actual change (not context or filler)
    pub fn is_change(self) -> bool {
        matches!(
            self,
            ChangeKind::Inserted | ChangeKind::Deleted | ChangeKind::Modified
        )
    }
}

/// A contiguous run of characters within a line sharing one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub text: String,
    pub kind: ChangeKind,
    /// Character offset of the piece within its owning line
    #[serde(default)]
    pub position: usize,
}

impl Piece {
    pub fn new(text: impl Into<String>, kind: ChangeKind, position: usize) -> Self {
        Self {
            text: text.into(),
            kind,
            position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One row of one side of a diff.
///
/// Lines can only be built through [`Line::whole`] and [`Line::modified`],
/// which keep the piece list consistent with the line: a single piece always
/// mirrors the line's text and kind, and several pieces always concatenate
/// back to the line's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLine")]
pub struct Line {
    text: String,
    kind: ChangeKind,
    pieces: Vec<Piece>,
}

impl Line {
    /// A line represented by exactly one piece spanning all of it
    pub fn whole(text: impl Into<String>, kind: ChangeKind) -> Self {
        let text = text.into();
        let pieces = vec![Piece::new(text.clone(), kind, 0)];
        Self { text, kind, pieces }
    }

    /// A filler line with no text
    pub fn imaginary() -> Self {
        Self::whole(String::new(), ChangeKind::Imaginary)
    }

    /// A modified line split into sub-pieces.
    ///
    /// Falls back to the whole-line form when there are fewer than two
    /// pieces, or when the pieces do not reconstruct `text`.
    pub fn modified(text: impl Into<String>, pieces: Vec<Piece>) -> Self {
        let text = text.into();
        if pieces.len() < 2 {
            return Self::whole(text, ChangeKind::Modified);
        }
        let joined: String = pieces.iter().map(|p| p.text.as_str()).collect();
        if joined != text {
            tracing::warn!(
                line = %text,
                pieces = %joined,
                "sub-pieces do not reconstruct the modified line, keeping it whole"
            );
            return Self::whole(text, ChangeKind::Modified);
        }
        Self {
            text,
            kind: ChangeKind::Modified,
            pieces,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// True for a modified line carrying character-level detail
    pub fn is_split(&self) -> bool {
        self.pieces.len() > 1
    }

    pub fn is_imaginary(&self) -> bool {
        self.kind == ChangeKind::Imaginary
    }
}

/// Unchecked wire form of [`Line`], validated on deserialization
#[derive(Deserialize)]
struct RawLine {
    text: String,
    kind: ChangeKind,
    #[serde(default)]
    pieces: Vec<Piece>,
}

impl TryFrom<RawLine> for Line {
    type Error = String;

    fn try_from(raw: RawLine) -> Result<Self, Self::Error> {
        match (raw.kind, raw.pieces.len()) {
            (_, 0) => Ok(Line::whole(raw.text, raw.kind)),
            (kind, 1) => {
                let piece = &raw.pieces[0];
                if piece.text != raw.text || piece.kind != kind {
                    return Err(format!(
                        "single piece {:?} does not mirror line {:?}",
                        piece.text, raw.text
                    ));
                }
                Ok(Line::whole(raw.text, kind))
            }
            (ChangeKind::Modified, _) => {
                let joined: String = raw.pieces.iter().map(|p| p.text.as_str()).collect();
                if joined != raw.text {
                    return Err(format!(
                        "pieces {:?} do not reconstruct line {:?}",
                        joined, raw.text
                    ));
                }
                Ok(Line {
                    text: raw.text,
                    kind: raw.kind,
                    pieces: raw.pieces,
                })
            }
            (kind, n) => Err(format!("{kind:?} line cannot carry {n} pieces")),
        }
    }
}
