//! Line alignment engines
//!
//! An engine turns two texts into two row-aligned sequences of lines, each
//! tagged with a change kind and, for modified rows, character-level
//! sub-pieces. [`crate::diff::DiffBuilder`] consumes that output; it never
//! aligns lines itself.

use crate::diff::DiffError;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};
use std::fmt;
use std::str::FromStr;

/// Change kind as reported by an engine.
///
/// Engines may report kinds this crate does not know about; those
/// deserialize into [`EngineChange::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineChange {
    Unchanged,
    Deleted,
    Inserted,
    Modified,
    Imaginary,
    #[serde(other)]
    Unknown,
}

/// A character-level piece of a modified row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePiece {
    #[serde(default)]
    pub text: Option<String>,
    pub kind: EngineChange,
    #[serde(default)]
    pub position: Option<usize>,
}

/// One row on one side of an alignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineLine {
    #[serde(default)]
    pub text: Option<String>,
    pub kind: EngineChange,
    #[serde(default)]
    pub sub_pieces: Vec<EnginePiece>,
}

impl EngineLine {
    fn whole(text: &str, kind: EngineChange) -> Self {
        Self {
            text: Some(text.to_string()),
            kind,
            sub_pieces: Vec::new(),
        }
    }

    fn imaginary() -> Self {
        Self {
            text: None,
            kind: EngineChange::Imaginary,
            sub_pieces: Vec::new(),
        }
    }
}

/// Row-aligned output of an engine; `old` and `new` have equal length
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub old: Vec<EngineLine>,
    pub new: Vec<EngineLine>,
}

impl Alignment {
    fn push_row(&mut self, old: EngineLine, new: EngineLine) {
        self.old.push(old);
        self.new.push(new);
    }
}

/// Produces a row-aligned line diff of two texts
pub trait LineDiffEngine {
    fn align(&self, old: &str, new: &str) -> Result<Alignment, DiffError>;
}

/// How paired rows are split into sub-pieces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One token per character
    #[default]
    #[serde(alias = "char")]
    Character,
    /// Identifier runs, whitespace runs and single punctuation characters
    Word,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "char" | "character" => Ok(Granularity::Character),
            "word" => Ok(Granularity::Word),
            other => Err(format!("unknown granularity '{other}' (expected char or word)")),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Character => f.write_str("char"),
            Granularity::Word => f.write_str("word"),
        }
    }
}

/// The default engine, backed by `similar`
#[derive(Debug, Clone, Default)]
pub struct SimilarEngine {
    granularity: Granularity,
}

impl SimilarEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Emit buffered deletions and insertions, pairing them row by row
    fn flush_pending(
        &self,
        pending_deletes: &mut Vec<&str>,
        pending_inserts: &mut Vec<&str>,
        alignment: &mut Alignment,
    ) {
        let paired = pending_deletes.len().min(pending_inserts.len());

        for (old_text, new_text) in pending_deletes.iter().zip(pending_inserts.iter()) {
            let (old_pieces, new_pieces) = self.compute_sub_pieces(old_text, new_text);
            alignment.push_row(
                EngineLine {
                    text: Some(old_text.to_string()),
                    kind: EngineChange::Modified,
                    sub_pieces: old_pieces,
                },
                EngineLine {
                    text: Some(new_text.to_string()),
                    kind: EngineChange::Modified,
                    sub_pieces: new_pieces,
                },
            );
        }
        for text in &pending_deletes[paired..] {
            alignment.push_row(
                EngineLine::whole(text, EngineChange::Deleted),
                EngineLine::imaginary(),
            );
        }
        for text in &pending_inserts[paired..] {
            alignment.push_row(
                EngineLine::imaginary(),
                EngineLine::whole(text, EngineChange::Inserted),
            );
        }

        pending_deletes.clear();
        pending_inserts.clear();
    }

    /// Compute the sub-pieces of a paired row, one list per side
    fn compute_sub_pieces(&self, old: &str, new: &str) -> (Vec<EnginePiece>, Vec<EnginePiece>) {
        let (old_tokens, new_tokens) = match self.granularity {
            Granularity::Character => (split_chars(old), split_chars(new)),
            Granularity::Word => (tokenize_words(old), tokenize_words(new)),
        };
        let diff = TextDiff::from_slices(&old_tokens, &new_tokens);
        let mut left = PieceRuns::default();
        let mut right = PieceRuns::default();

        for change in diff.iter_all_changes() {
            let text = change.value();
            match change.tag() {
                ChangeTag::Equal => {
                    left.push(text, EngineChange::Unchanged);
                    right.push(text, EngineChange::Unchanged);
                }
                ChangeTag::Delete => left.push(text, EngineChange::Deleted),
                ChangeTag::Insert => right.push(text, EngineChange::Inserted),
            }
        }

        (left.pieces, right.pieces)
    }
}

impl LineDiffEngine for SimilarEngine {
    fn align(&self, old: &str, new: &str) -> Result<Alignment, DiffError> {
        let old_lines: Vec<&str> = old.lines().collect();
        let new_lines: Vec<&str> = new.lines().collect();
        let text_diff = TextDiff::from_slices(&old_lines, &new_lines);
        let mut alignment = Alignment::default();

        // Deletions and insertions between two equal lines are paired up
        let mut pending_deletes: Vec<&str> = Vec::new();
        let mut pending_inserts: Vec<&str> = Vec::new();

        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Equal => {
                    self.flush_pending(&mut pending_deletes, &mut pending_inserts, &mut alignment);
                    alignment.push_row(
                        EngineLine::whole(change.value(), EngineChange::Unchanged),
                        EngineLine::whole(change.value(), EngineChange::Unchanged),
                    );
                }
                ChangeTag::Delete => pending_deletes.push(change.value()),
                ChangeTag::Insert => pending_inserts.push(change.value()),
            }
        }
        self.flush_pending(&mut pending_deletes, &mut pending_inserts, &mut alignment);

        Ok(alignment)
    }
}

/// Accumulates tokens into runs of one kind, tracking character offsets
#[derive(Default)]
struct PieceRuns {
    pieces: Vec<EnginePiece>,
    offset: usize,
}

impl PieceRuns {
    fn push(&mut self, text: &str, kind: EngineChange) {
        match self.pieces.last_mut() {
            Some(last) if last.kind == kind => {
                last.text.get_or_insert_with(String::new).push_str(text);
            }
            _ => self.pieces.push(EnginePiece {
                text: Some(text.to_string()),
                kind,
                position: Some(self.offset),
            }),
        }
        self.offset += text.chars().count();
    }
}

fn split_chars(line: &str) -> Vec<&str> {
    line.char_indices()
        .map(|(i, ch)| &line[i..i + ch.len_utf8()])
        .collect()
}

/// Tokenize prose for word-level diffing.
/// Separates words from punctuation so a changed comma does not mark the
/// neighbouring word as changed.
fn tokenize_words(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (i, ch) in line.char_indices() {
        let is_word = ch.is_alphanumeric() || ch == '_';
        if !is_word && !ch.is_whitespace() {
            // Each punctuation char is its own token
            if let Some((s, _)) = start.take() {
                tokens.push(&line[s..i]);
            }
            tokens.push(&line[i..i + ch.len_utf8()]);
            continue;
        }
        match start {
            Some((_, word)) if word == is_word => {}
            Some((s, _)) => {
                tokens.push(&line[s..i]);
                start = Some((i, is_word));
            }
            None => start = Some((i, is_word)),
        }
    }
    if let Some((s, _)) = start {
        tokens.push(&line[s..]);
    }
    tokens
}
