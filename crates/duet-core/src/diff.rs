//! Side-by-side diff model construction

use crate::change::{ChangeKind, Line, Piece};
use crate::compare::{self, CompareOptions};
use crate::engine::{EngineChange, EngineLine, LineDiffEngine, SimilarEngine};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Line diff engine failed: {0}")]
    Engine(String),
}

/// Row-aligned lines of both sides of a diff.
///
/// Both sides always hold the same number of rows, and no row is a filler
/// on both sides at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDiffResult")]
pub struct DiffResult {
    pub left_lines: Vec<Line>,
    pub right_lines: Vec<Line>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiffResult {
    left_lines: Vec<Line>,
    right_lines: Vec<Line>,
}

impl TryFrom<RawDiffResult> for DiffResult {
    type Error = String;

    fn try_from(raw: RawDiffResult) -> Result<Self, Self::Error> {
        let result = DiffResult {
            left_lines: raw.left_lines,
            right_lines: raw.right_lines,
        };
        result.check_rows()?;
        Ok(result)
    }
}

/// Row counts per change kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub unchanged: usize,
    pub modified: usize,
    pub inserted: usize,
    pub deleted: usize,
}

impl DiffStats {
    pub fn changed(&self) -> usize {
        self.modified + self.inserted + self.deleted
    }
}

impl DiffResult {
    fn check_rows(&self) -> Result<(), String> {
        if self.left_lines.len() != self.right_lines.len() {
            return Err(format!(
                "{} left rows and {} right rows",
                self.left_lines.len(),
                self.right_lines.len()
            ));
        }
        match self
            .rows()
            .position(|(l, r)| l.is_imaginary() && r.is_imaginary())
        {
            Some(row) => Err(format!("row {row} is imaginary on both sides")),
            None => Ok(()),
        }
    }

    /// Number of rows (identical on both sides)
    pub fn len(&self) -> usize {
        self.left_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_lines.is_empty()
    }

    /// Iterate over aligned `(left, right)` rows
    pub fn rows(&self) -> impl Iterator<Item = (&Line, &Line)> {
        self.left_lines.iter().zip(self.right_lines.iter())
    }

    /// Check if a row holds a change on either side
    pub fn is_changed_row(&self, row: usize) -> bool {
        self.rows()
            .nth(row)
            .is_some_and(|(l, r)| l.kind().is_change() || r.kind().is_change())
    }

    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for (left, right) in self.rows() {
            match (left.kind(), right.kind()) {
                (ChangeKind::Modified, _) | (_, ChangeKind::Modified) => stats.modified += 1,
                (ChangeKind::Deleted, _) => stats.deleted += 1,
                (_, ChangeKind::Inserted) => stats.inserted += 1,
                _ => stats.unchanged += 1,
            }
        }
        stats
    }

    /// True when no row carries a change
    pub fn is_identical(&self) -> bool {
        self.stats().changed() == 0
    }
}

/// Builds a [`DiffResult`] from the output of a line diff engine
pub struct DiffBuilder<E = SimilarEngine> {
    engine: E,
}

impl Default for DiffBuilder<SimilarEngine> {
    fn default() -> Self {
        Self::new(SimilarEngine::default())
    }
}

impl<E: LineDiffEngine> DiffBuilder<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Align two texts and convert the engine output in a single pass.
    ///
    /// No normalization happens here; see [`crate::compare`] for the full
    /// pipeline.
    pub fn build(&self, left: &str, right: &str) -> Result<DiffResult, DiffError> {
        let alignment = self.engine.align(left, right)?;
        let result = DiffResult {
            left_lines: alignment.old.into_iter().map(convert_line).collect(),
            right_lines: alignment.new.into_iter().map(convert_line).collect(),
        };
        result
            .check_rows()
            .map_err(|msg| DiffError::Engine(format!("invalid alignment: {msg}")))?;
        tracing::debug!(rows = result.len(), "built diff model");
        Ok(result)
    }

    /// Read two files and run the full comparison pipeline on them
    pub fn diff_files(
        &self,
        old_path: &Path,
        new_path: &Path,
        options: &CompareOptions,
    ) -> Result<DiffResult, DiffError> {
        let old_content = std::fs::read_to_string(old_path)?;
        let new_content = std::fs::read_to_string(new_path)?;

        compare::compare_with(self, &old_content, &new_content, options)
    }
}

/// Build a diff model with the default engine
pub fn build_diff_result(left: &str, right: &str) -> Result<DiffResult, DiffError> {
    DiffBuilder::default().build(left, right)
}

fn convert_line(line: EngineLine) -> Line {
    let text = line.text.unwrap_or_default();
    let kind = convert_kind(line.kind);

    if kind == ChangeKind::Modified && !line.sub_pieces.is_empty() {
        let pieces = line
            .sub_pieces
            .into_iter()
            .map(|piece| {
                Piece::new(
                    piece.text.unwrap_or_default(),
                    convert_kind(piece.kind),
                    piece.position.unwrap_or(0),
                )
            })
            .collect();
        Line::modified(text, pieces)
    } else {
        Line::whole(text, kind)
    }
}

fn convert_kind(kind: EngineChange) -> ChangeKind {
    match kind {
        EngineChange::Unchanged => ChangeKind::Unchanged,
        EngineChange::Deleted => ChangeKind::Deleted,
        EngineChange::Inserted => ChangeKind::Inserted,
        EngineChange::Modified => ChangeKind::Modified,
        EngineChange::Imaginary => ChangeKind::Imaginary,
        EngineChange::Unknown => {
            tracing::warn!("engine reported an unrecognized change kind, treating as unchanged");
            ChangeKind::Unchanged
        }
    }
}
