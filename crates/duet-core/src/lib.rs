//! Duet Core - markup normalization and side-by-side diff model
//!
//! This library turns two documents, possibly written in Markdown or wiki
//! markup, into plain text and classifies their differences per line and
//! per character, ready for side-by-side presentation.

pub mod change;
pub mod compare;
pub mod diff;
pub mod engine;
pub mod highlight;
pub mod markup;
pub mod punctuation;

pub use change::{ChangeKind, Line, Piece};
pub use compare::{compare, compare_with, prepare, CompareOptions};
pub use diff::{build_diff_result, DiffBuilder, DiffError, DiffResult, DiffStats};
pub use engine::{
    Alignment, EngineChange, EngineLine, EnginePiece, Granularity, LineDiffEngine, SimilarEngine,
};
pub use highlight::{resolve, styled_runs, HighlightMode, StyleIntent, StyledRun};
pub use markup::{normalize, MarkupFormat, MAX_TABLE_PASSES, MAX_TEMPLATE_PASSES};
pub use punctuation::normalize_punctuation;
