//! Source positions and spans shared by every pipeline phase.
//!
//! Modeled on the teacher's `Position`/`SourceSpan` pair (own
//! `ast/tokens.rs`), but tracking a byte index in addition to
//! line/column since the parser needs it for overlap checks (§8).

use serde::{Deserialize, Serialize};

/// A single point in the source text.
///
/// `line` is 1-indexed, `column` and `index` are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub index: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            line: 1,
            column: 0,
            index: 0,
        }
    }
}

/// An ordered pair of positions bounding a token or AST node.
///
/// `end` is always `>= start` by byte index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(end.index >= start.index);
        SourceLocation { start, end }
    }
}
