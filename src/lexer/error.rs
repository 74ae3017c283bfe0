//! Lexer error taxonomy (spec §4.1.5, §7).
//!
//! Mirrors the teacher's `ParserError` (`parser/infrastructure/error.rs`):
//! a flat enum with a manual `Display`/`Error` impl rather than a
//! `thiserror` derive, since the teacher doesn't carry `thiserror` as a
//! dependency.

use crate::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedComment,
    MalformedLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    /// Opening position of the unterminated construct.
    pub at: Position,
}

impl LexError {
    pub fn unterminated_string(at: Position) -> Self {
        LexError {
            kind: LexErrorKind::UnterminatedString,
            message: format!(
                "unterminated string starting at line {}, column {}",
                at.line, at.column
            ),
            at,
        }
    }

    pub fn unterminated_comment(at: Position) -> Self {
        LexError {
            kind: LexErrorKind::UnterminatedComment,
            message: format!(
                "unterminated comment starting at line {}, column {}",
                at.line, at.column
            ),
            at,
        }
    }

    pub fn malformed_literal(message: impl Into<String>, at: Position) -> Self {
        LexError {
            kind: LexErrorKind::MalformedLiteral,
            message: message.into(),
            at,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}
