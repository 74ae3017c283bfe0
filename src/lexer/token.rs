//! Token kinds and the `Token` value itself (spec §3.2).

use serde::{Deserialize, Serialize};

use crate::position::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Open,
    Close,
    OpenUnescaped,
    CloseUnescaped,
    OpenBlock,
    OpenEndBlock,
    OpenInverse,
    OpenSexpr,
    CloseSexpr,
    /// The `{{else}}` or bare-else form.
    Inverse,
    Comment,
    Content,
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Id,
    Sep,
    Data,
    Equals,
    Eof,
}

/// A lexed token: its kind, literal text, and source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            kind,
            literal: literal.into(),
            location,
        }
    }
}
