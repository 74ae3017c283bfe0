//! The typed AST produced by the parser (spec §3.3).
//!
//! Node shapes follow the teacher's own AST modules (`ast/blocks.rs`,
//! `ast/tokens.rs`): plain structs/enums deriving `Serialize`/
//! `Deserialize` for introspection, with a `location` carried alongside
//! content rather than folded into it.

use serde::{Deserialize, Serialize};

use crate::position::SourceLocation;

/// The root of a parsed template: a flat list of statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Content(Content),
    Comment(Comment),
    Mustache(Mustache),
    Block(Block),
}

impl Statement {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Statement::Content(c) => Some(c.location),
            Statement::Comment(c) => Some(c.location),
            Statement::Mustache(m) => Some(m.location),
            Statement::Block(b) => Some(b.location),
        }
    }
}

/// Raw text, verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub value: String,
    /// The source text before any standalone-whitespace trimming was
    /// applied (spec §4.2.6).
    pub original: String,
    pub location: SourceLocation,
}

/// A `{{! ... }}` or `{{!-- ... --}}` comment. Produces no output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub value: String,
    pub location: SourceLocation,
}

/// A value or helper interpolation, `{{path params hash}}` or
/// `{{{path params hash}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mustache {
    pub path: PathExpression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    /// `false` for triple-brace `{{{...}}}`.
    pub escaped: bool,
    pub location: SourceLocation,
}

/// A block helper invocation: `{{#path params hash}}program{{else}}inverse{{/path}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub path: PathExpression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub program: Program,
    pub inverse: Option<Program>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Path(PathExpression),
    String(StringLiteral),
    Number(NumberLiteral),
    Boolean(BooleanLiteral),
    Null(NullLiteral),
    Undefined(UndefinedLiteral),
    Sub(SubExpression),
}

impl Expression {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Expression::Path(p) => Some(p.location),
            Expression::String(s) => Some(s.location),
            Expression::Number(n) => Some(n.location),
            Expression::Boolean(b) => Some(b.location),
            Expression::Null(n) => Some(n.location),
            Expression::Undefined(u) => Some(u.location),
            Expression::Sub(s) => Some(s.location),
        }
    }
}

/// A normalized path reference: property access, parent reference
/// (`../`), data variable (`@`), or bare identifier (spec §3.3, §4.2.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathExpression {
    /// `true` iff the path was prefixed with `@`.
    pub data: bool,
    /// Number of leading `../` segments.
    pub depth: usize,
    /// Segment list after stripping any leading `this`, `./`, or `../`.
    pub parts: Vec<String>,
    /// The path exactly as written in the source.
    pub original: String,
    pub location: SourceLocation,
}

impl PathExpression {
    /// `true` when the path is explicitly scoped to the current context
    /// (`this.x`, `./x`) or contains a `/`/`.` — i.e. the cases where the
    /// ambiguous-mustache helper-vs-property rule never applies (spec
    /// §4.3.3 point 4, §9 "Ambiguous mustaches").
    pub fn is_path_scoped(&self) -> bool {
        self.original.starts_with("this")
            || self.original.starts_with("./")
            || self.original.contains('/')
            || self.original.contains('.')
    }

    /// `true` when this path is a single bare identifier with no
    /// dots/slashes and no explicit scoping — the only shape eligible
    /// for the ambiguous helper-vs-property lookup.
    pub fn is_simple_name(&self) -> bool {
        !self.data && self.depth == 0 && self.parts.len() == 1 && !self.is_path_scoped()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
    pub original: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub value: f64,
    pub original: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub original: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullLiteral {
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndefinedLiteral {
    pub location: SourceLocation,
}

/// A parenthesized helper call used in expression position, e.g.
/// `{{#if (gt n 5)}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubExpression {
    pub path: PathExpression,
    pub params: Vec<Expression>,
    pub hash: Hash,
    pub location: SourceLocation,
}

/// An ordered key/expression mapping; duplicate keys resolve to the last
/// occurrence (spec §3.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Hash {
    pairs: Vec<(String, Expression)>,
}

impl Hash {
    pub fn new() -> Self {
        Hash { pairs: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Insert or overwrite `key`, keeping the *last* occurrence's value
    /// but the *first* occurrence's position — matching the teacher's
    /// general "last write wins" convention for repeated keys, while
    /// keeping hash iteration order stable across re-parses of the same
    /// template.
    pub fn insert(&mut self, key: String, value: Expression) {
        if let Some(slot) = self.pairs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.pairs.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Expression> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Expression)> {
        self.pairs.iter()
    }
}
