//! Phase 2: Parser — tokens to typed AST (spec §4.2).
//!
//! Structured the way the teacher's own multi-phase parser is (see its
//! `parser/document_parser.rs` + `parser/element_parsers.rs` split): one
//! entry point that dispatches per top-level construct, with dedicated
//! helpers for path parsing and block-body collection.

pub mod error;
pub mod standalone;

pub use error::{ParseError, ParseErrorKind};

use crate::ast::{
    Block, BooleanLiteral, Comment, Content, Expression, Hash, Mustache, NullLiteral,
    NumberLiteral, PathExpression, Program, StringLiteral, SubExpression, UndefinedLiteral,
};
use crate::lexer::{Token, TokenKind};
use crate::position::{Position, SourceLocation};

/// Parse a token stream into a `Program` (spec §4.2 contract).
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens);
    parser.parse_top_level()
}

enum OpenResult {
    Mustache(crate::ast::Statement),
    /// Degenerate `{{}}` — produces no statement (spec §4.2.3).
    Empty,
    ElseBare,
    ElseChained(PathExpression, Vec<Expression>, Hash),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    prev_end: Position,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            prev_end: Position::start(),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        self.prev_end = tok.location.end;
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(kind, self.peek()))
        }
    }

    /// Expect the closing delimiter matching an opener: `}}}` when
    /// `escaped` is false (triple-brace form), `}}` otherwise.
    fn expect_matching_close(&mut self, escaped: bool) -> Result<(), ParseError> {
        if escaped {
            self.expect(TokenKind::Close)?;
        } else {
            self.expect(TokenKind::CloseUnescaped)?;
        }
        Ok(())
    }

    // ---- top level ----

    fn parse_top_level(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::OpenEndBlock => {
                    let at = self.peek().location.start;
                    self.advance();
                    let path = self.parse_path()?;
                    let _ = self.expect(TokenKind::Close);
                    return Err(ParseError::stray_close(&path.original, at));
                }
                TokenKind::Content => body.push(self.parse_content()),
                TokenKind::Comment => body.push(self.parse_comment()),
                TokenKind::OpenBlock => body.push(self.parse_block(false)?),
                TokenKind::OpenInverse => {
                    if self.is_bare_inverse_marker() {
                        let at = self.peek().location.start;
                        return Err(ParseError::stray_else(at));
                    }
                    body.push(self.parse_block(true)?);
                }
                TokenKind::Open | TokenKind::OpenUnescaped => {
                    let at = self.peek().location.start;
                    match self.parse_open()? {
                        OpenResult::Mustache(s) => body.push(s),
                        OpenResult::Empty => {}
                        OpenResult::ElseBare | OpenResult::ElseChained(..) => {
                            return Err(ParseError::stray_else(at));
                        }
                    }
                }
                _ => return Err(ParseError::unexpected_token(self.peek())),
            }
        }
        standalone::trim(&mut body);
        Ok(Program { body })
    }

    fn is_bare_inverse_marker(&self) -> bool {
        matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenKind::Close))
    }

    fn parse_content(&mut self) -> crate::ast::Statement {
        let tok = self.advance();
        crate::ast::Statement::Content(Content {
            value: tok.literal.clone(),
            original: tok.literal,
            location: tok.location,
        })
    }

    fn parse_comment(&mut self) -> crate::ast::Statement {
        let tok = self.advance();
        crate::ast::Statement::Comment(Comment {
            value: tok.literal,
            location: tok.location,
        })
    }

    // ---- mustache / else ----

    fn parse_open(&mut self) -> Result<OpenResult, ParseError> {
        let open_tok = self.advance();
        let escaped = open_tok.kind != TokenKind::OpenUnescaped;

        if matches!(self.peek().kind, TokenKind::Inverse) {
            self.advance();
            if matches!(self.peek().kind, TokenKind::Close | TokenKind::CloseUnescaped) {
                self.advance();
                return Ok(OpenResult::ElseBare);
            }
            let path = self.parse_path()?;
            let params = self.parse_params()?;
            let hash = self.parse_hash()?;
            self.expect(TokenKind::Close)?;
            return Ok(OpenResult::ElseChained(path, params, hash));
        }

        let path = self.parse_path()?;
        let params = self.parse_params()?;
        let hash = self.parse_hash()?;
        self.expect_matching_close(escaped)?;
        let location = SourceLocation::new(open_tok.location.start, self.prev_end);

        if path.original.is_empty() && params.is_empty() && hash.is_empty() {
            return Ok(OpenResult::Empty);
        }
        Ok(OpenResult::Mustache(crate::ast::Statement::Mustache(
            Mustache {
                path,
                params,
                hash,
                escaped,
                location,
            },
        )))
    }

    // ---- blocks ----

    fn parse_block(&mut self, is_inverse_opener: bool) -> Result<crate::ast::Statement, ParseError> {
        let opener = self.advance(); // OpenBlock or OpenInverse
        let open_start = opener.location.start;
        let path = self.parse_path()?;
        if path.original.is_empty() {
            return Err(ParseError::empty_block_name(open_start));
        }
        let params = self.parse_params()?;
        let hash = self.parse_hash()?;
        self.expect(TokenKind::Close)?;

        let (mut first, mut second) = self.parse_block_body(&path.original, open_start)?;
        if let Some(inv) = second.as_mut() {
            standalone::trim_else_boundary(&mut first.body, &mut inv.body);
        }

        let location = SourceLocation::new(open_start, self.prev_end);
        let (program, inverse) = if is_inverse_opener {
            (second.unwrap_or_default(), Some(first))
        } else {
            (first, second.take())
        };
        Ok(crate::ast::Statement::Block(Block {
            path,
            params,
            hash,
            program,
            inverse,
            location,
        }))
    }

    /// Collect a block's main program, returning `(main, Some(inverse))`
    /// if an `{{else}}` (bare or chained) was found, `(main, None)` if the
    /// matching `{{/name}}` terminated it directly.
    fn parse_block_body(
        &mut self,
        close_name: &str,
        opener_pos: Position,
    ) -> Result<(Program, Option<Program>), ParseError> {
        let mut main = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => return Err(ParseError::unclosed_block(close_name, opener_pos)),
                TokenKind::OpenEndBlock => {
                    self.consume_matching_end_block(close_name)?;
                    standalone::trim(&mut main);
                    return Ok((Program { body: main }, None));
                }
                TokenKind::Content => main.push(self.parse_content()),
                TokenKind::Comment => main.push(self.parse_comment()),
                TokenKind::OpenBlock => main.push(self.parse_block(false)?),
                TokenKind::OpenInverse => {
                    if self.is_bare_inverse_marker() {
                        self.advance();
                        self.advance(); // OpenInverse, Close
                        let inverse = self.parse_block_body_inverse(close_name, opener_pos)?;
                        standalone::trim(&mut main);
                        return Ok((Program { body: main }, Some(inverse)));
                    }
                    main.push(self.parse_block(true)?);
                }
                TokenKind::Open | TokenKind::OpenUnescaped => match self.parse_open()? {
                    OpenResult::Mustache(s) => main.push(s),
                    OpenResult::Empty => {}
                    OpenResult::ElseBare => {
                        let inverse = self.parse_block_body_inverse(close_name, opener_pos)?;
                        standalone::trim(&mut main);
                        return Ok((Program { body: main }, Some(inverse)));
                    }
                    OpenResult::ElseChained(path, params, hash) => {
                        let chain_start = path.location.start;
                        let (inner_program, inner_inverse) =
                            self.parse_block_body(close_name, chain_start)?;
                        let inner_location = SourceLocation::new(chain_start, self.prev_end);
                        let inner = crate::ast::Statement::Block(Block {
                            path,
                            params,
                            hash,
                            program: inner_program,
                            inverse: inner_inverse,
                            location: inner_location,
                        });
                        standalone::trim(&mut main);
                        return Ok((Program { body: main }, Some(Program { body: vec![inner] })));
                    }
                },
                _ => return Err(ParseError::unexpected_token(self.peek())),
            }
        }
    }

    /// Collect the statements after a bare `{{else}}`, up to the matching
    /// `{{/name}}`. A second `{{else}}` here is an error (spec §4.2.5).
    fn parse_block_body_inverse(
        &mut self,
        close_name: &str,
        opener_pos: Position,
    ) -> Result<Program, ParseError> {
        let mut body = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => return Err(ParseError::unclosed_block(close_name, opener_pos)),
                TokenKind::OpenEndBlock => {
                    self.consume_matching_end_block(close_name)?;
                    standalone::trim(&mut body);
                    return Ok(Program { body });
                }
                TokenKind::Content => body.push(self.parse_content()),
                TokenKind::Comment => body.push(self.parse_comment()),
                TokenKind::OpenBlock => body.push(self.parse_block(false)?),
                TokenKind::OpenInverse => {
                    if self.is_bare_inverse_marker() {
                        let at = self.peek().location.start;
                        return Err(ParseError::multiple_else(at));
                    }
                    body.push(self.parse_block(true)?);
                }
                TokenKind::Open | TokenKind::OpenUnescaped => {
                    let at = self.peek().location.start;
                    match self.parse_open()? {
                        OpenResult::Mustache(s) => body.push(s),
                        OpenResult::Empty => {}
                        OpenResult::ElseBare | OpenResult::ElseChained(..) => {
                            return Err(ParseError::multiple_else(at));
                        }
                    }
                }
                _ => return Err(ParseError::unexpected_token(self.peek())),
            }
        }
    }

    fn consume_matching_end_block(&mut self, expected: &str) -> Result<(), ParseError> {
        let tok = self.advance(); // OPEN_ENDBLOCK
        let start = tok.location.start;
        let path = self.parse_path()?;
        self.expect(TokenKind::Close)?;
        if path.original != expected {
            return Err(ParseError::closing_tag_mismatch(
                expected,
                &path.original,
                start,
            ));
        }
        Ok(())
    }

    // ---- paths ----

    fn parse_path(&mut self) -> Result<PathExpression, ParseError> {
        let start = self.peek().location.start;
        let mut data = false;
        let mut original = String::new();

        if self.peek().kind == TokenKind::Data {
            self.advance();
            data = true;
            original.push('@');
            if self.peek().kind != TokenKind::Id {
                return Err(ParseError::malformed_path(
                    "'@' must be followed by an identifier",
                    start,
                ));
            }
        }

        if self.peek().kind != TokenKind::Id {
            let loc = SourceLocation::new(start, start);
            return Ok(PathExpression {
                data,
                depth: 0,
                parts: Vec::new(),
                original,
                location: loc,
            });
        }

        let mut parts = Vec::new();
        let mut depth = 0usize;
        let first = self.advance();
        let first_text = first.literal;

        if first_text == ".." {
            depth += 1;
            original.push_str("..");
            loop {
                let is_next_dotdot = matches!(self.peek().kind, TokenKind::Sep)
                    && self.peek().literal == "/"
                    && matches!(self.peek_at(1).map(|t| t.literal.as_str()), Some(".."));
                if is_next_dotdot {
                    self.advance(); // SEP "/"
                    self.advance(); // ".."
                    original.push_str("/..");
                    depth += 1;
                } else {
                    break;
                }
            }
            if matches!(self.peek().kind, TokenKind::Sep) {
                let sep_pos = self.peek().location.start;
                self.advance();
                original.push('/');
                self.parse_prefixed_path_tail(sep_pos, &mut parts, &mut original)?;
            }
        } else if first_text == "this" {
            original.push_str("this");
            if matches!(self.peek().kind, TokenKind::Sep) {
                let sep_pos = self.peek().location.start;
                self.advance();
                original.push('/');
                self.parse_prefixed_path_tail(sep_pos, &mut parts, &mut original)?;
            }
        } else if first_text == "." {
            original.push('.');
            if matches!(self.peek().kind, TokenKind::Sep) {
                let sep_pos = self.peek().location.start;
                self.advance();
                original.push('/');
                self.parse_prefixed_path_tail(sep_pos, &mut parts, &mut original)?;
            }
        } else {
            parts.push(first_text.clone());
            original.push_str(&first_text);
            self.parse_remaining_path_parts(&mut parts, &mut original)?;
        }

        let location = SourceLocation::new(start, self.prev_end);
        Ok(PathExpression {
            data,
            depth,
            parts,
            original,
            location,
        })
    }

    /// A `this`/`./`/`../` prefix's own `SEP` is consumed by its caller
    /// (to normalize it to `/` in `original` regardless of how the
    /// prefix spelled it), so the first segment after it has no leading
    /// `.` to match on the way `parse_remaining_path_parts` expects.
    /// Parse that first segment directly, then hand off to
    /// `parse_remaining_path_parts` for any further `.`-separated ones
    /// (spec §4.2.2).
    fn parse_prefixed_path_tail(
        &mut self,
        sep_pos: Position,
        parts: &mut Vec<String>,
        original: &mut String,
    ) -> Result<(), ParseError> {
        match self.peek().kind {
            TokenKind::Id | TokenKind::Number => {
                let seg = self.advance();
                original.push_str(&seg.literal);
                parts.push(seg.literal);
            }
            TokenKind::Sep => {
                return Err(ParseError::consecutive_separators(sep_pos));
            }
            _ => {
                return Err(ParseError::trailing_separator(sep_pos));
            }
        }
        self.parse_remaining_path_parts(parts, original)
    }

    fn parse_remaining_path_parts(
        &mut self,
        parts: &mut Vec<String>,
        original: &mut String,
    ) -> Result<(), ParseError> {
        loop {
            if self.peek().kind != TokenKind::Sep {
                break;
            }
            let sep_pos = self.peek().location.start;
            self.advance();
            match self.peek().kind {
                TokenKind::Id | TokenKind::Number => {
                    let seg = self.advance();
                    original.push('.');
                    original.push_str(&seg.literal);
                    parts.push(seg.literal);
                }
                TokenKind::Sep => {
                    return Err(ParseError::consecutive_separators(sep_pos));
                }
                _ => {
                    return Err(ParseError::trailing_separator(sep_pos));
                }
            }
        }
        Ok(())
    }

    // ---- params / hash / expressions ----

    fn parse_params(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut params = Vec::new();
        loop {
            if self.is_param_terminator() {
                break;
            }
            params.push(self.parse_expression()?);
        }
        Ok(params)
    }

    fn parse_hash(&mut self) -> Result<Hash, ParseError> {
        let mut hash = Hash::new();
        loop {
            if !self.is_hash_pair_start() {
                break;
            }
            let key = self.advance().literal;
            self.expect(TokenKind::Equals)?;
            let value = self.parse_expression()?;
            hash.insert(key, value);
        }
        Ok(hash)
    }

    fn is_hash_pair_start(&self) -> bool {
        self.peek().kind == TokenKind::Id
            && matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenKind::Equals))
    }

    fn is_param_terminator(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Close | TokenKind::CloseUnescaped | TokenKind::CloseSexpr | TokenKind::Eof
        ) || self.is_hash_pair_start()
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        match self.peek().kind {
            TokenKind::String => {
                let tok = self.advance();
                Ok(Expression::String(StringLiteral {
                    value: tok.literal.clone(),
                    original: tok.literal,
                    location: tok.location,
                }))
            }
            TokenKind::Number => {
                let tok = self.advance();
                let value: f64 = tok.literal.parse().map_err(|_| {
                    ParseError::malformed_path(
                        format!("invalid number literal '{}'", tok.literal),
                        tok.location.start,
                    )
                })?;
                Ok(Expression::Number(NumberLiteral {
                    value,
                    original: tok.literal,
                    location: tok.location,
                }))
            }
            TokenKind::Boolean => {
                let tok = self.advance();
                Ok(Expression::Boolean(BooleanLiteral {
                    value: tok.literal == "true",
                    original: tok.literal,
                    location: tok.location,
                }))
            }
            TokenKind::Null => {
                let tok = self.advance();
                Ok(Expression::Null(NullLiteral {
                    location: tok.location,
                }))
            }
            TokenKind::Undefined => {
                let tok = self.advance();
                Ok(Expression::Undefined(UndefinedLiteral {
                    location: tok.location,
                }))
            }
            TokenKind::OpenSexpr => self.parse_sub_expression(),
            TokenKind::Id | TokenKind::Data => {
                let path = self.parse_path()?;
                Ok(Expression::Path(path))
            }
            _ => Err(ParseError::unexpected_token(self.peek())),
        }
    }

    fn parse_sub_expression(&mut self) -> Result<Expression, ParseError> {
        let open = self.advance(); // OPEN_SEXPR
        let start = open.location.start;
        let path = self.parse_path()?;
        if path.original.is_empty() {
            return Err(ParseError::empty_path(start));
        }
        let params = self.parse_params()?;
        let hash = self.parse_hash()?;
        self.expect(TokenKind::CloseSexpr)?;
        let location = SourceLocation::new(start, self.prev_end);
        Ok(Expression::Sub(SubExpression {
            path,
            params,
            hash,
            location,
        }))
    }
}
