//! Phase 1: Lexer — stateful scanning of template source into tokens.
//!
//! This mirrors the teacher's own tokenizer (`tokenizer/lexer.rs`): a
//! `Vec<char>` input buffer walked by index with explicit line/column
//! bookkeeping, rather than leaning on an external regex/nom crate. The
//! lexer here additionally tracks which of the two scanner states (§4.1 of
//! the spec: content vs. mustache) it's in.

pub mod error;
pub mod token;

pub use error::{LexError, LexErrorKind};
pub use token::{Token, TokenKind};

use crate::position::{Position, SourceLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Content,
    Mustache,
}

/// Which opening/comment form matched at the current position, in
/// longest-match priority order (spec §4.1 delimiter table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    OpenUnescaped,
    OpenBlock,
    OpenEndBlock,
    OpenInverse,
    CommentDashed,
    Comment,
    Open,
}

const ESCAPABLE: [&str; 4] = ["{{{", "}}}", "{{", "}}"];

pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    state: State,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
            state: State::Content,
        }
    }

    /// Reset the lexer onto a new input, as if freshly constructed.
    pub fn set_input(&mut self, input: &str) {
        self.input = input.chars().collect();
        self.pos = 0;
        self.line = 1;
        self.column = 0;
        self.state = State::Content;
    }

    /// Produce the next token. Returns an `EOF` token forever once the
    /// input is exhausted.
    pub fn lex(&mut self) -> Result<Token, LexError> {
        match self.state {
            State::Content => self.lex_content(),
            State::Mustache => self.lex_mustache(),
        }
    }

    /// Tokenize the whole input in one call.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.lex()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    // ---- position plumbing ----

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            index: self.pos,
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn starts_with_at(&self, offset: usize, s: &str) -> bool {
        let chars: Vec<char> = s.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            if self.input.get(self.pos + offset + i) != Some(&c) {
                return false;
            }
        }
        true
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else if c == '\t' {
            self.column += 4;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_n(&mut self, n: usize) -> String {
        let mut out = String::with_capacity(n);
        for _ in 0..n {
            match self.advance() {
                Some(c) => out.push(c),
                None => break,
            }
        }
        out
    }

    fn skip_mustache_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\n') | Some('\r')) {
            self.advance();
        }
    }

    fn make_eof(&self) -> Token {
        let p = self.here();
        Token::new(TokenKind::Eof, "", SourceLocation::new(p, p))
    }

    // ---- content state ----

    /// Longest-match delimiter check at the *current* position (no
    /// leading backslash already consumed).
    fn match_delimiter(&self) -> Option<Delim> {
        if self.starts_with_at(0, "{{{") {
            return Some(Delim::OpenUnescaped);
        }
        if self.starts_with_at(0, "{{#") {
            return Some(Delim::OpenBlock);
        }
        if self.starts_with_at(0, "{{/") {
            return Some(Delim::OpenEndBlock);
        }
        if self.starts_with_at(0, "{{^") {
            return Some(Delim::OpenInverse);
        }
        if self.starts_with_at(0, "{{!--") {
            return Some(Delim::CommentDashed);
        }
        if self.starts_with_at(0, "{{!") {
            return Some(Delim::Comment);
        }
        if self.starts_with_at(0, "{{") {
            return Some(Delim::Open);
        }
        None
    }

    /// Escapable delimiter form starting at `offset` chars from the
    /// current position (used both for the single- and double-backslash
    /// escape rules in §4.1.3).
    fn delim_at(&self, offset: usize) -> Option<&'static str> {
        for d in ESCAPABLE {
            if self.starts_with_at(offset, d) {
                return Some(d);
            }
        }
        None
    }

    /// Attempt to consume a backslash-escape sequence at the current
    /// position (which must be `\`). Returns `true` if it handled and
    /// consumed something, `false` if the backslash should be treated as
    /// plain content (spec §4.1.3 rule 3).
    fn try_escape(&mut self, buf: &mut String) -> bool {
        debug_assert_eq!(self.peek(), Some('\\'));
        if self.peek_at(1) == Some('\\') {
            if self.delim_at(2).is_some() {
                // Rule 1: double backslash before a delimiter — emit one
                // literal backslash, leave the second backslash (now
                // directly before the delimiter) for the next pass,
                // where it matches rule 2.
                self.advance();
                buf.push('\\');
                return true;
            }
        }
        if let Some(d) = self.delim_at(1) {
            // Rule 2: single backslash before a delimiter — consume the
            // backslash, keep the delimiter as literal content.
            self.advance();
            let lit = self.advance_n(d.len());
            buf.push_str(&lit);
            return true;
        }
        false
    }

    fn lex_content(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        let mut buf = String::new();
        loop {
            if self.is_eof() {
                if buf.is_empty() {
                    return Ok(self.make_eof());
                }
                return Ok(Token::new(
                    TokenKind::Content,
                    buf,
                    SourceLocation::new(start, self.here()),
                ));
            }
            if self.peek() == Some('\\') && self.try_escape(&mut buf) {
                continue;
            }
            if let Some(delim) = self.match_delimiter() {
                if !buf.is_empty() {
                    return Ok(Token::new(
                        TokenKind::Content,
                        buf,
                        SourceLocation::new(start, self.here()),
                    ));
                }
                return self.consume_delimiter(delim);
            }
            let c = self.advance().expect("checked not eof");
            buf.push(c);
        }
    }

    fn consume_delimiter(&mut self, delim: Delim) -> Result<Token, LexError> {
        let start = self.here();
        match delim {
            Delim::OpenUnescaped => {
                let lit = self.advance_n(3);
                self.state = State::Mustache;
                Ok(Token::new(
                    TokenKind::OpenUnescaped,
                    lit,
                    SourceLocation::new(start, self.here()),
                ))
            }
            Delim::OpenBlock => {
                let lit = self.advance_n(3);
                self.state = State::Mustache;
                Ok(Token::new(
                    TokenKind::OpenBlock,
                    lit,
                    SourceLocation::new(start, self.here()),
                ))
            }
            Delim::OpenEndBlock => {
                let lit = self.advance_n(3);
                self.state = State::Mustache;
                Ok(Token::new(
                    TokenKind::OpenEndBlock,
                    lit,
                    SourceLocation::new(start, self.here()),
                ))
            }
            Delim::OpenInverse => {
                let lit = self.advance_n(3);
                self.state = State::Mustache;
                Ok(Token::new(
                    TokenKind::OpenInverse,
                    lit,
                    SourceLocation::new(start, self.here()),
                ))
            }
            Delim::Open => {
                let lit = self.advance_n(2);
                self.state = State::Mustache;
                Ok(Token::new(
                    TokenKind::Open,
                    lit,
                    SourceLocation::new(start, self.here()),
                ))
            }
            Delim::Comment => self.scan_comment("{{!", "}}"),
            Delim::CommentDashed => self.scan_comment("{{!--", "--}}"),
        }
    }

    fn scan_comment(&mut self, open: &str, close: &str) -> Result<Token, LexError> {
        let start = self.here();
        self.advance_n(open.chars().count());
        let mut body = String::new();
        loop {
            if self.is_eof() {
                return Err(LexError::unterminated_comment(start));
            }
            if self.starts_with_at(0, close) {
                self.advance_n(close.chars().count());
                return Ok(Token::new(
                    TokenKind::Comment,
                    body,
                    SourceLocation::new(start, self.here()),
                ));
            }
            body.push(self.advance().expect("checked not eof"));
        }
    }

    // ---- mustache state ----

    fn lex_mustache(&mut self) -> Result<Token, LexError> {
        self.skip_mustache_whitespace();
        let start = self.here();
        if self.is_eof() {
            return Ok(self.make_eof());
        }
        if self.starts_with_at(0, "}}}") {
            let lit = self.advance_n(3);
            self.state = State::Content;
            return Ok(Token::new(
                TokenKind::CloseUnescaped,
                lit,
                SourceLocation::new(start, self.here()),
            ));
        }
        if self.starts_with_at(0, "}}") {
            let lit = self.advance_n(2);
            self.state = State::Content;
            return Ok(Token::new(
                TokenKind::Close,
                lit,
                SourceLocation::new(start, self.here()),
            ));
        }
        let c = self.peek().expect("checked not eof");
        match c {
            '(' => {
                self.advance();
                Ok(Token::new(
                    TokenKind::OpenSexpr,
                    "(",
                    SourceLocation::new(start, self.here()),
                ))
            }
            ')' => {
                self.advance();
                Ok(Token::new(
                    TokenKind::CloseSexpr,
                    ")",
                    SourceLocation::new(start, self.here()),
                ))
            }
            '=' => {
                self.advance();
                Ok(Token::new(
                    TokenKind::Equals,
                    "=",
                    SourceLocation::new(start, self.here()),
                ))
            }
            '@' => {
                self.advance();
                Ok(Token::new(
                    TokenKind::Data,
                    "@",
                    SourceLocation::new(start, self.here()),
                ))
            }
            '"' | '\'' => self.lex_string(c, start),
            '/' => {
                self.advance();
                Ok(Token::new(
                    TokenKind::Sep,
                    "/",
                    SourceLocation::new(start, self.here()),
                ))
            }
            '.' => self.lex_dot(start),
            '-' | '0'..='9' => self.lex_number(start),
            c if is_ident_start(c) => self.lex_identifier(start),
            other => Err(LexError::malformed_literal(
                format!("unexpected character '{other}' in mustache"),
                start,
            )),
        }
    }

    fn lex_string(&mut self, quote: char, start: Position) -> Result<Token, LexError> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(LexError::unterminated_string(start)),
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(Token::new(
                        TokenKind::String,
                        value,
                        SourceLocation::new(start, self.here()),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('"') => value.push('"'),
                        Some('\'') => value.push('\''),
                        Some('\\') => value.push('\\'),
                        Some(other) => {
                            value.push('\\');
                            value.push(other);
                        }
                        None => return Err(LexError::unterminated_string(start)),
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
    }

    fn lex_number(&mut self, start: Position) -> Result<Token, LexError> {
        let mut lit = String::new();
        if self.peek() == Some('-') {
            lit.push(self.advance().unwrap());
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            lit.push(self.advance().unwrap());
        }
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            lit.push(self.advance().unwrap());
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                lit.push(self.advance().unwrap());
            }
        }
        Ok(Token::new(
            TokenKind::Number,
            lit,
            SourceLocation::new(start, self.here()),
        ))
    }

    /// A `.` is a path separator only when it sits directly between two
    /// identifier/number characters (e.g. `a.b`, `items.0`); otherwise it
    /// is lexed as an identifier (`.` or `..`) — see spec §4.1.1/§9.
    fn lex_dot(&mut self, start: Position) -> Result<Token, LexError> {
        let prev_is_ident = self.pos > 0 && is_ident_cont(self.input[self.pos - 1]);
        let next_is_ident = matches!(self.peek_at(1), Some(c) if is_ident_cont(c));
        if prev_is_ident && next_is_ident {
            self.advance();
            return Ok(Token::new(
                TokenKind::Sep,
                ".",
                SourceLocation::new(start, self.here()),
            ));
        }
        if self.peek_at(1) == Some('.') {
            let lit = self.advance_n(2);
            return Ok(Token::new(
                TokenKind::Id,
                lit,
                SourceLocation::new(start, self.here()),
            ));
        }
        let lit = self.advance_n(1);
        Ok(Token::new(
            TokenKind::Id,
            lit,
            SourceLocation::new(start, self.here()),
        ))
    }

    fn lex_identifier(&mut self, start: Position) -> Result<Token, LexError> {
        let mut lit = String::new();
        while matches!(self.peek(), Some(c) if is_ident_cont(c)) {
            lit.push(self.advance().unwrap());
        }
        let loc = SourceLocation::new(start, self.here());
        let kind = match lit.as_str() {
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            "undefined" => TokenKind::Undefined,
            "else" => TokenKind::Inverse,
            _ => TokenKind::Id,
        };
        Ok(Token::new(kind, lit, loc))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Tokenize `input`, returning a finite token sequence terminated by an
/// `EOF` token (spec §4.1 contract).
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::tokenize(input)
}
