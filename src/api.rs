//! Convenience entry points over the three pipeline phases (spec §6),
//! mirroring the teacher's own top-level `api.rs` that sits above its
//! phase modules.

use crate::ast::Program;
use crate::interpreter::{Interpreter, RenderError, RuntimeOptions, Value};
use crate::lexer::{LexError, Token};
use crate::parser::{self, ParseError};

/// `tokenize(source) → [Token]` (spec §6).
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    crate::lexer::tokenize(source)
}

/// `parse(source) → Program` (spec §6): tokenizes then parses in one
/// call.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let tokens = tokenize(source)?;
    Ok(parser::parse(tokens)?)
}

/// `evaluate(program, root, options) → string` (spec §6), using the
/// built-in helper registry plus any caller overrides in `options`.
pub fn evaluate(program: &Program, root: Value, options: &RuntimeOptions) -> Result<String, RenderError> {
    let interpreter = Interpreter::with_options(options);
    interpreter.evaluate_with(program, root, options.initial_data.clone())
}

/// Tokenize, parse, and render `source` in one call against `root` with
/// the built-in helpers only. A convenience wrapper; hosts that need
/// custom helpers or repeated evaluation should call `parse` and
/// `Interpreter` directly.
pub fn render(source: &str, root: Value) -> Result<String, CompileError> {
    let program = parse(source)?;
    let interpreter = Interpreter::new();
    Ok(interpreter.evaluate(&program, root)?)
}

/// Either half of the compile pipeline can fail; this unifies them for
/// callers that don't need to distinguish lex errors from parse errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Render(RenderError),
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<RenderError> for CompileError {
    fn from(e: RenderError) -> Self {
        CompileError::Render(e)
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{e}"),
            CompileError::Parse(e) => write!(f, "{e}"),
            CompileError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CompileError {}
