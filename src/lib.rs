//! A Handlebars-compatible template engine.
//!
//! Templates are compiled through three stages, each its own module:
//!
//! - [`lexer`] — a stateful scanner producing a token stream.
//! - [`parser`] — builds a typed [`ast::Program`] from that stream,
//!   validating block nesting and normalizing path notation.
//! - [`interpreter`] — walks the `Program` against a runtime context,
//!   resolving paths and invoking helpers to produce a string.
//!
//! ```
//! use hbs_engine::{api, interpreter::Value};
//!
//! let root = Value::map(vec![("name".to_string(), Value::string("World"))]);
//! let out = api::render("Hello {{name}}!", root).unwrap();
//! assert_eq!(out, "Hello World!");
//! ```

pub mod api;
pub mod ast;
pub mod helpers;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod position;

pub use api::{evaluate, parse, render, tokenize, CompileError};
pub use interpreter::{Interpreter, RenderError, RuntimeOptions, Value};
pub use lexer::LexError;
pub use parser::ParseError;
pub use position::{Position, SourceLocation};
