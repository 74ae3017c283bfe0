//! Runtime error taxonomy (spec §7).

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderErrorKind {
    MissingHelper,
    UnknownHelper,
    Arity,
    MalformedPath,
    Helper,
}

/// A render-time error. `helper_error` carries a user helper's own
/// error message verbatim when that's the cause (spec §7: "helper-thrown
/// error (propagated verbatim)").
#[derive(Debug, Clone, PartialEq)]
pub struct RenderError {
    pub kind: RenderErrorKind,
    pub message: String,
    pub helper_name: Option<String>,
}

impl RenderError {
    pub fn missing_helper(name: &str) -> Self {
        RenderError {
            kind: RenderErrorKind::MissingHelper,
            message: format!("Missing helper: \"{name}\""),
            helper_name: Some(name.to_string()),
        }
    }

    /// Spec §4.3.5: unknown helper referenced from a sub-expression.
    /// Message must match `/unknown helper/i`.
    pub fn unknown_helper(name: &str) -> Self {
        RenderError {
            kind: RenderErrorKind::UnknownHelper,
            message: format!("Unknown helper: {name}"),
            helper_name: Some(name.to_string()),
        }
    }

    pub fn arity(helper: &str) -> Self {
        RenderError {
            kind: RenderErrorKind::Arity,
            message: format!("#{helper} requires exactly one argument"),
            helper_name: Some(helper.to_string()),
        }
    }

    pub fn malformed_path(message: impl Into<String>) -> Self {
        RenderError {
            kind: RenderErrorKind::MalformedPath,
            message: message.into(),
            helper_name: None,
        }
    }

    pub fn helper(name: &str, message: impl Into<String>) -> Self {
        RenderError {
            kind: RenderErrorKind::Helper,
            message: message.into(),
            helper_name: Some(name.to_string()),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for RenderError {}
