//! Shell script error types

use thiserror::Error;

use crate::http::HttpError;

/// Errors raised while lexing, parsing, or evaluating shell input.
///
/// Every variant surfaces to the loop as a recoverable evaluation error;
/// none of them ends the session.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Malformed source text
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Name lookup failed
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    /// Call target is not a builtin
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Builtin called with the wrong number of arguments
    #[error("{name} expects {expected} argument(s), got {got}")]
    Arity {
        /// Builtin name
        name: &'static str,
        /// Human-readable expected count ("1", "1 or 2", ...)
        expected: &'static str,
        /// Actual count
        got: usize,
    },

    /// Operand or argument of the wrong type
    #[error("type error: {0}")]
    Type(String),

    /// HTTP builtin used without a configured transport
    #[error("no server transport configured")]
    NoTransport,

    /// Transport or response failure inside an HTTP builtin
    #[error("http error: {0}")]
    Http(#[from] HttpError),

    /// `parse`/`stringify` failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for script operations
pub type ScriptResult<T> = Result<T, ScriptError>;
