//! REPL module
//!
//! The interactive evaluator loop: read a line, accumulate until the
//! input forms a complete unit, evaluate against the persistent
//! environment, print the result or error, reset, repeat.
//!
//! This module contains:
//! - [`backend::REPLBackend`] - Abstract interface for evaluation backends
//! - [`session::REPL`] - Plain loop over injected reader/writer handles
//! - [`line::LineREPL`] - Line-editing front end with rustyline
//! - [`commands::CommandHandler`] - Colon-command processor

pub mod backend;
pub mod commands;
pub mod line;
pub mod session;

pub use backend::{EvalResult, ExecutionStats, REPLBackend};
pub use commands::{CommandHandler, CommandResult};
pub use line::LineREPL;
pub use session::{REPLConfig, REPL};
