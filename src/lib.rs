//! sofash - an interactive shell for HTTP document stores
//!
//! A line-oriented shell whose scripting environment carries HTTP verb
//! helpers (`get`, `put`, `post`, ...) for poking at a CouchDB-style
//! database and inspecting the parsed responses. Input is buffered until
//! it forms a complete unit, evaluated against a persistent environment,
//! and the result (or `ERROR: ...`) is printed.
//!
//! # Example
//!
//! ```text
//! >> var info = get("/test_db")
//! >> info.status
//! 200
//! >> parse(info.body).doc_count
//! 10
//! ```

#![warn(rust_2018_idioms)]

// Public modules
pub mod http;
pub mod repl;
pub mod script;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::http::{Client, TcpTransport};
use crate::repl::EvalResult;
use crate::script::Evaluator;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "sofash";

/// Build an evaluator wired to `server` over TCP
pub fn evaluator_for(server: &str) -> Evaluator {
    Evaluator::with_client(Client::new(Box::new(TcpTransport::new()), server))
}

/// Evaluate one source string against `server`, printing a meaningful
/// result
///
/// # Example
///
/// ```no_run
/// use sofash::{run, Result};
///
/// fn main() -> Result<()> {
///     run("get(\"/test_db\").status", "http://127.0.0.1:5984")?;
///     Ok(())
/// }
/// ```
pub fn run(
    source: &str,
    server: &str,
) -> Result<()> {
    debug!("eval against {}", server);
    let mut evaluator = evaluator_for(server);
    match evaluator.evaluate(source) {
        EvalResult::Value(value) => {
            println!("{}", value);
            Ok(())
        }
        EvalResult::Ok => Ok(()),
        EvalResult::Error(msg) => Err(anyhow::anyhow!(msg)),
    }
}

/// Evaluate a script file against `server`
///
/// The final value is discarded; scripts talk through `print` and the
/// verb builtins.
pub fn run_file(
    path: &Path,
    server: &str,
) -> Result<()> {
    debug!("run file {}", path.display());
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut evaluator = evaluator_for(server);
    match evaluator.evaluate(&source) {
        EvalResult::Value(_) | EvalResult::Ok => Ok(()),
        EvalResult::Error(msg) => Err(anyhow::anyhow!(msg)),
    }
}
