//! Plain line-mode REPL
//!
//! The interactive evaluator loop over injected reader/writer handles:
//! read a line, accumulate until the backend reports a complete unit,
//! evaluate, print, reset. Runs on the invoking thread with blocking I/O
//! and no state beyond the buffer and the backend.
//!
//! The binary wires this to stdin/stdout for piped input (`--plain`); the
//! injected handles are what make the loop testable against in-memory
//! streams.

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use super::backend::{EvalResult, REPLBackend};
use super::commands::{CommandHandler, CommandResult};

/// Printed when the session ends
pub const FAREWELL: &str = "exiting";

/// REPL configuration
#[derive(Debug, Clone)]
pub struct REPLConfig {
    /// Prompt shown when the buffer is empty
    pub prompt: String,
    /// Prompt shown while more input is needed
    pub continuation_prompt: String,
    /// Enable Vi editing mode (line front end only)
    pub vi_mode: bool,
    /// History file path (line front end only)
    pub history_file: Option<PathBuf>,
    /// Maximum entries kept in session history
    pub history_size: usize,
}

impl Default for REPLConfig {
    fn default() -> Self {
        Self {
            prompt: ">> ".to_string(),
            continuation_prompt: ".. ".to_string(),
            vi_mode: false,
            history_file: None,
            history_size: 1000,
        }
    }
}

/// Plain REPL over explicit reader/writer handles
pub struct REPL<B, R, W> {
    /// Configuration
    config: REPLConfig,
    /// Backend for completeness testing and evaluation
    backend: B,
    /// Input stream
    reader: R,
    /// Output stream (prompts, results, errors)
    writer: W,
    /// Session history
    history: Vec<String>,
    /// Current input buffer
    buffer: String,
}

impl<B: REPLBackend> REPL<B, BufReader<io::Stdin>, io::Stdout> {
    /// Create a REPL over stdin/stdout
    pub fn stdio(
        backend: B,
        config: REPLConfig,
    ) -> Self {
        Self::new(backend, config, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<B: REPLBackend, R: BufRead, W: Write> REPL<B, R, W> {
    /// Create a REPL over explicit handles
    pub fn new(
        backend: B,
        config: REPLConfig,
        reader: R,
        writer: W,
    ) -> Self {
        Self {
            config,
            backend,
            reader,
            writer,
            history: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Run until the empty-line sentinel or end of input
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let prompt = if self.buffer.is_empty() {
                &self.config.prompt
            } else {
                &self.config.continuation_prompt
            };
            write!(self.writer, "{}", prompt)?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                // Input stream ended
                writeln!(self.writer, "{}", FAREWELL)?;
                break;
            }
            let line = line.trim_end_matches(['\n', '\r']);

            if self.buffer.is_empty() {
                if line.is_empty() {
                    writeln!(self.writer, "{}", FAREWELL)?;
                    break;
                }
                if line.starts_with(':') {
                    if self.command(line)? {
                        break;
                    }
                    continue;
                }
            }

            self.push_history(line);
            self.buffer.push_str(line);
            self.buffer.push('\n');

            if self.backend.is_complete(&self.buffer) {
                match self.backend.eval(&self.buffer) {
                    EvalResult::Value(value) => writeln!(self.writer, "{}", value)?,
                    EvalResult::Ok => {}
                    EvalResult::Error(msg) => {
                        writeln!(self.writer, "ERROR: {}", msg)?
                    }
                }
                self.buffer.clear();
            }
        }

        Ok(())
    }

    /// Handle a colon command; returns true when the session should end
    fn command(
        &mut self,
        line: &str,
    ) -> io::Result<bool> {
        let cmd = line.trim_start_matches(':').trim();
        if cmd == "history" || cmd == "hist" {
            for (i, entry) in self.history.iter().enumerate() {
                writeln!(self.writer, "{:4}  {}", i + 1, entry)?;
            }
            return Ok(false);
        }

        match CommandHandler::new(&mut self.backend).handle(line) {
            CommandResult::Exit => {
                writeln!(self.writer, "{}", FAREWELL)?;
                Ok(true)
            }
            CommandResult::Continue => Ok(false),
            CommandResult::Output(msg) => {
                writeln!(self.writer, "{}", msg)?;
                Ok(false)
            }
        }
    }

    fn push_history(
        &mut self,
        line: &str,
    ) {
        if line.is_empty() {
            return;
        }
        self.history.push(line.to_string());
        if self.history.len() > self.config.history_size {
            self.history.remove(0);
        }
    }

    /// Backend reference
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend reference
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the loop and hand back its writer (used by tests to
    /// inspect output)
    pub fn into_writer(self) -> W {
        self.writer
    }
}
