//! Line-editing REPL front end
//!
//! Same protocol as the plain loop, driven through rustyline for editing
//! and persistent history. Ctrl-C abandons the pending buffer, Ctrl-D and
//! the empty line end the session.

use std::io;

use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{EditMode, Editor};

use crate::VERSION;

use super::backend::{EvalResult, REPLBackend};
use super::commands::{CommandHandler, CommandResult};
use super::session::{REPLConfig, FAREWELL};

/// Line-editing REPL
pub struct LineREPL<B: REPLBackend> {
    /// Configuration
    config: REPLConfig,
    /// rustyline editor
    editor: Editor<(), FileHistory>,
    /// Backend for completeness testing and evaluation
    backend: B,
    /// Current input buffer
    buffer: String,
    /// Session history (rustyline separately persists its own)
    history: Vec<String>,
}

impl<B: REPLBackend> LineREPL<B> {
    /// Create a line REPL
    pub fn new(backend: B) -> io::Result<Self> {
        Self::with_config(backend, REPLConfig::default())
    }

    /// Create with custom config
    pub fn with_config(
        backend: B,
        config: REPLConfig,
    ) -> io::Result<Self> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .edit_mode(if config.vi_mode {
                EditMode::Vi
            } else {
                EditMode::Emacs
            })
            .build();

        let mut editor = Editor::with_config(rl_config).map_err(|e| {
            io::Error::new(io::ErrorKind::Other, format!("readline error: {:?}", e))
        })?;

        if let Some(ref history_file) = config.history_file {
            if history_file.exists() {
                let _ = editor.load_history(history_file);
            }
        }

        Ok(Self {
            config,
            editor,
            backend,
            buffer: String::new(),
            history: Vec::new(),
        })
    }

    /// Run until the empty-line sentinel or Ctrl-D
    pub fn run(&mut self) -> io::Result<()> {
        println!("sofash {} - type :help for commands", VERSION);

        loop {
            let prompt = if self.buffer.is_empty() {
                &self.config.prompt
            } else {
                &self.config.continuation_prompt
            };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    if self.buffer.is_empty() {
                        if line.is_empty() {
                            println!("{}", FAREWELL);
                            break;
                        }
                        if line.starts_with(':') {
                            let _ = self.editor.add_history_entry(&line);
                            if self.command(&line) {
                                println!("{}", FAREWELL);
                                break;
                            }
                            continue;
                        }
                    }

                    if !line.is_empty() {
                        let _ = self.editor.add_history_entry(&line);
                        self.push_history(&line);
                    }
                    self.buffer.push_str(&line);
                    self.buffer.push('\n');

                    if self.backend.is_complete(&self.buffer) {
                        match self.backend.eval(&self.buffer) {
                            EvalResult::Value(value) => println!("{}", value),
                            EvalResult::Ok => {}
                            EvalResult::Error(msg) => println!("ERROR: {}", msg),
                        }
                        self.buffer.clear();
                    }
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", FAREWELL);
                    break;
                }
                Err(ReadlineError::Interrupted) => {
                    // Abandon the pending statement, keep the session
                    println!("(interrupted)");
                    self.buffer.clear();
                    continue;
                }
                Err(e) => {
                    return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
                }
            }
        }

        if let Some(ref history_file) = self.config.history_file {
            let _ = self.editor.save_history(history_file);
        }

        Ok(())
    }

    /// Handle a colon command; returns true when the session should end
    fn command(
        &mut self,
        line: &str,
    ) -> bool {
        let cmd = line.trim_start_matches(':').trim();
        if cmd == "history" || cmd == "hist" {
            for (i, entry) in self.history.iter().enumerate() {
                println!("{:4}  {}", i + 1, entry);
            }
            return false;
        }

        match CommandHandler::new(&mut self.backend).handle(line) {
            CommandResult::Exit => true,
            CommandResult::Continue => false,
            CommandResult::Output(msg) => {
                println!("{}", msg);
                false
            }
        }
    }

    fn push_history(
        &mut self,
        line: &str,
    ) {
        self.history.push(line.to_string());
        if self.history.len() > self.config.history_size {
            self.history.remove(0);
        }
    }
}
