//! REPL command handler
//!
//! Handles special commands starting with ':'. Commands are only
//! recognized while the input buffer is empty; inside a continuation a
//! colon line is ordinary input.

use super::backend::REPLBackend;

/// Command result
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Exit the REPL
    Exit,
    /// Continue to next input
    Continue,
    /// Print a message, then continue
    Output(String),
}

/// Command handler for the REPL front ends
///
/// `:history` is answered by the front ends themselves, which own the
/// session history.
pub struct CommandHandler<'a, B: REPLBackend> {
    backend: &'a mut B,
}

impl<'a, B: REPLBackend> CommandHandler<'a, B> {
    /// Create a new command handler
    pub fn new(backend: &'a mut B) -> Self {
        Self { backend }
    }

    /// Handle a command line
    pub fn handle(
        &mut self,
        line: &str,
    ) -> CommandResult {
        let cmd = line.trim_start_matches(':').trim();

        match cmd.split_whitespace().next().unwrap_or("") {
            "quit" | "q" => CommandResult::Exit,
            "help" | "h" => CommandResult::Output(help_text()),
            "clear" | "c" => {
                self.backend.clear();
                CommandResult::Output("environment cleared".to_string())
            }
            "stats" => {
                let stats = self.backend.stats();
                CommandResult::Output(format!(
                    "evaluations: {}\ntotal time: {:?}",
                    stats.eval_count, stats.total_time
                ))
            }
            "" => CommandResult::Continue,
            _ => CommandResult::Output(format!("unknown command: {}", line)),
        }
    }
}

fn help_text() -> String {
    [
        "Available commands:",
        "  :quit, :q        - exit the shell (so does an empty line)",
        "  :help, :h        - show this help",
        "  :clear, :c       - reset the environment",
        "  :history, :hist  - show session history",
        "  :stats           - show evaluation statistics",
    ]
    .join("\n")
}
