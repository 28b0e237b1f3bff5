//! REPL backend trait
//!
//! The capability boundary between the loop and the host evaluation
//! service. The loop owns buffering and prompts; everything
//! language-shaped (completeness testing, execution, state) lives behind
//! this trait.

use std::time::Duration;

use crate::script::Value;

/// Evaluation result
#[derive(Debug)]
pub enum EvalResult {
    /// Evaluation produced a meaningful value to display
    Value(Value),
    /// Evaluation succeeded with nothing to display
    Ok,
    /// Evaluation failed; the session continues
    Error(String),
}

/// Execution statistics
#[derive(Debug, Default, Clone)]
pub struct ExecutionStats {
    /// Number of evaluations
    pub eval_count: usize,
    /// Total evaluation time
    pub total_time: Duration,
}

/// REPL backend trait
///
/// Implementations provide syntax-completeness testing and execution
/// against a persistent environment.
pub trait REPLBackend {
    /// Whether accumulated text forms one complete evaluable unit
    fn is_complete(
        &self,
        code: &str,
    ) -> bool;

    /// Evaluate a complete unit against the persistent environment
    fn eval(
        &mut self,
        code: &str,
    ) -> EvalResult;

    /// Reset all persistent state
    fn clear(&mut self);

    /// Execution statistics for the session
    fn stats(&self) -> ExecutionStats;
}
