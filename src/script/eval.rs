//! Evaluation engine
//!
//! Executes parsed statements against the persistent [`Environment`] and
//! implements the REPL backend contract: completeness testing, evaluation,
//! state reset, and statistics.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::http::Client;
use crate::repl::backend::{EvalResult, ExecutionStats, REPLBackend};

use super::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use super::builtins;
use super::env::Environment;
use super::error::{ScriptError, ScriptResult};
use super::parser::parse;
use super::value::Value;

/// Shell evaluator
///
/// Owns the persistent environment and the optional HTTP client that backs
/// the verb builtins.
pub struct Evaluator {
    /// Execution context
    env: Environment,
    /// Client for the verb builtins; verbs error without one
    client: Option<Client>,
    /// Number of evaluations this session
    eval_count: usize,
    /// Total evaluation time this session
    total_time: Duration,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator without a server connection
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            client: None,
            eval_count: 0,
            total_time: Duration::ZERO,
        }
    }

    /// Create an evaluator whose verb builtins go through `client`
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
            ..Self::new()
        }
    }

    /// The execution context
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Evaluate source text
    ///
    /// Statements run in order; the result is the value of the last bare
    /// expression. A null (or absent) final value reports [`EvalResult::Ok`]
    /// so the loop prints nothing - display is gated on "not null", never
    /// on truthiness.
    pub fn evaluate(
        &mut self,
        code: &str,
    ) -> EvalResult {
        if code.trim().is_empty() {
            return EvalResult::Ok;
        }

        let start = Instant::now();
        let result = self.run(code);
        self.eval_count += 1;
        self.total_time += start.elapsed();

        match result {
            Ok(Some(value)) => {
                self.env.set_last(value.clone());
                if value.is_null() {
                    EvalResult::Ok
                } else {
                    EvalResult::Value(value)
                }
            }
            Ok(None) => EvalResult::Ok,
            Err(e) => EvalResult::Error(e.to_string()),
        }
    }

    fn run(
        &mut self,
        code: &str,
    ) -> ScriptResult<Option<Value>> {
        let stmts = parse(code)?;
        debug!("evaluating {} statement(s)", stmts.len());

        let mut result = None;
        for stmt in &stmts {
            result = self.eval_stmt(stmt)?;
        }
        Ok(result)
    }

    fn eval_stmt(
        &mut self,
        stmt: &Stmt,
    ) -> ScriptResult<Option<Value>> {
        match stmt {
            Stmt::Var(name, expr) => {
                let value = self.eval_expr(expr)?;
                self.env.define(name.clone(), value);
                Ok(None)
            }
            Stmt::Expr(expr) => Ok(Some(self.eval_expr(expr)?)),
        }
    }

    fn eval_expr(
        &mut self,
        expr: &Expr,
    ) -> ScriptResult<Value> {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Ident(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| ScriptError::UndefinedVariable(name.clone())),
            Expr::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::List(values))
            }
            Expr::Map(entries) => {
                let mut map = indexmap::IndexMap::new();
                for (key, value_expr) in entries {
                    map.insert(key.clone(), self.eval_expr(value_expr)?);
                }
                Ok(Value::Map(map))
            }
            Expr::Unary(op, operand) => {
                let value = self.eval_expr(operand)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Neg, other) => Err(ScriptError::Type(format!(
                        "cannot negate {}",
                        other.type_name()
                    ))),
                    (UnaryOp::Not, other) => Err(ScriptError::Type(format!(
                        "'!' needs a bool, got {}",
                        other.type_name()
                    ))),
                }
            }
            Expr::Binary(op, left, right) => self.eval_binary(*op, left, right),
            Expr::Assign(name, value_expr) => {
                let value = self.eval_expr(value_expr)?;
                self.env.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Call(name, arg_exprs) => {
                if !builtins::is_builtin(name) {
                    return Err(ScriptError::UnknownFunction(name.clone()));
                }
                let mut args = Vec::with_capacity(arg_exprs.len());
                for arg in arg_exprs {
                    args.push(self.eval_expr(arg)?);
                }
                builtins::call(name, args, self.client.as_mut())
            }
            Expr::Member(target, name) => {
                let value = self.eval_expr(target)?;
                match value {
                    // Missing keys read as null, like an absent header
                    Value::Map(entries) => {
                        Ok(entries.get(name).cloned().unwrap_or(Value::Null))
                    }
                    other => Err(ScriptError::Type(format!(
                        "cannot read member '{}' of {}",
                        name,
                        other.type_name()
                    ))),
                }
            }
            Expr::Index(target, index_expr) => {
                let target = self.eval_expr(target)?;
                let index = self.eval_expr(index_expr)?;
                match (target, index) {
                    (Value::Map(entries), Value::Str(key)) => {
                        Ok(entries.get(&key).cloned().unwrap_or(Value::Null))
                    }
                    (Value::List(items), Value::Number(n)) => {
                        if n.fract() != 0.0 || n < 0.0 {
                            return Err(ScriptError::Type(format!(
                                "bad list index {}",
                                n
                            )));
                        }
                        Ok(items.get(n as usize).cloned().unwrap_or(Value::Null))
                    }
                    (target, index) => Err(ScriptError::Type(format!(
                        "cannot index {} with {}",
                        target.type_name(),
                        index.type_name()
                    ))),
                }
            }
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> ScriptResult<Value> {
        // Short-circuit operators evaluate the right side lazily
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let left = self.expect_bool(op, left)?;
            return match (op, left) {
                (BinaryOp::And, false) => Ok(Value::Bool(false)),
                (BinaryOp::Or, true) => Ok(Value::Bool(true)),
                _ => Ok(Value::Bool(self.expect_bool(op, right)?)),
            };
        }

        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;

        match op {
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::Ne => Ok(Value::Bool(left != right)),
            BinaryOp::Add => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                // String concatenation wins when either side is a string
                (Value::Str(a), b) => Ok(Value::Str(a + &b.to_raw_string())),
                (a, Value::Str(b)) => Ok(Value::Str(a.to_raw_string() + &b)),
                (a, b) => Err(type_mismatch(op, &a, &b)),
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                match (left, right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
                        BinaryOp::Sub => a - b,
                        BinaryOp::Mul => a * b,
                        BinaryOp::Div => a / b,
                        _ => a % b,
                    })),
                    (a, b) => Err(type_mismatch(op, &a, &b)),
                }
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ordering = match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                    (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                    _ => None,
                };
                let Some(ordering) = ordering else {
                    return Err(type_mismatch(op, &left, &right));
                };
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::Le => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }))
            }
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        }
    }

    fn expect_bool(
        &mut self,
        op: BinaryOp,
        expr: &Expr,
    ) -> ScriptResult<bool> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(ScriptError::Type(format!(
                "'{}' needs bools, got {}",
                op.symbol(),
                other.type_name()
            ))),
        }
    }
}

fn type_mismatch(
    op: BinaryOp,
    left: &Value,
    right: &Value,
) -> ScriptError {
    ScriptError::Type(format!(
        "cannot apply '{}' to {} and {}",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

impl REPLBackend for Evaluator {
    fn is_complete(
        &self,
        code: &str,
    ) -> bool {
        is_complete(code)
    }

    fn eval(
        &mut self,
        code: &str,
    ) -> EvalResult {
        self.evaluate(code)
    }

    fn clear(&mut self) {
        self.env.clear();
        self.eval_count = 0;
        self.total_time = Duration::ZERO;
    }

    fn stats(&self) -> ExecutionStats {
        ExecutionStats {
            eval_count: self.eval_count,
            total_time: self.total_time,
        }
    }
}

/// Whether text forms one complete evaluable unit
///
/// Delimiter balancing, string- and escape-aware. An unbalanced *closer*
/// counts as complete: evaluation is the place where that syntax error
/// gets reported.
pub fn is_complete(code: &str) -> bool {
    let code = code.trim();
    if code.is_empty() {
        return true;
    }

    let mut braces = 0;
    let mut brackets = 0;
    let mut parens = 0;
    let mut in_string = false;
    let mut escaped = false;

    for c in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }

        match c {
            '\\' => escaped = true,
            '"' => in_string = !in_string,
            '{' => {
                if !in_string {
                    braces += 1;
                }
            }
            '}' => {
                if !in_string {
                    if braces == 0 {
                        return true;
                    }
                    braces -= 1;
                }
            }
            '[' => {
                if !in_string {
                    brackets += 1;
                }
            }
            ']' => {
                if !in_string {
                    if brackets == 0 {
                        return true;
                    }
                    brackets -= 1;
                }
            }
            '(' => {
                if !in_string {
                    parens += 1;
                }
            }
            ')' => {
                if !in_string {
                    if parens == 0 {
                        return true;
                    }
                    parens -= 1;
                }
            }
            _ => {}
        }
    }

    braces == 0 && brackets == 0 && parens == 0 && !in_string && !escaped
}
