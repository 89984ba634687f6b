//! CEL statement compilation and evaluation.
//!
//! Filter statements are untrusted, operator-authored snippets. Nothing in
//! this module lets a bad statement unwind into the gate: compile errors,
//! runtime errors, and non-boolean results all degrade to "did not match"
//! after a warning is logged.

use anyhow::Result;
use cel::{Context, Program, Value};
use std::sync::Arc;

use crate::event::Event;

/// A compiled filter statement ready for evaluation.
#[derive(Clone)]
pub struct StatementProgram {
    program: Arc<Program>,
    source: String,
}

impl std::fmt::Debug for StatementProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementProgram")
            .field("source", &self.source)
            .finish()
    }
}

/// Outcome of evaluating one statement against an event.
///
/// `Degraded` carries the diagnostic detail that gets logged; at the decision
/// site it always collapses to "did not match".
#[derive(Debug)]
pub enum Evaluation {
    Matched(bool),
    Degraded(Degraded),
}

#[derive(Debug)]
pub enum Degraded {
    /// The statement is not valid CEL.
    Compile(String),
    /// The statement failed at runtime, e.g. an undefined field access.
    Runtime(String),
    /// The statement produced a non-boolean value of the named type.
    NonBoolean(&'static str),
}

impl Evaluation {
    /// Collapse to the boolean the gate consumes. Degraded statements never
    /// match.
    pub fn matched(&self) -> bool {
        matches!(self, Evaluation::Matched(true))
    }
}

/// Compile a CEL statement string into a program.
pub fn compile_statement(source: &str) -> Result<StatementProgram> {
    let program =
        Program::compile(source).map_err(|e| anyhow::anyhow!("CEL compile error: {}", e))?;

    Ok(StatementProgram {
        program: Arc::new(program),
        source: source.to_string(),
    })
}

/// Evaluate a compiled statement with the event bound as the `event` variable.
pub fn evaluate_program(program: &StatementProgram, event: &Event) -> Evaluation {
    let mut cel_ctx = Context::default();

    if let Err(e) = cel_ctx.add_variable("event", event) {
        return Evaluation::Degraded(Degraded::Runtime(e.to_string()));
    }

    match program.program.execute(&cel_ctx) {
        Ok(Value::Bool(b)) => Evaluation::Matched(b),
        Ok(other) => Evaluation::Degraded(Degraded::NonBoolean(value_type_name(&other))),
        Err(e) => Evaluation::Degraded(Degraded::Runtime(e.to_string())),
    }
}

/// Evaluate a raw statement string against an event.
///
/// Every failure mode logs a warning and resolves as non-match; this function
/// never returns an error to the caller.
pub fn evaluate_statement(event: &Event, statement: &str) -> bool {
    let evaluation = match compile_statement(statement) {
        Ok(program) => evaluate_program(&program, event),
        Err(e) => Evaluation::Degraded(Degraded::Compile(e.to_string())),
    };

    if let Evaluation::Degraded(reason) = &evaluation {
        match reason {
            Degraded::Compile(e) => {
                tracing::warn!(statement, error = %e, "failed to compile filter statement");
            }
            Degraded::Runtime(e) => {
                tracing::warn!(statement, error = %e, "failed to evaluate filter statement");
            }
            Degraded::NonBoolean(ty) => {
                tracing::warn!(statement, result_type = ty, "filters must evaluate to boolean values");
            }
        }
    }

    evaluation.matched()
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::UInt(_) => "uint",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Null => "null",
        Value::List(_) => "list",
        Value::Map(_) => "map",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(status: i64) -> Event {
        serde_json::from_value(serde_json::json!({
            "status": status,
            "entity": "web-01",
        }))
        .unwrap()
    }

    #[test]
    fn literal_true_matches() {
        assert!(evaluate_statement(&event(1), "true"));
    }

    #[test]
    fn literal_false_does_not_match() {
        assert!(!evaluate_statement(&event(1), "false"));
    }

    #[test]
    fn status_comparison() {
        assert!(evaluate_statement(&event(2), "event.status == 2"));
        assert!(!evaluate_statement(&event(1), "event.status == 2"));
    }

    #[test]
    fn extra_fields_reachable_by_name() {
        assert!(evaluate_statement(&event(1), "event.entity == 'web-01'"));
    }

    #[test]
    fn compile_error_degrades_to_non_match() {
        assert!(!evaluate_statement(&event(1), "event.status =="));
    }

    #[test]
    fn runtime_error_degrades_to_non_match() {
        // Undefined field access fails at evaluation time, not compile time.
        assert!(!evaluate_statement(&event(1), "event.no_such_field == 1"));
    }

    #[test]
    fn non_boolean_result_degrades_to_non_match() {
        assert!(!evaluate_statement(&event(1), "event.status"));
        assert!(!evaluate_statement(&event(1), "'a string'"));
    }

    #[test]
    fn compiled_program_is_reusable() {
        let program = compile_statement("event.status != 0").unwrap();
        assert!(evaluate_program(&program, &event(2)).matched());
        assert!(!evaluate_program(&program, &event(0)).matched());
    }
}
