//! Filter statement evaluation using CEL (Common Expression Language).

mod cel;

pub use cel::{
    Degraded, Evaluation, StatementProgram, compile_statement, evaluate_program,
    evaluate_statement,
};
