//! Execution backends.
//!
//! A backend accepts an assembled `Program` and either runs it, with any
//! output on its own side channel, or hands back every diagnostic it found
//! together with the program it could not run. `Interpreter` is the
//! reference implementation.

mod check;
mod interp;
pub mod value;


pub use interp::Interpreter;
pub use value::Value;

use crate::ast::Program;
use crate::diagnostic::Diagnostic;

/// Runs a compiled program.
pub trait Backend {
    fn execute(&mut self, program: Program) -> Result<(), BackendFailure>;
}

/// A backend could not run the program.
#[derive(Debug, thiserror::Error)]
#[error("backend reported {} diagnostic(s)", .diagnostics.len())]
pub struct BackendFailure {
    /// In the order the backend found them.
    pub diagnostics: Vec<Diagnostic>,
    /// The program as it was handed over, for inspection.
    pub program: Program,
}

/// Resource limits for the reference interpreter.
#[derive(Clone, Debug)]
pub struct InterpreterOptions {
    /// Deepest allowed nesting of function calls.
    pub max_call_depth: usize,
    /// Statement and call budget; `None` runs to completion.
    pub max_steps: Option<u64>,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
            max_steps: None,
        }
    }
}
