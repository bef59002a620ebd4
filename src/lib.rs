pub mod api;
pub mod assemble;
pub mod ast;
pub mod diagnostic;
pub mod logging;
pub mod lower;
pub mod runtime;
pub mod syntax;

// Re-exports: front-end modules keep short `crate::X` paths
pub use syntax::lexeme;
pub use syntax::span;
pub use syntax::tree;

pub use api::*;
pub use assemble::assemble;
pub use ast::Program;
pub use runtime::{Backend, BackendFailure, Interpreter, InterpreterOptions};
