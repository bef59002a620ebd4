//! Pipeline entry points: source text → `Program` → backend.

use rayon::prelude::*;

use crate::assemble::assemble;
use crate::ast::Program;
use crate::diagnostic::{render_diagnostics, Diagnostic};
use crate::lower::{lower_program, LowerError};
use crate::runtime::{Backend, BackendFailure};
use crate::syntax::{self, DEFAULT_MAX_NESTING_DEPTH};


/// Options controlling compilation.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Render failures to stderr with source context.
    pub render_diagnostics: bool,
    /// Deepest statement/expression nesting the parser accepts.
    pub max_nesting_depth: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            render_diagnostics: true,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl CompileOptions {
    /// Default options without stderr rendering.
    pub fn silent() -> Self {
        Self {
            render_diagnostics: false,
            ..Self::default()
        }
    }
}

/// A compile request failed before a program existed.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("source has {} syntax error(s)", .0.len())]
    Syntax(Vec<Diagnostic>),
    #[error(transparent)]
    Lower(#[from] LowerError),
}

impl CompileError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::Syntax(diagnostics) => diagnostics.clone(),
            CompileError::Lower(err) => vec![err.to_diagnostic()],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Backend(#[from] BackendFailure),
}

impl RunError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            RunError::Compile(err) => err.diagnostics(),
            RunError::Backend(failure) => failure.diagnostics.clone(),
        }
    }
}

/// Compile a source string to a `Program`.
pub fn compile(source: &str, filename: &str) -> Result<Program, CompileError> {
    compile_with_options(source, filename, &CompileOptions::default())
}

/// Compile a source string to a `Program` with options.
#[tracing::instrument(skip(source, options), fields(bytes = source.len()))]
pub fn compile_with_options(
    source: &str,
    filename: &str,
    options: &CompileOptions,
) -> Result<Program, CompileError> {
    let tree = match syntax::parse(source, options.max_nesting_depth) {
        Ok(tree) => tree,
        Err(errors) => {
            tracing::debug!(errors = errors.len(), "syntax errors");
            if options.render_diagnostics {
                render_diagnostics(&errors, filename, source);
            }
            return Err(CompileError::Syntax(errors));
        }
    };
    tracing::debug!(nodes = tree.size(), "parsed");

    let statements = match lower_program(&tree) {
        Ok(statements) => statements,
        Err(err) => {
            if options.render_diagnostics {
                err.to_diagnostic().render(filename, source);
            }
            return Err(err.into());
        }
    };

    Ok(assemble(statements))
}

/// Compile and hand the program to `backend`.
pub fn run<B: Backend + ?Sized>(
    source: &str,
    filename: &str,
    backend: &mut B,
) -> Result<(), RunError> {
    run_with_options(source, filename, &CompileOptions::default(), backend)
}

/// Compile with options and hand the program to `backend`. On backend
/// failure the diagnostics and the generated program are rendered, if
/// rendering is enabled.
#[tracing::instrument(skip(source, options, backend))]
pub fn run_with_options<B: Backend + ?Sized>(
    source: &str,
    filename: &str,
    options: &CompileOptions,
    backend: &mut B,
) -> Result<(), RunError> {
    let program = compile_with_options(source, filename, options)?;
    backend.execute(program).map_err(|failure| {
        tracing::warn!(diagnostics = failure.diagnostics.len(), "backend failed");
        if options.render_diagnostics {
            for diagnostic in &failure.diagnostics {
                eprintln!("{}", diagnostic);
            }
            eprintln!("generated program:\n{}", failure.program);
        }
        RunError::Backend(failure)
    })
}

/// Compile independent `(filename, source)` requests in parallel.
/// Results come back in input order.
pub fn compile_batch(requests: &[(&str, &str)]) -> Vec<Result<Program, CompileError>> {
    compile_batch_with_options(requests, &CompileOptions::default())
}

pub fn compile_batch_with_options(
    requests: &[(&str, &str)],
    options: &CompileOptions,
) -> Vec<Result<Program, CompileError>> {
    requests
        .par_iter()
        .map(|(filename, source)| compile_with_options(source, filename, options))
        .collect()
}
