//! Evaluator execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter with statement execution and scope handling
//! - [`errors`]: Runtime error types and fault codes
//! - [`diagnostics`]: Fault reports (line, scope trace) and the interrupt path
//! - [`constants`]: Sizes and defaults
//!
//! # Execution Model
//!
//! The interpreter walks the typed AST. Expressions evaluate to
//! [`Variable`](crate::memory::value::Variable)s whose bytes live in the simulated
//! heap; every intermediate result is a fresh temporary. After each statement the
//! temporaries of the current function (or the global scope) are swept, and a
//! snapshot is taken when recording is enabled.

pub mod constants;
pub mod diagnostics;
pub mod engine;
pub mod errors;
mod expressions;
mod loops;
mod ops;
mod statements;
