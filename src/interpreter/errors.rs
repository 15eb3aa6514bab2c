//! Runtime error types for the evaluator
//!
//! This module defines [`RuntimeError`], which represents every fault that can occur
//! while lowering or executing a program, and [`ErrorKind`], the stable code each
//! fault is reported under.
//!
//! All runtime errors are fatal - the interpreted language has no way to catch
//! them. They travel up the call chain as values; the driver turns the first one
//! into a report and stops the process.

use crate::memory::heap::HeapError;
use std::fmt;
use thiserror::Error;

/// Stable fault codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfMemory,
    InvalidPointer,
    InvalidOperandType,
    InvalidOperator,
    UndefinedVariable,
    UndefinedFunction,
    MissingArgument,
    NoReturnValue,
    CallDepthExceeded,
    InvalidComposite,
    MalformedTree,
    SnapshotLimitExceeded,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::OutOfMemory => "OUT_OF_MEMORY",
            ErrorKind::InvalidPointer => "INVALID_POINTER",
            ErrorKind::InvalidOperandType => "INVALID_OPERAND_TYPE",
            ErrorKind::InvalidOperator => "INVALID_OPERATOR",
            ErrorKind::UndefinedVariable => "UNDEFINED_VARIABLE",
            ErrorKind::UndefinedFunction => "UNDEFINED_FUNCTION",
            ErrorKind::MissingArgument => "MISSING_ARGUMENT",
            ErrorKind::NoReturnValue => "NO_RETURN_VALUE",
            ErrorKind::CallDepthExceeded => "CALL_DEPTH_EXCEEDED",
            ErrorKind::InvalidComposite => "INVALID_COMPOSITE",
            ErrorKind::MalformedTree => "MALFORMED_TREE",
            ErrorKind::SnapshotLimitExceeded => "SNAPSHOT_LIMIT_EXCEEDED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Runtime errors that can occur during lowering or execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Allocator fault (out of memory, stale or unknown pointer)
    #[error(transparent)]
    Heap(#[from] HeapError),

    /// Operand types do not fit the operator
    #[error("invalid operands to operator '{operator}': {found}")]
    InvalidOperandType { operator: String, found: String },

    /// Operator text with no meaning for the given operand count
    #[error("invalid operator '{operator}'")]
    InvalidOperator { operator: String, line: usize },

    /// Undefined variable reference
    #[error("variable '{name}' does not exist in current scope")]
    UndefinedVariable { name: String },

    /// Undefined function call
    #[error("function '{name}' is not defined")]
    UndefinedFunction { name: String },

    /// Fewer actual arguments than declared parameters
    #[error("missing argument '{parameter}' in call to function '{function}'")]
    MissingArgument { function: String, parameter: String },

    /// A call in value position produced no value
    #[error("function '{function}' does not return a value but is expected to")]
    NoReturnValue { function: String },

    /// Too many nested function calls
    #[error("call to function '{function}' exceeds the maximum call depth of {limit}")]
    CallDepthExceeded { function: String, limit: usize },

    /// Array/object shapes are not supported
    #[error("composite data structure '{shape}' is not supported")]
    InvalidComposite { shape: String },

    /// The syntax tree does not have a shape the evaluator understands
    #[error("malformed syntax tree: {message}")]
    MalformedTree { message: String, line: usize },

    /// Snapshot history limit exceeded
    #[error("snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Heap(HeapError::OutOfMemory { .. }) => ErrorKind::OutOfMemory,
            RuntimeError::Heap(HeapError::InvalidPointer { .. })
            | RuntimeError::Heap(HeapError::Overrun { .. }) => ErrorKind::InvalidPointer,
            RuntimeError::InvalidOperandType { .. } => ErrorKind::InvalidOperandType,
            RuntimeError::InvalidOperator { .. } => ErrorKind::InvalidOperator,
            RuntimeError::UndefinedVariable { .. } => ErrorKind::UndefinedVariable,
            RuntimeError::UndefinedFunction { .. } => ErrorKind::UndefinedFunction,
            RuntimeError::MissingArgument { .. } => ErrorKind::MissingArgument,
            RuntimeError::NoReturnValue { .. } => ErrorKind::NoReturnValue,
            RuntimeError::CallDepthExceeded { .. } => ErrorKind::CallDepthExceeded,
            RuntimeError::InvalidComposite { .. } => ErrorKind::InvalidComposite,
            RuntimeError::MalformedTree { .. } => ErrorKind::MalformedTree,
            RuntimeError::SnapshotLimitExceeded { .. } => ErrorKind::SnapshotLimitExceeded,
        }
    }

    /// Source line carried by the error itself.
    ///
    /// Only faults found while lowering know their line; execution faults are
    /// located by the interpreter's current line instead.
    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::InvalidOperator { line, .. } => Some(*line),
            RuntimeError::MalformedTree { line, .. } => Some(*line),
            _ => None,
        }
    }
}
