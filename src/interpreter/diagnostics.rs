//! Fault reports
//!
//! A [`Diagnostic`] is what the user sees when a program stops on a fault: the
//! fault code, a message, the source line and the scope trace at the moment of
//! failure (innermost context first). [`interrupt`] prints one and terminates
//! the process with a failure status.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::{ErrorKind, RuntimeError};
use crate::memory::scope::ScopeFrame;
use crossterm::style::Stylize;
use std::fmt;
use std::process;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    /// Source line of the failing node, if it carried one
    pub line: Option<usize>,
    /// Scope contexts live at the fault, innermost first
    pub trace: Vec<ScopeFrame>,
}

impl Diagnostic {
    /// Report for a fault raised before any scope existed (e.g. while lowering)
    pub fn from_error(err: &RuntimeError) -> Self {
        Diagnostic {
            kind: err.kind(),
            message: err.to_string(),
            line: err.line().filter(|line| *line > 0),
            trace: Vec::new(),
        }
    }

    /// First line of the report: location, code and message
    pub fn headline(&self) -> String {
        match self.line {
            Some(line) => format!("error at line {}: {}: {}", line, self.kind, self.message),
            None => format!("error: {}: {}", self.kind, self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline())?;
        for frame in &self.trace {
            write!(f, "\n  in {}", frame)?;
        }
        Ok(())
    }
}

impl Interpreter {
    /// Build the report for a fault raised by [`Interpreter::run`].
    ///
    /// The line is the one carried by the error, or else the line of the node
    /// being executed when it was raised.
    pub fn diagnose(&self, err: &RuntimeError) -> Diagnostic {
        let line = Some(err.line().unwrap_or(self.current_line)).filter(|line| *line > 0);

        Diagnostic {
            kind: err.kind(),
            message: err.to_string(),
            line,
            trace: self.scopes.trace(),
        }
    }
}

/// Print a diagnostic to stderr and terminate with a failure status
pub fn interrupt(diagnostic: &Diagnostic) -> ! {
    eprintln!("{}", diagnostic.headline().red().bold());
    for frame in &diagnostic.trace {
        eprintln!("{}", format!("  in {}", frame).red());
    }
    eprintln!("{}", "execution interrupted".red());
    process::exit(1)
}
