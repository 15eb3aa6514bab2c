//! Statement execution
//!
//! Adds `impl Interpreter` methods for every statement form except loops, which
//! live in [`loops`](super::loops). Blocks and `if` branches run in their own
//! scope context; `return` and `break` only record a control-flow signal that
//! the enclosing statement lists unwind on.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::ScopeKind;
use crate::syntax::ast::{Expr, Stmt};
use std::rc::Rc;
use tracing::debug;

impl Interpreter {
    /// Execute a single statement
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        if stmt.line() > 0 {
            self.current_line = stmt.line();
        }

        match stmt {
            // A call in statement position may legitimately produce nothing
            Stmt::Expr(Expr::Call { name, args, line }) => {
                self.call_function(name, args, *line)?;
            }

            Stmt::Expr(expr) => {
                self.evaluate_expr(expr)?;
            }

            Stmt::Block { body, .. } => {
                self.with_scope(ScopeKind::Block, "block", |this, _| this.execute(body))?;
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.execute_if(condition, then_branch, else_branch.as_deref())?,

            Stmt::Loop {
                condition, body, ..
            } => self.execute_loop(condition.as_ref(), body)?,

            Stmt::Function(def) => {
                debug!(function = %def.name, params = def.params.len(), "define");
                self.scopes.define_function(Rc::clone(def));
            }

            Stmt::Return { value, .. } => self.execute_return(value.as_ref())?,

            Stmt::Break { .. } => {
                self.control_flow = ControlFlow::Break;
            }
        }

        Ok(())
    }

    fn execute_if(
        &mut self,
        condition: &Expr,
        then_branch: &[Stmt],
        else_branch: Option<&[Stmt]>,
    ) -> Result<(), RuntimeError> {
        if self.evaluate_condition(condition, "if")? {
            self.with_scope(ScopeKind::Block, "if", |this, _| this.execute(then_branch))
        } else if let Some(branch) = else_branch {
            self.with_scope(ScopeKind::Block, "else", |this, _| this.execute(branch))
        } else {
            Ok(())
        }
    }

    /// Store the return value on the innermost function context and start
    /// unwinding to it.
    ///
    /// The value is handed to the caller's context as a temporary before the
    /// function context is popped, so it survives the pop and is swept with the
    /// caller's statement. A `return` outside any function ends the program.
    fn execute_return(&mut self, value: Option<&Expr>) -> Result<(), RuntimeError> {
        let result = match value {
            Some(expr) => Some(self.evaluate_expr(expr)?),
            None => None,
        };

        match self.scopes.caller_id() {
            Some(caller) => {
                let returned = match result {
                    Some(var) => Some(self.detach_to(var, caller)?),
                    None => None,
                };
                self.scopes.set_return_value(returned);
            }
            None => debug!("return at top level"),
        }

        self.control_flow = ControlFlow::Return;
        Ok(())
    }
}
