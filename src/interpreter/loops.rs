//! Loop statement execution
//!
//! A loop re-evaluates its condition (if it has one) in the enclosing scope before
//! every iteration and runs each iteration's body in a fresh loop context, so
//! bindings made by one iteration are freed before the next begins. Temporaries
//! left by the condition are swept after every test. `break` ends the innermost
//! loop; `return` unwinds through it.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::ScopeKind;
use crate::syntax::ast::{Expr, Stmt};
use tracing::trace;

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body ran to completion; the loop should iterate again.
    Continue,
    /// `break` was encountered; the loop should exit cleanly.
    Break,
    /// `return` was triggered; unwind and let the caller see `self.control_flow`.
    Exit,
}

impl Interpreter {
    /// Executes all statements in `body` inside a fresh loop context.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &[Stmt],
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.with_scope(ScopeKind::Loop, "loop", |this, _| {
            this.execute(body)?;
            Ok(match this.control_flow {
                ControlFlow::Normal => LoopBodyResult::Continue,
                ControlFlow::Break => {
                    this.control_flow = ControlFlow::Normal;
                    LoopBodyResult::Break
                }
                ControlFlow::Return => LoopBodyResult::Exit,
            })
        })
    }

    /// Executes `loop (condition) { body }`, or `loop { body }` when the
    /// condition is absent.
    pub(crate) fn execute_loop(
        &mut self,
        condition: Option<&Expr>,
        body: &[Stmt],
    ) -> Result<(), RuntimeError> {
        let mut iterations: u64 = 0;
        loop {
            if let Some(cond) = condition {
                let proceed = self.evaluate_condition(cond, "loop")?;
                self.sweep_condition_temporaries();
                if !proceed {
                    break;
                }
            }

            iterations += 1;
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break | LoopBodyResult::Exit => break,
            }
        }

        trace!(iterations, "loop finished");
        Ok(())
    }

    /// Free what the condition allocated in the enclosing scope. Nothing older
    /// than the current context can be reached by the sweep, so a caller's
    /// pending operands survive.
    fn sweep_condition_temporaries(&mut self) {
        if self.config.sweep_temporaries {
            let floor = self.scopes.current_id();
            self.heap.sweep_temporaries_from(floor);
        }
    }
}
