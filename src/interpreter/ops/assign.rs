//! Assignment (`name = expr`)
//!
//! If `name` is visible from the current scope its storage is overwritten in place,
//! wherever it was bound; the value must keep its type. Otherwise a new binding is
//! created in the current scope and the right-hand side's storage becomes that
//! binding's storage.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Variable;
use crate::syntax::ast::Expr;
use tracing::debug;

impl Interpreter {
    pub(crate) fn evaluate_assignment(
        &mut self,
        target: &str,
        value: &Expr,
    ) -> Result<Variable, RuntimeError> {
        let rhs = self.evaluate_expr(value)?;

        if let Some(existing) = self.variable(target) {
            if existing.var_type != rhs.var_type {
                self.discard(&[rhs]);
                return Err(RuntimeError::InvalidOperandType {
                    operator: "=".to_string(),
                    found: format!("{} = {}", existing.var_type, rhs.var_type),
                });
            }
            self.heap.copy(rhs.pointer, existing.pointer)?;
            debug!(name = target, pointer = %existing.pointer, "overwrite");
            return Ok(existing);
        }

        let scope = self.scopes.current_id();
        let bound = self.take_ownership(rhs, scope)?;
        self.scopes.bind_variable(target, bound);
        debug!(name = target, pointer = %bound.pointer, scope = %scope, "bind");
        Ok(bound)
    }
}
