//! Expression evaluation
//!
//! Every expression evaluates to a [`Variable`] whose storage lives in the heap:
//!
//! - Literals allocate a fresh temporary holding the constant
//! - Identifiers duplicate the bound value into a fresh temporary
//! - Operators read their operands and allocate the result
//! - `#` prints its operand and evaluates to that same variable
//! - Calls in value position evaluate to the callee's return value
//!
//! Temporaries belong to the scope that was current when they were allocated and
//! are swept between statements.

use crate::interpreter::constants::MAX_CALL_DEPTH;
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::ScopeKind;
use crate::memory::value::{Ownership, Value, Variable};
use crate::syntax::ast::{Expr, Literal};
use tracing::debug;

impl Interpreter {
    /// Evaluate an expression and return the variable holding its result
    pub fn evaluate_expr(&mut self, expr: &Expr) -> Result<Variable, RuntimeError> {
        if expr.line() > 0 {
            self.current_line = expr.line();
        }

        match expr {
            Expr::Literal { value, .. } => self.alloc_value(match value {
                Literal::Number(n) => Value::Number(*n),
                Literal::Boolean(b) => Value::Boolean(*b),
            }),

            Expr::Identifier { name, .. } => self.evaluate_identifier(name),

            Expr::Unary { op, operand, .. } => self.evaluate_unary_op(*op, operand),

            Expr::Binary {
                op, left, right, ..
            } => self.evaluate_binary_op(*op, left, right),

            Expr::Assign { target, value, .. } => self.evaluate_assignment(target, value),

            Expr::Print { operand, line } => self.evaluate_print(operand, *line),

            Expr::Call { name, args, line } => self
                .call_function(name, args, *line)?
                .ok_or_else(|| RuntimeError::NoReturnValue {
                    function: name.clone(),
                }),

            Expr::Composite { shape, .. } => Err(RuntimeError::InvalidComposite {
                shape: shape.clone(),
            }),
        }
    }

    /// Copy a bound variable into a fresh temporary
    fn evaluate_identifier(&mut self, name: &str) -> Result<Variable, RuntimeError> {
        let var = self
            .variable(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })?;
        let owner = Ownership::Temporary(self.scopes.current_id());
        self.duplicate(var, owner)
    }

    fn evaluate_print(&mut self, operand: &Expr, line: usize) -> Result<Variable, RuntimeError> {
        let var = self.evaluate_expr(operand)?;
        let text = self.read_value(var)?.to_string();
        if self.config.echo_output {
            println!("{}", text);
        }
        self.output.print(text, line);
        Ok(var)
    }

    /// Call a user function.
    ///
    /// Actual arguments are evaluated in the caller's context, then bound to the
    /// parameters inside a fresh function context. Arguments beyond the declared
    /// parameters are never evaluated. Returns the value stored by `return`, if any.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: &[Expr],
        line: usize,
    ) -> Result<Option<Variable>, RuntimeError> {
        if line > 0 {
            self.current_line = line;
        }
        let caller_line = self.current_line;

        let def = self
            .scopes
            .lookup_function(name)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
            })?;
        if self.scopes.call_depth() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded {
                function: def.name.clone(),
                limit: MAX_CALL_DEPTH,
            });
        }

        let mut actuals = Vec::with_capacity(def.params.len());
        for (index, param) in def.params.iter().enumerate() {
            let arg = args.get(index).ok_or_else(|| RuntimeError::MissingArgument {
                function: def.name.clone(),
                parameter: param.clone(),
            })?;
            actuals.push(self.evaluate_expr(arg)?);
        }

        debug!(function = %def.name, args = actuals.len(), "call");
        let result = self.with_scope(ScopeKind::Function, &def.name, |this, scope| {
            for (param, actual) in def.params.iter().zip(actuals) {
                let bound = this.take_ownership(actual, scope)?;
                this.scopes.bind_variable(param, bound);
            }

            this.execute(&def.body)?;
            this.control_flow = ControlFlow::Normal;
            Ok(this.scopes.current().and_then(|ctx| ctx.return_value()))
        })?;

        self.current_line = caller_line;
        Ok(result)
    }

    /// Decode a variable as a number
    pub(crate) fn read_number(&self, var: Variable, operator: &str) -> Result<f64, RuntimeError> {
        match self.read_value(var)? {
            Value::Number(n) => Ok(n),
            other => Err(RuntimeError::InvalidOperandType {
                operator: operator.to_string(),
                found: other.var_type().to_string(),
            }),
        }
    }

    /// Evaluate a condition for `if` or a loop; anything but a boolean is a fault
    pub(crate) fn evaluate_condition(
        &mut self,
        condition: &Expr,
        construct: &str,
    ) -> Result<bool, RuntimeError> {
        let var = self.evaluate_expr(condition)?;
        match self.read_value(var)?.as_bool() {
            Some(flag) => Ok(flag),
            None => {
                self.discard(&[var]);
                Err(RuntimeError::InvalidOperandType {
                    operator: construct.to_string(),
                    found: var.var_type.to_string(),
                })
            }
        }
    }
}
