//! Binary operator evaluation
//!
//! Arithmetic and comparison operators take two numbers, logical operators two
//! booleans. Both operands are always evaluated, left first. A type mismatch
//! releases the operand temporaries before the fault is raised, so a failed
//! operator leaves the heap as it found it.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Value, VarType, Variable};
use crate::syntax::ast::{BinaryOp, Expr};

impl Interpreter {
    pub(crate) fn evaluate_binary_op(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Variable, RuntimeError> {
        let lhs = self.evaluate_expr(left)?;
        let rhs = self.evaluate_expr(right)?;

        let a = self.read_value(lhs)?;
        let b = self.read_value(rhs)?;
        match Self::apply_binary(op, a, b) {
            Some(result) => self.alloc_value(result),
            None => {
                self.discard(&[lhs, rhs]);
                Err(Self::mismatch(op, lhs.var_type, rhs.var_type))
            }
        }
    }

    fn mismatch(op: BinaryOp, left: VarType, right: VarType) -> RuntimeError {
        RuntimeError::InvalidOperandType {
            operator: op.symbol().to_string(),
            found: format!("{} {} {}", left, op.symbol(), right),
        }
    }

    /// Compute `a op b`; `None` when the operand types do not fit the operator
    pub(crate) fn apply_binary(op: BinaryOp, a: Value, b: Value) -> Option<Value> {
        use BinaryOp::*;

        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match op {
                // IEEE semantics: division by zero yields an infinity or NaN
                Add => Some(Value::Number(x + y)),
                Sub => Some(Value::Number(x - y)),
                Mul => Some(Value::Number(x * y)),
                Div => Some(Value::Number(x / y)),
                Lt => Some(Value::Boolean(x < y)),
                Gt => Some(Value::Boolean(x > y)),
                Le => Some(Value::Boolean(x <= y)),
                Ge => Some(Value::Boolean(x >= y)),
                Eq => Some(Value::Boolean(x == y)),
                Ne => Some(Value::Boolean(x != y)),
                And | Or => None,
            },
            (Value::Boolean(x), Value::Boolean(y)) => match op {
                And => Some(Value::Boolean(x && y)),
                Or => Some(Value::Boolean(x || y)),
                _ => None,
            },
            _ => None,
        }
    }
}
