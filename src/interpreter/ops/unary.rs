//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Value, VarType, Variable};
use crate::syntax::ast::{Expr, UnaryOp};

impl Interpreter {
    pub(crate) fn evaluate_unary_op(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
    ) -> Result<Variable, RuntimeError> {
        let var = self.evaluate_expr(operand)?;
        if var.var_type != VarType::Number {
            self.discard(&[var]);
            return Err(RuntimeError::InvalidOperandType {
                operator: op.symbol().to_string(),
                found: format!("{}{}", op.symbol(), var.var_type),
            });
        }

        let n = self.read_number(var, op.symbol())?;
        let result = match op {
            UnaryOp::Plus => n,
            UnaryOp::Neg => -n,
        };
        self.alloc_value(Value::Number(result))
    }
}
