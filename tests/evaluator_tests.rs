// Expression evaluator tests on hand-built ASTs

use lingo::config::RunConfig;
use lingo::interpreter::engine::Interpreter;
use lingo::interpreter::errors::{ErrorKind, RuntimeError};
use lingo::memory::value::{Ownership, ScopeId, Value, VarType};
use lingo::syntax::ast::{BinaryOp, Expr, Literal, Program, Stmt, UnaryOp};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn interpreter() -> Interpreter {
    Interpreter::new(Program::default(), RunConfig::default())
}

fn num(n: f64) -> Expr {
    Expr::Literal {
        value: Literal::Number(n),
        line: 1,
    }
}

fn boolean(b: bool) -> Expr {
    Expr::Literal {
        value: Literal::Boolean(b),
        line: 1,
    }
}

fn ident(name: &str) -> Expr {
    Expr::Identifier {
        name: name.to_string(),
        line: 1,
    }
}

fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        line: 1,
    }
}

fn assign(target: &str, value: Expr) -> Expr {
    Expr::Assign {
        target: target.to_string(),
        value: Box::new(value),
        line: 1,
    }
}

#[test]
fn test_nested_arithmetic() {
    let mut interp = interpreter();
    let expr = bin(
        BinaryOp::Add,
        num(1.0),
        bin(BinaryOp::Mul, num(2.0), num(3.0)),
    );

    let var = interp.evaluate_expr(&expr).unwrap();
    assert_eq!(var.var_type, VarType::Number);
    assert_eq!(interp.read_value(var).unwrap(), Value::Number(7.0));
}

#[test]
fn test_results_are_fresh_temporaries() {
    let mut interp = interpreter();
    let left = interp.evaluate_expr(&num(2.0)).unwrap();
    let sum = interp.evaluate_expr(&bin(BinaryOp::Sub, num(2.0), num(5.0))).unwrap();

    assert_ne!(left.pointer.address(), sum.pointer.address());
    assert_eq!(interp.read_value(left).unwrap(), Value::Number(2.0));
    assert_eq!(interp.read_value(sum).unwrap(), Value::Number(-3.0));
    assert_eq!(
        interp.heap().ownership(sum.pointer).unwrap(),
        Ownership::Temporary(ScopeId::GLOBAL)
    );
}

#[test]
fn test_new_binding_adopts_without_copy() {
    let mut interp = interpreter();
    let bound = interp.evaluate_expr(&assign("x", num(4.0))).unwrap();

    assert_eq!(interp.heap().live_count(), 1);
    assert_eq!(interp.variable("x"), Some(bound));
    assert_eq!(
        interp.heap().ownership(bound.pointer).unwrap(),
        Ownership::Owned(ScopeId::GLOBAL)
    );
}

#[test]
fn test_reassignment_keeps_address() {
    let mut interp = interpreter();
    interp.execute(&[Stmt::Expr(assign("x", num(1.0)))]).unwrap();
    let before = interp.variable("x").unwrap();

    interp
        .execute(&[Stmt::Expr(assign("x", bin(BinaryOp::Add, ident("x"), num(4.0))))])
        .unwrap();
    let after = interp.variable("x").unwrap();

    assert_eq!(before.pointer, after.pointer);
    assert_eq!(interp.value_of("x"), Some(Value::Number(5.0)));
    assert_eq!(interp.heap().live_count(), 1);
}

#[test]
fn test_chained_assignment_does_not_alias() {
    let mut interp = interpreter();
    interp
        .execute(&[Stmt::Expr(assign("a", assign("b", num(2.0))))])
        .unwrap();

    let a = interp.variable("a").unwrap();
    let b = interp.variable("b").unwrap();
    assert_ne!(a.pointer.address(), b.pointer.address());

    interp.execute(&[Stmt::Expr(assign("b", num(9.0)))]).unwrap();
    assert_eq!(interp.value_of("a"), Some(Value::Number(2.0)));
    assert_eq!(interp.value_of("b"), Some(Value::Number(9.0)));
}

#[test]
fn test_identifier_is_an_independent_copy() {
    let mut interp = interpreter();
    interp.execute(&[Stmt::Expr(assign("x", num(3.0)))]).unwrap();

    let copy = interp.evaluate_expr(&ident("x")).unwrap();
    let bound = interp.variable("x").unwrap();
    assert_ne!(copy.pointer, bound.pointer);
    assert_eq!(interp.read_value(copy).unwrap(), Value::Number(3.0));
}

#[test]
fn test_sweep_restores_occupancy_after_pure_statement() {
    let mut interp = interpreter();
    interp.execute(&[Stmt::Expr(assign("x", num(1.0)))]).unwrap();
    let before = interp.heap().occupied();

    let pure = bin(
        BinaryOp::Lt,
        bin(BinaryOp::Mul, ident("x"), num(2.0)),
        num(10.0),
    );
    interp.execute(&[Stmt::Expr(pure)]).unwrap();

    assert_eq!(interp.heap().occupied(), before);
}

#[test]
fn test_logical_on_numbers_allocates_nothing() {
    let mut interp = interpreter();
    let before = interp.heap().occupied();

    let err = interp
        .evaluate_expr(&bin(BinaryOp::And, num(1.0), num(0.0)))
        .unwrap_err();

    assert_eq!(
        err,
        RuntimeError::InvalidOperandType {
            operator: "&&".to_string(),
            found: "number && number".to_string(),
        }
    );
    assert_eq!(interp.heap().occupied(), before);
}

#[test]
fn test_comparison_on_booleans_allocates_nothing() {
    let mut interp = interpreter();
    interp.execute(&[Stmt::Expr(assign("flag", boolean(true)))]).unwrap();
    let before = interp.heap().occupied();

    let err = interp
        .evaluate_expr(&bin(BinaryOp::Gt, ident("flag"), boolean(false)))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidOperandType);
    assert_eq!(interp.heap().occupied(), before);
    assert_eq!(interp.value_of("flag"), Some(Value::Boolean(true)));
}

#[test]
fn test_logical_operators_on_booleans() {
    let mut interp = interpreter();
    let cases = [
        (BinaryOp::And, true, true, true),
        (BinaryOp::And, true, false, false),
        (BinaryOp::Or, false, true, true),
        (BinaryOp::Or, false, false, false),
    ];

    for (op, a, b, expected) in cases {
        let var = interp.evaluate_expr(&bin(op, boolean(a), boolean(b))).unwrap();
        assert_eq!(interp.read_value(var).unwrap(), Value::Boolean(expected));
    }
}

#[test]
fn test_unary_minus() {
    let mut interp = interpreter();
    let neg = Expr::Unary {
        op: UnaryOp::Neg,
        operand: Box::new(num(2.5)),
        line: 1,
    };
    let var = interp.evaluate_expr(&neg).unwrap();
    assert_eq!(interp.read_value(var).unwrap(), Value::Number(-2.5));

    let bad = Expr::Unary {
        op: UnaryOp::Plus,
        operand: Box::new(boolean(true)),
        line: 1,
    };
    assert_eq!(
        interp.evaluate_expr(&bad).unwrap_err().kind(),
        ErrorKind::InvalidOperandType
    );
}

#[test]
fn test_print_returns_its_operand() {
    let mut interp = interpreter();
    let operand = interp.evaluate_expr(&num(8.0)).unwrap();
    let print = Expr::Print {
        operand: Box::new(bin(BinaryOp::Div, num(1.0), num(4.0))),
        line: 3,
    };

    let printed = interp.evaluate_expr(&print).unwrap();
    assert_ne!(printed.pointer, operand.pointer);
    assert_eq!(interp.read_value(printed).unwrap(), Value::Number(0.25));
    assert_eq!(interp.output().get_output(), vec!["0.25"]);
    assert_eq!(interp.output().lines[0].line, 3);
}

#[test]
fn test_undefined_variable() {
    let mut interp = interpreter();
    assert_eq!(
        interp.evaluate_expr(&ident("nope")),
        Err(RuntimeError::UndefinedVariable {
            name: "nope".to_string(),
        })
    );
}

#[test]
fn test_composite_is_invalid() {
    let mut interp = interpreter();
    let composite = Expr::Composite {
        shape: "array".to_string(),
        line: 1,
    };
    assert_eq!(
        interp.evaluate_expr(&composite).unwrap_err().kind(),
        ErrorKind::InvalidComposite
    );
}

proptest! {
    #[test]
    fn prop_literals_decode_at_distinct_addresses(
        numbers in prop::collection::vec(-1.0e12f64..1.0e12, 1..20),
        flags in prop::collection::vec(any::<bool>(), 1..20),
    ) {
        let mut interp = interpreter();
        let mut addresses = Vec::new();

        for n in &numbers {
            let var = interp.evaluate_expr(&num(*n)).unwrap();
            prop_assert_eq!(interp.read_value(var).unwrap(), Value::Number(*n));
            addresses.push(var.pointer.address());
        }
        for b in &flags {
            let var = interp.evaluate_expr(&boolean(*b)).unwrap();
            prop_assert_eq!(interp.read_value(var).unwrap(), Value::Boolean(*b));
            addresses.push(var.pointer.address());
        }

        let count = addresses.len();
        addresses.sort_unstable();
        addresses.dedup();
        prop_assert_eq!(addresses.len(), count);
    }
}
