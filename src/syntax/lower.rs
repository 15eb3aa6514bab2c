//! Lowering from generic [`SyntaxNode`]s to the typed AST
//!
//! The front end labels nodes with strings (`"operator"`, `"call"`, ...) and puts
//! operator text in `description`. Lowering resolves all of that once, up front,
//! into the closed [`Expr`] / [`Stmt`] enums the evaluator matches on. Unknown
//! operators surface here as [`RuntimeError::InvalidOperator`]; unknown labels and
//! missing parts as [`RuntimeError::MalformedTree`].
//!
//! # Node shapes
//!
//! | label | shape |
//! |---|---|
//! | `scope`, `block` | statements in `children` |
//! | `literal` | number or boolean text in `description` |
//! | `primary` | identifier (or literal) text; any `children` make it a composite |
//! | `operator` | operator text in `description`, operands in `children` |
//! | `call` | callee in `description`, actuals in `properties["args0"]`, `["args1"]`, ... |
//! | `function` | name in `description`, formals in `properties["args"]`, `properties["body"]` |
//! | `if` | `properties["condition"]`, `["body"]`, optional `["else"]` |
//! | `loop` | optional `properties["condition"]`, `["body"]` |
//! | `return` | optional operand in `children[0]` |
//! | `break` | nothing |

use super::ast::{BinaryOp, Expr, FunctionDef, Literal, Program, Stmt, UnaryOp};
use super::node::SyntaxNode;
use crate::interpreter::errors::RuntimeError;
use std::rc::Rc;

/// Lower a whole tree. The root is treated as the global statement block.
pub fn lower_program(root: &SyntaxNode) -> Result<Program, RuntimeError> {
    Ok(Program::new(lower_block(root)?))
}

/// Lower a statement node
pub fn lower_statement(node: &SyntaxNode) -> Result<Stmt, RuntimeError> {
    let line = node.line_number;
    match node.label.as_str() {
        "scope" | "block" => Ok(Stmt::Block {
            body: lower_block(node)?,
            line,
        }),
        "if" => lower_if(node),
        "loop" => {
            let condition = node.property("condition").map(lower_expression).transpose()?;
            let body = lower_block(required(node, "body")?)?;
            Ok(Stmt::Loop {
                condition,
                body,
                line,
            })
        }
        "function" => lower_function(node),
        "return" => Ok(Stmt::Return {
            value: node.children.first().map(lower_expression).transpose()?,
            line,
        }),
        "break" => Ok(Stmt::Break { line }),
        "literal" | "primary" | "operator" | "call" => Ok(Stmt::Expr(lower_expression(node)?)),
        other => Err(malformed(format!("unexpected statement '{}'", other), line)),
    }
}

/// Lower an expression node
pub fn lower_expression(node: &SyntaxNode) -> Result<Expr, RuntimeError> {
    let line = node.line_number;
    let text = node.description.as_str();
    match node.label.as_str() {
        "literal" => parse_literal(text)
            .map(|value| Expr::Literal { value, line })
            .ok_or_else(|| malformed(format!("invalid literal '{}'", text), line)),
        "primary" => {
            if !node.children.is_empty() {
                Ok(Expr::Composite {
                    shape: text.to_string(),
                    line,
                })
            } else if let Some(value) = parse_literal(text) {
                Ok(Expr::Literal { value, line })
            } else if text.is_empty() {
                Err(malformed("primary without a name".to_string(), line))
            } else {
                Ok(Expr::Identifier {
                    name: text.to_string(),
                    line,
                })
            }
        }
        "operator" => lower_operator(node),
        "call" => lower_call(node),
        other => Err(malformed(format!("invalid expression '{}'", other), line)),
    }
}

/// Parse number or boolean literal text
pub fn parse_literal(text: &str) -> Option<Literal> {
    parse_number(text)
        .map(Literal::Number)
        .or_else(|| parse_boolean(text).map(Literal::Boolean))
}

/// Digits with an optional decimal point; no sign, exponent or `inf`/`NaN`
pub fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse().ok()
}

pub fn parse_boolean(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn lower_block(node: &SyntaxNode) -> Result<Vec<Stmt>, RuntimeError> {
    if matches!(node.label.as_str(), "scope" | "block") {
        node.children.iter().map(lower_statement).collect()
    } else {
        Ok(vec![lower_statement(node)?])
    }
}

fn lower_if(node: &SyntaxNode) -> Result<Stmt, RuntimeError> {
    let condition = lower_expression(required(node, "condition")?)?;
    let then_branch = lower_block(required(node, "body")?)?;
    let else_branch = match node.property("else") {
        Some(other) if other.label == "if" => Some(vec![lower_if(other)?]),
        Some(other) => Some(lower_block(other)?),
        None => None,
    };

    Ok(Stmt::If {
        condition,
        then_branch,
        else_branch,
        line: node.line_number,
    })
}

fn lower_function(node: &SyntaxNode) -> Result<Stmt, RuntimeError> {
    let line = node.line_number;
    if node.description.is_empty() {
        return Err(malformed("function without a name".to_string(), line));
    }

    let params = match node.property("args") {
        Some(args) => args
            .children
            .iter()
            .map(|param| {
                if param.description.is_empty() {
                    Err(malformed(
                        format!("unnamed parameter in function '{}'", node.description),
                        param.line_number,
                    ))
                } else {
                    Ok(param.description.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let body = lower_block(required(node, "body")?)?;

    Ok(Stmt::Function(Rc::new(FunctionDef {
        name: node.description.clone(),
        params,
        body,
        line,
    })))
}

fn lower_operator(node: &SyntaxNode) -> Result<Expr, RuntimeError> {
    let line = node.line_number;
    let symbol = node.description.as_str();
    let invalid = || RuntimeError::InvalidOperator {
        operator: symbol.to_string(),
        line,
    };

    match node.children.as_slice() {
        [operand] => {
            let operand = Box::new(lower_expression(operand)?);
            match symbol {
                "+" => Ok(Expr::Unary {
                    op: UnaryOp::Plus,
                    operand,
                    line,
                }),
                "-" => Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand,
                    line,
                }),
                "#" => Ok(Expr::Print { operand, line }),
                _ => Err(invalid()),
            }
        }
        [left, right] => {
            if symbol == "=" {
                return Ok(Expr::Assign {
                    target: assignment_target(left)?,
                    value: Box::new(lower_expression(right)?),
                    line,
                });
            }

            let op = BinaryOp::from_symbol(symbol).ok_or_else(invalid)?;
            Ok(Expr::Binary {
                op,
                left: Box::new(lower_expression(left)?),
                right: Box::new(lower_expression(right)?),
                line,
            })
        }
        operands => {
            if BinaryOp::from_symbol(symbol).is_some() || symbol == "=" || symbol == "#" {
                Err(malformed(
                    format!(
                        "operator '{}' applied to {} operands",
                        symbol,
                        operands.len()
                    ),
                    line,
                ))
            } else {
                Err(invalid())
            }
        }
    }
}

fn lower_call(node: &SyntaxNode) -> Result<Expr, RuntimeError> {
    let line = node.line_number;
    if node.description.is_empty() {
        return Err(malformed("call without a callee".to_string(), line));
    }

    let mut args = Vec::new();
    while let Some(arg) = node.property(&format!("args{}", args.len())) {
        args.push(lower_expression(arg)?);
    }

    Ok(Expr::Call {
        name: node.description.clone(),
        args,
        line,
    })
}

fn assignment_target(node: &SyntaxNode) -> Result<String, RuntimeError> {
    let is_name = matches!(node.label.as_str(), "primary" | "identifier")
        && node.children.is_empty()
        && !node.description.is_empty()
        && parse_literal(&node.description).is_none();

    if is_name {
        Ok(node.description.clone())
    } else {
        Err(malformed(
            format!("cannot assign to '{}'", node.description),
            node.line_number,
        ))
    }
}

fn required<'a>(node: &'a SyntaxNode, name: &str) -> Result<&'a SyntaxNode, RuntimeError> {
    node.property(name).ok_or_else(|| {
        malformed(
            format!("'{}' node is missing its '{}'", node.label, name),
            node.line_number,
        )
    })
}

fn malformed(message: String, line: usize) -> RuntimeError {
    RuntimeError::MalformedTree { message, line }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::errors::ErrorKind;

    fn literal(text: &str) -> SyntaxNode {
        SyntaxNode::new("literal", text)
    }

    fn operator(symbol: &str, operands: Vec<SyntaxNode>) -> SyntaxNode {
        operands
            .into_iter()
            .fold(SyntaxNode::new("operator", symbol), SyntaxNode::with_child)
    }

    #[test]
    fn test_lower_nested_binary() {
        let tree = operator(
            "+",
            vec![literal("1"), operator("*", vec![literal("2"), literal("3")])],
        );
        let expr = lower_expression(&tree).unwrap();

        match expr {
            Expr::Binary {
                op: BinaryOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. })),
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_star_is_invalid_operator() {
        let tree = operator("*", vec![literal("2")]).at_line(4);
        let err = lower_expression(&tree).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidOperator);
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_unknown_operator() {
        let tree = operator("%", vec![literal("2"), literal("3")]);
        let err = lower_expression(&tree).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperator);
    }

    #[test]
    fn test_call_collects_positional_args() {
        let tree = SyntaxNode::new("call", "add")
            .with_property("args0", literal("1"))
            .with_property("args1", SyntaxNode::new("primary", "x"))
            .with_property("args3", literal("9"));

        match lower_expression(&tree).unwrap() {
            Expr::Call { name, args, .. } => {
                assert_eq!(name, "add");
                // args3 is not reachable without args2
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_primary_with_children_is_composite() {
        let tree = SyntaxNode::new("primary", "array").with_child(literal("1"));
        assert!(matches!(
            lower_expression(&tree).unwrap(),
            Expr::Composite { .. }
        ));
    }

    #[test]
    fn test_else_if_chain() {
        let inner = SyntaxNode::new("if", "")
            .with_property("condition", literal("false"))
            .with_property("body", SyntaxNode::new("scope", ""));
        let outer = SyntaxNode::new("if", "")
            .with_property("condition", literal("true"))
            .with_property("body", SyntaxNode::new("scope", ""))
            .with_property("else", inner);

        match lower_statement(&outer).unwrap() {
            Stmt::If {
                else_branch: Some(branch),
                ..
            } => assert!(matches!(branch.as_slice(), [Stmt::If { .. }])),
            other => panic!("Expected if with else-if, got {:?}", other),
        }
    }

    #[test]
    fn test_number_parsing_rejects_words() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-1"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_missing_body_is_malformed() {
        let tree = SyntaxNode::new("loop", "").at_line(7);
        let err = lower_statement(&tree).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedTree);
        assert_eq!(err.line(), Some(7));
    }
}
