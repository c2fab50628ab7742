//! Node factory.
//!
//! Free functions that build new nodes. Every function returns a fresh
//! value; existing nodes are never modified. [`update_call_expression`]
//! rebuilds a call while keeping the identity (span) of the original site.

use std::sync::Arc;

use super::expr::{
    ArrowBody, ArrowFunction, BinaryOp, CallExpr, Decorator, Expr, ObjectProperty, Span, Stmt,
    UnaryOp,
};
use super::type_node::TypeNode;

// =============================================================================
// Leaves
// =============================================================================

/// `name`
pub fn identifier(name: impl Into<String>) -> Expr {
    Expr::Identifier { name: name.into() }
}

/// `"value"`
pub fn string_literal(value: impl Into<String>) -> Expr {
    Expr::StringLiteral {
        value: value.into(),
    }
}

/// `value`
pub fn numeric_literal(value: f64) -> Expr {
    Expr::NumericLiteral { value }
}

/// `true` / `false`
pub fn boolean_literal(value: bool) -> Expr {
    Expr::BooleanLiteral { value }
}

/// `null`
pub fn null() -> Expr {
    Expr::Null
}

/// `undefined`
pub fn undefined() -> Expr {
    identifier("undefined")
}

// =============================================================================
// Member access and calls
// =============================================================================

/// `object.name`
pub fn property_access(object: impl Into<Arc<Expr>>, name: impl Into<String>) -> Expr {
    Expr::PropertyAccess {
        object: object.into(),
        name: name.into(),
    }
}

/// `object[index]`
pub fn element_access(object: impl Into<Arc<Expr>>, index: impl Into<Arc<Expr>>) -> Expr {
    Expr::ElementAccess {
        object: object.into(),
        index: index.into(),
    }
}

/// `object.key` when `key` is a valid identifier, `object["key"]` otherwise.
pub fn member(object: impl Into<Arc<Expr>>, key: &str) -> Expr {
    if super::printer::is_identifier(key) {
        property_access(object, key)
    } else {
        element_access(object, string_literal(key))
    }
}

/// `callee(arguments...)` with no type arguments and a synthetic span.
pub fn call(callee: impl Into<Arc<Expr>>, arguments: Vec<Expr>) -> Expr {
    Expr::Call(create_call_expression(
        callee,
        Vec::new(),
        arguments.into_iter().map(Arc::new).collect(),
    ))
}

/// Build a new call expression node.
pub fn create_call_expression(
    callee: impl Into<Arc<Expr>>,
    type_arguments: Vec<TypeNode>,
    arguments: Vec<Arc<Expr>>,
) -> CallExpr {
    CallExpr {
        callee: callee.into(),
        type_arguments,
        arguments,
        span: Span::default(),
    }
}

/// Rebuild `node` with new parts, keeping its call-site span.
pub fn update_call_expression(
    node: &CallExpr,
    callee: Arc<Expr>,
    type_arguments: Vec<TypeNode>,
    arguments: Vec<Arc<Expr>>,
) -> CallExpr {
    CallExpr {
        callee,
        type_arguments,
        arguments,
        span: node.span,
    }
}

/// `@expression`
pub fn create_decorator(expression: Expr) -> Decorator {
    Decorator::new(expression)
}

// =============================================================================
// Literals
// =============================================================================

/// `{ key: value, ... }`
pub fn object_literal(properties: Vec<(&str, Expr)>) -> Expr {
    Expr::ObjectLiteral {
        properties: properties
            .into_iter()
            .map(|(key, value)| ObjectProperty {
                key: key.to_string(),
                value: Arc::new(value),
            })
            .collect(),
    }
}

/// `[elements...]`
pub fn array_literal(elements: Vec<Expr>) -> Expr {
    Expr::ArrayLiteral {
        elements: elements.into_iter().map(Arc::new).collect(),
    }
}

/// `(params) => body`
pub fn arrow(params: &[&str], body: Expr) -> Expr {
    Expr::Arrow(ArrowFunction {
        params: params.iter().map(|p| p.to_string()).collect(),
        body: ArrowBody::Expr(Arc::new(body)),
    })
}

/// `(params) => { statements }`
pub fn arrow_block(params: &[&str], statements: Vec<Stmt>) -> Expr {
    Expr::Arrow(ArrowFunction {
        params: params.iter().map(|p| p.to_string()).collect(),
        body: ArrowBody::Block(statements),
    })
}

// =============================================================================
// Operators
// =============================================================================

/// `!operand`
pub fn not(operand: impl Into<Arc<Expr>>) -> Expr {
    Expr::Unary {
        op: UnaryOp::Not,
        operand: operand.into(),
    }
}

/// `typeof operand`
pub fn type_of(operand: impl Into<Arc<Expr>>) -> Expr {
    Expr::Unary {
        op: UnaryOp::TypeOf,
        operand: operand.into(),
    }
}

/// `left op right`
pub fn binary(op: BinaryOp, left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Expr {
    Expr::Binary {
        op,
        left: left.into(),
        right: right.into(),
    }
}

/// `left === right`
pub fn strict_equals(left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Expr {
    binary(BinaryOp::StrictEqual, left, right)
}

/// `left !== right`
pub fn strict_not_equals(left: impl Into<Arc<Expr>>, right: impl Into<Arc<Expr>>) -> Expr {
    binary(BinaryOp::StrictNotEqual, left, right)
}

/// `condition ? when_true : when_false`
pub fn conditional(
    condition: impl Into<Arc<Expr>>,
    when_true: impl Into<Arc<Expr>>,
    when_false: impl Into<Arc<Expr>>,
) -> Expr {
    Expr::Conditional {
        condition: condition.into(),
        when_true: when_true.into(),
        when_false: when_false.into(),
    }
}

/// Left-folded `a && b && c`. Nested `&&` chains are flattened, `true`
/// operands are dropped and no operands yields `true`.
pub fn and_all(operands: Vec<Expr>) -> Expr {
    let operands: Vec<Expr> = flatten(BinaryOp::And, operands)
        .into_iter()
        .filter(|operand| !operand.is_boolean_literal(true))
        .collect();
    if operands.iter().any(|operand| operand.is_boolean_literal(false)) {
        return boolean_literal(false);
    }
    fold(BinaryOp::And, operands).unwrap_or_else(|| boolean_literal(true))
}

/// Left-folded `a || b || c`. Nested `||` chains are flattened, `false`
/// operands are dropped, any `true` operand yields `true` and no operands
/// yields `false`.
pub fn or_any(operands: Vec<Expr>) -> Expr {
    let operands = flatten(BinaryOp::Or, operands);
    if operands.iter().any(|operand| operand.is_boolean_literal(true)) {
        return boolean_literal(true);
    }
    let operands: Vec<Expr> = operands
        .into_iter()
        .filter(|operand| !operand.is_boolean_literal(false))
        .collect();
    fold(BinaryOp::Or, operands).unwrap_or_else(|| boolean_literal(false))
}

/// String concatenation with nested concatenations flattened and adjacent
/// string literals merged. Every part must evaluate to a string.
pub fn concat(parts: Vec<Expr>) -> Expr {
    let mut merged: Vec<Expr> = Vec::with_capacity(parts.len());
    for part in flatten(BinaryOp::Plus, parts) {
        match (merged.last_mut(), &part) {
            (Some(Expr::StringLiteral { value: last }), Expr::StringLiteral { value }) => {
                last.push_str(value);
            }
            _ => merged.push(part),
        }
    }
    fold(BinaryOp::Plus, merged).unwrap_or_else(|| string_literal(""))
}

fn flatten(op: BinaryOp, operands: Vec<Expr>) -> Vec<Expr> {
    fn visit(op: BinaryOp, expr: Expr, out: &mut Vec<Expr>) {
        match expr {
            Expr::Binary {
                op: inner,
                left,
                right,
            } if inner == op => {
                visit(op, unwrap_or_clone(left), out);
                visit(op, unwrap_or_clone(right), out);
            }
            other => out.push(other),
        }
    }
    let mut out = Vec::with_capacity(operands.len());
    for operand in operands {
        visit(op, operand, &mut out);
    }
    out
}

fn unwrap_or_clone(expr: Arc<Expr>) -> Expr {
    Arc::try_unwrap(expr).unwrap_or_else(|shared| (*shared).clone())
}

fn fold(op: BinaryOp, operands: Vec<Expr>) -> Option<Expr> {
    let mut iter = operands.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |left, right| binary(op, left, right)))
}

// =============================================================================
// Statements
// =============================================================================

/// `const name = init;`
pub fn const_stmt(name: impl Into<String>, init: Expr) -> Stmt {
    Stmt::Const {
        name: name.into(),
        init: Arc::new(init),
    }
}

/// `if (condition) { then } else { otherwise }`
pub fn if_stmt(condition: Expr, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Stmt {
    Stmt::If {
        condition: Arc::new(condition),
        then,
        otherwise,
    }
}

/// `return value;`
pub fn return_stmt(value: Expr) -> Stmt {
    Stmt::Return {
        value: Arc::new(value),
    }
}

/// `throw value;`
pub fn throw_stmt(value: Expr) -> Stmt {
    Stmt::Throw {
        value: Arc::new(value),
    }
}

/// `expr;`
pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expression {
        expr: Arc::new(expr),
    }
}
