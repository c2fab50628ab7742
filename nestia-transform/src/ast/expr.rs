//! Expression and statement nodes.
//!
//! Nodes are immutable once built. Children are held behind [`Arc`] so a
//! rewritten call can share its callee and original arguments with the
//! node it replaces while every generated subtree stays structurally new.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::type_node::TypeNode;

/// Source location of a node, as byte offsets into its file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a span from offsets.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    /// `name`
    Identifier { name: String },

    /// `object.name`
    PropertyAccess { object: Arc<Expr>, name: String },

    /// `object[index]`
    ElementAccess { object: Arc<Expr>, index: Arc<Expr> },

    /// `callee<T>(arguments...)`
    Call(CallExpr),

    /// `"value"`
    StringLiteral { value: String },

    /// `42`
    NumericLiteral { value: f64 },

    /// `true` / `false`
    BooleanLiteral { value: bool },

    /// `null`
    Null,

    /// `{ key: value, ... }`
    ObjectLiteral { properties: Vec<ObjectProperty> },

    /// `[a, b, c]`
    ArrayLiteral { elements: Vec<Arc<Expr>> },

    /// `(params) => body`
    Arrow(ArrowFunction),

    /// `!operand`, `typeof operand`
    Unary { op: UnaryOp, operand: Arc<Expr> },

    /// `left op right`
    Binary {
        op: BinaryOp,
        left: Arc<Expr>,
        right: Arc<Expr>,
    },

    /// `condition ? when_true : when_false`
    Conditional {
        condition: Arc<Expr>,
        when_true: Arc<Expr>,
        when_false: Arc<Expr>,
    },
}

impl Expr {
    /// Borrow the call expression, if this is one.
    pub fn as_call(&self) -> Option<&CallExpr> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Leftmost identifier of a callee chain: `TypedRoute` for
    /// `TypedRoute.Get`, `core` for `core.TypedRoute.Post`.
    pub fn root_identifier(&self) -> Option<&str> {
        match self {
            Expr::Identifier { name } => Some(name.as_str()),
            Expr::PropertyAccess { object, .. } | Expr::ElementAccess { object, .. } => {
                object.root_identifier()
            }
            Expr::Call(call) => call.callee.root_identifier(),
            _ => None,
        }
    }

    /// Whether this is the boolean literal `value`.
    pub fn is_boolean_literal(&self, value: bool) -> bool {
        matches!(self, Expr::BooleanLiteral { value: v } if *v == value)
    }
}

/// Call expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// The invoked expression
    pub callee: Arc<Expr>,

    /// Explicit type arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeNode>,

    /// Arguments in source order
    #[serde(default)]
    pub arguments: Vec<Arc<Expr>>,

    /// Call-site location
    #[serde(default)]
    pub span: Span,
}

/// A decorator attached to a class member: `@expression`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorator {
    /// The decorator expression (a call for decorator factories)
    pub expression: Expr,
}

impl Decorator {
    /// Create a decorator around an expression.
    pub fn new(expression: Expr) -> Self {
        Self { expression }
    }

    /// Number of call arguments, or `None` if the decorator is not a call.
    pub fn argument_count(&self) -> Option<usize> {
        self.expression.as_call().map(|call| call.arguments.len())
    }
}

/// Property of an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    /// Property key
    pub key: String,
    /// Property value
    pub value: Arc<Expr>,
}

/// Arrow function node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowFunction {
    /// Parameter names
    pub params: Vec<String>,
    /// Function body
    pub body: ArrowBody,
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "body", content = "value")]
pub enum ArrowBody {
    /// Concise body: `(x) => x + 1`
    Expr(Arc<Expr>),
    /// Block body: `(x) => { ... }`
    Block(Vec<Stmt>),
}

/// Statement node, only used inside generated arrow function bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Stmt {
    /// `const name = init;`
    Const { name: String, init: Arc<Expr> },

    /// `if (condition) { then } else { otherwise }`
    If {
        condition: Arc<Expr>,
        then: Vec<Stmt>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        otherwise: Vec<Stmt>,
    },

    /// `return value;`
    Return { value: Arc<Expr> },

    /// `throw value;`
    Throw { value: Arc<Expr> },

    /// `expr;`
    Expression { expr: Arc<Expr> },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `typeof`
    TypeOf,
}

impl UnaryOp {
    /// Source text of the operator, including any trailing space.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::TypeOf => "typeof ",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `+`
    Plus,
    /// `instanceof`
    InstanceOf,
}

impl BinaryOp {
    /// Source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::StrictEqual => "===",
            BinaryOp::StrictNotEqual => "!==",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Plus => "+",
            BinaryOp::InstanceOf => "instanceof",
        }
    }

    /// Operator precedence, higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 3,
            BinaryOp::And => 4,
            BinaryOp::StrictEqual | BinaryOp::StrictNotEqual => 8,
            BinaryOp::InstanceOf => 9,
            BinaryOp::Plus => 11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::factory;

    #[test]
    fn test_root_identifier() {
        let callee = factory::property_access(factory::identifier("TypedRoute"), "Get");
        assert_eq!(callee.root_identifier(), Some("TypedRoute"));

        let call = factory::call(callee, vec![]);
        assert_eq!(call.root_identifier(), Some("TypedRoute"));

        assert_eq!(factory::string_literal("x").root_identifier(), None);
    }

    #[test]
    fn test_decorator_argument_count() {
        let plain = Decorator::new(factory::identifier("Injectable"));
        assert_eq!(plain.argument_count(), None);

        let call = Decorator::new(factory::call(
            factory::identifier("Get"),
            vec![factory::string_literal("list")],
        ));
        assert_eq!(call.argument_count(), Some(1));
    }

    #[test]
    fn test_expr_serde_tagging() {
        let expr = factory::property_access(factory::identifier("TypedRoute"), "Get");
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "PropertyAccess",
                "object": { "kind": "Identifier", "name": "TypedRoute" },
                "name": "Get"
            })
        );
        let back: Expr = serde_json::from_value(json).unwrap();
        assert_eq!(back, expr);
    }
}
