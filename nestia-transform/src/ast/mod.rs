//! Syntax model.
//!
//! Immutable expression, statement and type nodes, the factory that builds
//! them, and the printer that renders them as TypeScript.

pub mod expr;
pub mod factory;
pub mod printer;
pub mod type_node;

pub use expr::{
    ArrowBody, ArrowFunction, BinaryOp, CallExpr, Decorator, Expr, ObjectProperty, Span, Stmt,
    UnaryOp,
};
pub use printer::{IndentStyle, LineEnding, Printer};
pub use type_node::{TypeMember, TypeNode};
