//! TypeScript source printer.
//!
//! Renders syntax nodes as TypeScript text. The printer inserts parentheses
//! from operator precedence alone, so the node tree never needs explicit
//! grouping nodes.

use super::expr::{ArrowBody, ArrowFunction, CallExpr, Decorator, Expr, Stmt};
use super::type_node::TypeNode;

// =============================================================================
// Style
// =============================================================================

/// Indentation style for printed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Use spaces for indentation (default: 2 spaces)
    #[default]
    Spaces2,

    /// Use 4 spaces for indentation
    Spaces4,

    /// Use tabs for indentation
    Tabs,
}

impl IndentStyle {
    /// Get the indentation string.
    pub fn as_str(&self) -> &str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Create an indentation string for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        self.as_str().repeat(depth)
    }
}

/// Line ending style for printed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,

    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    /// Get the line ending string.
    pub fn as_str(&self) -> &str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

// =============================================================================
// Precedence
// =============================================================================

const PREC_ARROW: u8 = 1;
const PREC_CONDITIONAL: u8 = 2;
const PREC_UNARY: u8 = 14;
const PREC_MEMBER: u8 = 17;
const PREC_PRIMARY: u8 = 20;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Arrow(_) => PREC_ARROW,
        Expr::Conditional { .. } => PREC_CONDITIONAL,
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } => PREC_UNARY,
        Expr::NumericLiteral { value } if *value < 0.0 => PREC_UNARY,
        Expr::PropertyAccess { .. } | Expr::ElementAccess { .. } | Expr::Call(_) => PREC_MEMBER,
        _ => PREC_PRIMARY,
    }
}

// =============================================================================
// Printer
// =============================================================================

/// Renders nodes to TypeScript source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    indent: IndentStyle,
    line_ending: LineEnding,
}

impl Printer {
    /// Create a printer with default style (2 spaces, LF).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Set the line ending style.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Print an expression at the top level.
    pub fn print_expr(&self, expr: &Expr) -> String {
        let mut out = String::new();
        self.write_expr(&mut out, expr, 0);
        out
    }

    /// Print a statement at the top level.
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        let mut out = String::new();
        self.write_stmt(&mut out, stmt, 0);
        out
    }

    /// Print a decorator, including the leading `@`.
    pub fn print_decorator(&self, decorator: &Decorator) -> String {
        let mut out = String::from("@");
        self.write_operand(&mut out, &decorator.expression, PREC_MEMBER, 0);
        out
    }

    /// Print a type node.
    pub fn print_type_node(&self, node: &TypeNode) -> String {
        node.to_string()
    }

    fn newline(&self, out: &mut String, depth: usize) {
        out.push_str(self.line_ending.as_str());
        out.push_str(&self.indent.indent(depth));
    }

    /// Write `expr`, parenthesized if it binds looser than `min`.
    fn write_operand(&self, out: &mut String, expr: &Expr, min: u8, depth: usize) {
        if precedence(expr) < min {
            out.push('(');
            self.write_expr(out, expr, depth);
            out.push(')');
        } else {
            self.write_expr(out, expr, depth);
        }
    }

    fn write_expr(&self, out: &mut String, expr: &Expr, depth: usize) {
        match expr {
            Expr::Identifier { name } => out.push_str(name),
            Expr::PropertyAccess { object, name } => {
                self.write_operand(out, object, PREC_MEMBER, depth);
                out.push('.');
                out.push_str(name);
            }
            Expr::ElementAccess { object, index } => {
                self.write_operand(out, object, PREC_MEMBER, depth);
                out.push('[');
                self.write_expr(out, index, depth);
                out.push(']');
            }
            Expr::Call(call) => self.write_call(out, call, depth),
            Expr::StringLiteral { value } => {
                out.push('"');
                out.push_str(&escape_string(value));
                out.push('"');
            }
            Expr::NumericLiteral { value } => out.push_str(&format_number(*value)),
            Expr::BooleanLiteral { value } => out.push_str(if *value { "true" } else { "false" }),
            Expr::Null => out.push_str("null"),
            Expr::ObjectLiteral { properties } => {
                if properties.is_empty() {
                    out.push_str("{}");
                    return;
                }
                let multiline = properties.iter().any(|p| contains_block(&p.value));
                out.push('{');
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if multiline {
                        self.newline(out, depth + 1);
                    } else {
                        out.push(' ');
                    }
                    out.push_str(&property_key(&property.key));
                    out.push_str(": ");
                    self.write_expr(out, &property.value, depth + 1);
                }
                if multiline {
                    self.newline(out, depth);
                } else {
                    out.push(' ');
                }
                out.push('}');
            }
            Expr::ArrayLiteral { elements } => {
                out.push('[');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_expr(out, element, depth);
                }
                out.push(']');
            }
            Expr::Arrow(arrow) => self.write_arrow(out, arrow, depth),
            Expr::Unary { op, operand } => {
                out.push_str(op.as_str());
                self.write_operand(out, operand, PREC_UNARY, depth);
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                self.write_operand(out, left, prec, depth);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                self.write_operand(out, right, prec + 1, depth);
            }
            Expr::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.write_operand(out, condition, PREC_CONDITIONAL + 1, depth);
                out.push_str(" ? ");
                self.write_operand(out, when_true, PREC_CONDITIONAL, depth);
                out.push_str(" : ");
                self.write_operand(out, when_false, PREC_CONDITIONAL, depth);
            }
        }
    }

    fn write_call(&self, out: &mut String, call: &CallExpr, depth: usize) {
        self.write_operand(out, &call.callee, PREC_MEMBER, depth);
        if !call.type_arguments.is_empty() {
            let arguments: Vec<String> = call.type_arguments.iter().map(ToString::to_string).collect();
            out.push('<');
            out.push_str(&arguments.join(", "));
            out.push('>');
        }
        out.push('(');
        for (i, argument) in call.arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_expr(out, argument, depth);
        }
        out.push(')');
    }

    fn write_arrow(&self, out: &mut String, arrow: &ArrowFunction, depth: usize) {
        out.push('(');
        out.push_str(&arrow.params.join(", "));
        out.push_str(") => ");
        match &arrow.body {
            ArrowBody::Expr(body) => {
                if matches!(body.as_ref(), Expr::ObjectLiteral { .. }) {
                    out.push('(');
                    self.write_expr(out, body, depth);
                    out.push(')');
                } else {
                    self.write_operand(out, body, PREC_CONDITIONAL, depth);
                }
            }
            ArrowBody::Block(statements) => self.write_block(out, statements, depth),
        }
    }

    fn write_block(&self, out: &mut String, statements: &[Stmt], depth: usize) {
        if statements.is_empty() {
            out.push_str("{}");
            return;
        }
        out.push('{');
        for stmt in statements {
            self.newline(out, depth + 1);
            self.write_stmt(out, stmt, depth + 1);
        }
        self.newline(out, depth);
        out.push('}');
    }

    fn write_stmt(&self, out: &mut String, stmt: &Stmt, depth: usize) {
        match stmt {
            Stmt::Const { name, init } => {
                out.push_str("const ");
                out.push_str(name);
                out.push_str(" = ");
                self.write_expr(out, init, depth);
                out.push(';');
            }
            Stmt::If {
                condition,
                then,
                otherwise,
            } => {
                out.push_str("if (");
                self.write_expr(out, condition, depth);
                out.push_str(") ");
                self.write_block(out, then, depth);
                if !otherwise.is_empty() {
                    out.push_str(" else ");
                    self.write_block(out, otherwise, depth);
                }
            }
            Stmt::Return { value } => {
                out.push_str("return ");
                self.write_expr(out, value, depth);
                out.push(';');
            }
            Stmt::Throw { value } => {
                out.push_str("throw ");
                self.write_expr(out, value, depth);
                out.push(';');
            }
            Stmt::Expression { expr } => {
                // a leading `{` would start a block
                if matches!(expr.as_ref(), Expr::ObjectLiteral { .. }) {
                    out.push('(');
                    self.write_expr(out, expr, depth);
                    out.push(')');
                } else {
                    self.write_expr(out, expr, depth);
                }
                out.push(';');
            }
        }
    }
}

/// Whether printing `expr` spans multiple lines.
fn contains_block(expr: &Expr) -> bool {
    match expr {
        Expr::Arrow(arrow) => match &arrow.body {
            ArrowBody::Block(statements) => !statements.is_empty(),
            ArrowBody::Expr(body) => contains_block(body),
        },
        Expr::ObjectLiteral { properties } => properties.iter().any(|p| contains_block(&p.value)),
        Expr::ArrayLiteral { elements } => elements.iter().any(|e| contains_block(e)),
        Expr::Call(call) => {
            contains_block(&call.callee) || call.arguments.iter().any(|a| contains_block(a))
        }
        Expr::PropertyAccess { object, .. } => contains_block(object),
        Expr::ElementAccess { object, index } => contains_block(object) || contains_block(index),
        Expr::Unary { operand, .. } => contains_block(operand),
        Expr::Binary { left, right, .. } => contains_block(left) || contains_block(right),
        Expr::Conditional {
            condition,
            when_true,
            when_false,
        } => contains_block(condition) || contains_block(when_true) || contains_block(when_false),
        _ => false,
    }
}

fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        format!("\"{}\"", escape_string(key))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Escape a string for a double-quoted literal.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Format a number the way a JavaScript literal is written.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Whether `name` can be written as a bare identifier or dotted member.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
