//! Recorded type-checker answers.
//!
//! A [`TypeSnapshot`] is what a compiler-side exporter writes next to a
//! source file: where each decorator factory symbol is declared, the types
//! of argument expressions it saw, and the named type definitions. The
//! [`SnapshotResolver`] answers [`TypeResolver`] queries from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Declaration, Signature, TypeFlags, TypeResolver};
use crate::ast::{BinaryOp, CallExpr, Expr, Printer, UnaryOp};
use crate::error::{LoadError, LoadResult};
use crate::ir::{collect_references, PropertyIR, TypeIR, TypeKind, TypeTable};

/// Checker answers recorded for one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeSnapshot {
    /// Root identifier of a callee → declaration of the symbol it names.
    /// `null` records a signature that resolved without a declaration.
    #[serde(default)]
    pub symbols: BTreeMap<String, Option<Declaration>>,

    /// Printed expression text → its type
    #[serde(default)]
    pub values: BTreeMap<String, TypeIR>,

    /// Named type definitions
    #[serde(default)]
    pub definitions: TypeTable,
}

impl TypeSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the declaration of a symbol.
    pub fn with_symbol(mut self, name: impl Into<String>, declaration: Declaration) -> Self {
        self.symbols.insert(name.into(), Some(declaration));
        self
    }

    /// Record the type of an expression by its printed text.
    pub fn with_value(mut self, text: impl Into<String>, ty: impl Into<TypeIR>) -> Self {
        self.values.insert(text.into(), ty.into());
        self
    }

    /// Add a named definition.
    pub fn with_definition(mut self, name: impl Into<String>, ty: impl Into<TypeIR>) -> Self {
        self.definitions.insert(name, ty);
        self
    }

    /// Check that every reference has a definition.
    pub fn validate(&self) -> LoadResult<()> {
        if let Some(name) = self.definitions.dangling_references().into_iter().next() {
            let referenced_by = self
                .definitions
                .iter()
                .find(|(_, ty)| references(ty, &name))
                .map(|(owner, _)| owner.to_string())
                .unwrap_or_default();
            return Err(LoadError::UnknownReference {
                referenced_by,
                name,
            });
        }
        for (text, ty) in &self.values {
            let mut missing = None;
            collect_references(ty, &mut |name| {
                if missing.is_none() && self.definitions.get(name).is_none() {
                    missing = Some(name.to_string());
                }
            });
            if let Some(name) = missing {
                return Err(LoadError::UnknownReference {
                    referenced_by: text.clone(),
                    name,
                });
            }
        }
        Ok(())
    }
}

fn references(ty: &TypeIR, target: &str) -> bool {
    let mut found = false;
    collect_references(ty, &mut |name| found |= name == target);
    found
}

/// [`TypeResolver`] backed by a [`TypeSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct SnapshotResolver<'a> {
    snapshot: &'a TypeSnapshot,
    printer: Printer,
}

impl<'a> SnapshotResolver<'a> {
    /// Create a resolver over a snapshot.
    pub fn new(snapshot: &'a TypeSnapshot) -> Self {
        Self {
            snapshot,
            printer: Printer::new(),
        }
    }

    /// Type an expression from its syntax alone.
    fn structural_type(&self, expr: &Expr) -> TypeIR {
        let kind = match expr {
            Expr::StringLiteral { value } => TypeKind::LiteralString(value.clone()),
            Expr::NumericLiteral { value } => TypeKind::LiteralNumber(*value),
            Expr::BooleanLiteral { value } => TypeKind::LiteralBoolean(*value),
            Expr::Null => TypeKind::Null,
            Expr::Identifier { name } if name == "undefined" => TypeKind::Undefined,
            Expr::ObjectLiteral { properties } => TypeKind::object(
                properties
                    .iter()
                    .map(|p| PropertyIR::new(p.key.clone(), self.type_at_location(&p.value)))
                    .collect(),
            ),
            Expr::ArrayLiteral { elements } => match elements.first() {
                Some(first) => TypeKind::array(self.type_at_location(first)),
                None => TypeKind::array(TypeKind::Any),
            },
            Expr::Arrow(_) => TypeKind::Function,
            Expr::Unary { op, .. } => match op {
                UnaryOp::Not => TypeKind::Boolean,
                UnaryOp::TypeOf => TypeKind::String,
            },
            Expr::Binary { op, left, right } => match op {
                BinaryOp::Plus => {
                    let is_string = |e: &Expr| {
                        matches!(
                            self.type_at_location(e).kind,
                            TypeKind::String | TypeKind::LiteralString(_)
                        )
                    };
                    if is_string(left) || is_string(right) {
                        TypeKind::String
                    } else {
                        TypeKind::Number
                    }
                }
                BinaryOp::And | BinaryOp::Or => TypeKind::Any,
                _ => TypeKind::Boolean,
            },
            _ => TypeKind::Any,
        };
        TypeIR::new(kind)
    }
}

impl TypeResolver for SnapshotResolver<'_> {
    fn resolved_signature(&self, call: &CallExpr) -> Option<Signature> {
        let root = call.callee.root_identifier()?;
        let declaration = self.snapshot.symbols.get(root)?;
        Some(Signature {
            declaration: declaration.clone(),
        })
    }

    fn type_at_location(&self, expr: &Expr) -> TypeIR {
        let text = self.printer.print_expr(expr);
        match self.snapshot.values.get(&text) {
            Some(ty) => ty.clone(),
            None => self.structural_type(expr),
        }
    }

    fn type_flags(&self, ty: &TypeIR) -> TypeFlags {
        TypeFlags::classify(ty, &self.snapshot.definitions)
    }

    fn definition(&self, name: &str) -> Option<&TypeIR> {
        self.snapshot.definitions.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::factory;

    fn snapshot() -> TypeSnapshot {
        TypeSnapshot::new()
            .with_symbol(
                "TypedRoute",
                Declaration::new(
                    "/app/node_modules/@nestia/core/lib/decorators/TypedRoute.d.ts",
                    "TypedRoute",
                ),
            )
            .with_value("OPTIONS", TypeKind::object(vec![]))
            .with_definition("IUser", TypeKind::object(vec![]))
    }

    #[test]
    fn test_signature_from_root_identifier() {
        let snapshot = snapshot();
        let resolver = SnapshotResolver::new(&snapshot);
        let callee = factory::property_access(factory::identifier("TypedRoute"), "Get");
        let call = factory::create_call_expression(callee, vec![], vec![]);
        let signature = resolver.resolved_signature(&call).unwrap();
        assert_eq!(signature.declaration.unwrap().symbol, "TypedRoute");

        let other = factory::create_call_expression(factory::identifier("Get"), vec![], vec![]);
        assert!(resolver.resolved_signature(&other).is_none());
    }

    #[test]
    fn test_signature_without_declaration() {
        let mut snapshot = TypeSnapshot::new();
        snapshot.symbols.insert("Route".into(), None);
        let resolver = SnapshotResolver::new(&snapshot);
        let call = factory::create_call_expression(factory::identifier("Route"), vec![], vec![]);
        assert_eq!(resolver.resolved_signature(&call), Some(Signature::default()));
    }

    #[test]
    fn test_recorded_value_wins() {
        let snapshot = snapshot();
        let resolver = SnapshotResolver::new(&snapshot);
        let ty = resolver.type_at_location(&factory::identifier("OPTIONS"));
        assert!(resolver.type_flags(&ty).is_plain_object());
    }

    #[test]
    fn test_structural_literals() {
        let snapshot = TypeSnapshot::new();
        let resolver = SnapshotResolver::new(&snapshot);

        let ty = resolver.type_at_location(&factory::string_literal("users"));
        assert_eq!(ty.kind, TypeKind::LiteralString("users".into()));
        assert!(!resolver.type_flags(&ty).object);

        let object = factory::object_literal(vec![("type", factory::string_literal("assert"))]);
        assert!(resolver
            .type_flags(&resolver.type_at_location(&object))
            .is_plain_object());

        let array = factory::array_literal(vec![factory::string_literal("a")]);
        let flags = resolver.type_flags(&resolver.type_at_location(&array));
        assert!(flags.array && !flags.is_plain_object());

        let unknown = resolver.type_at_location(&factory::identifier("path"));
        assert_eq!(unknown.kind, TypeKind::Any);
    }

    #[test]
    fn test_validate_reports_unknown_reference() {
        let snapshot = TypeSnapshot::new().with_definition(
            "IArticle",
            TypeKind::object(vec![PropertyIR::new("writer", TypeKind::reference("IMember"))]),
        );
        match snapshot.validate() {
            Err(LoadError::UnknownReference {
                referenced_by,
                name,
            }) => {
                assert_eq!(referenced_by, "IArticle");
                assert_eq!(name, "IMember");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(self::snapshot().validate().is_ok());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = r#"{
            "symbols": {
                "TypedRoute": { "file_name": "/app/src/decorators/TypedRoute.ts" },
                "Route": null
            },
            "values": { "\"users\"": { "kind": { "type": "String" } } }
        }"#;
        let snapshot: TypeSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.symbols.len(), 2);
        assert!(snapshot.symbols["Route"].is_none());
        assert!(snapshot.definitions.is_empty());
    }
}
