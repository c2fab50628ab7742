//! Type IR definitions.
//!
//! This module defines the type representation structures that form the core
//! of the intermediate representation. A [`TypeIR`] is what the checker
//! resolves for an expression or a method return type.

use serde::{Deserialize, Serialize};

use super::object::{ObjectSchema, PropertyIR};

/// Type intermediate representation.
///
/// Represents a resolved TypeScript type in a form the artifact programmers
/// can walk without consulting the compiler again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeIR {
    /// The kind of type
    pub kind: TypeKind,

    /// Alias name the checker reported for this type (`type Foo = ...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TypeIR {
    /// Create a new TypeIR with the given kind.
    pub fn new(kind: TypeKind) -> Self {
        Self { kind, alias: None }
    }

    /// Set the alias name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether this type, or anything nested inside it, has no syntactic form.
    pub fn contains_internal(&self) -> bool {
        match &self.kind {
            TypeKind::Internal(_) => true,
            TypeKind::Array(inner) | TypeKind::Promise(inner) | TypeKind::Record(inner) => {
                inner.contains_internal()
            }
            TypeKind::Tuple(elements)
            | TypeKind::Union(elements)
            | TypeKind::Intersection(elements) => elements.iter().any(TypeIR::contains_internal),
            TypeKind::Object(schema) => schema
                .properties
                .iter()
                .any(|property| property.ty.contains_internal()),
            _ => false,
        }
    }
}

impl From<TypeKind> for TypeIR {
    fn from(kind: TypeKind) -> Self {
        Self::new(kind)
    }
}

/// Type kind enumeration.
///
/// Covers the subset of the TypeScript type system that controller return
/// types are made of: primitives, literals, containers, object shapes,
/// named references and the set operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum TypeKind {
    // ==========================================================================
    // Primitives
    // ==========================================================================
    /// `string`
    String,

    /// `number`
    Number,

    /// `boolean`
    Boolean,

    /// `bigint`
    BigInt,

    /// `null`
    Null,

    /// `undefined`
    Undefined,

    /// `void`
    Void,

    /// `any`
    Any,

    /// `unknown`
    Unknown,

    /// `never`
    Never,

    // ==========================================================================
    // Literal Types
    // ==========================================================================
    /// Literal string value
    LiteralString(String),

    /// Literal number value
    LiteralNumber(f64),

    /// Literal boolean value
    LiteralBoolean(bool),

    // ==========================================================================
    // Object Types
    // ==========================================================================
    /// The built-in `Date` class, serialized through `toJSON()`
    Date,

    /// `Array<T>` / `T[]`
    Array(Box<TypeIR>),

    /// `[A, B, C]`
    Tuple(Vec<TypeIR>),

    /// Anonymous object or interface shape
    Object(ObjectSchema),

    /// `Record<string, T>` / string index signature
    Record(Box<TypeIR>),

    /// Any callable type
    Function,

    /// `Promise<T>`
    Promise(Box<TypeIR>),

    // ==========================================================================
    // Reference Types
    // ==========================================================================
    /// Reference to a named definition in the [`TypeTable`](super::TypeTable)
    Reference(String),

    // ==========================================================================
    // Composite Types
    // ==========================================================================
    /// Union of multiple types (T | U | V)
    Union(Vec<TypeIR>),

    /// Intersection of multiple types (T & U & V)
    Intersection(Vec<TypeIR>),

    /// Compiler-internal type without any syntactic form
    Internal(String),
}

impl TypeKind {
    /// Create an array type.
    pub fn array(element: impl Into<TypeIR>) -> Self {
        TypeKind::Array(Box::new(element.into()))
    }

    /// Create a promise type.
    pub fn promise(inner: impl Into<TypeIR>) -> Self {
        TypeKind::Promise(Box::new(inner.into()))
    }

    /// Create a record type with string keys.
    pub fn record(value: impl Into<TypeIR>) -> Self {
        TypeKind::Record(Box::new(value.into()))
    }

    /// Create a reference to a named definition.
    pub fn reference(name: impl Into<String>) -> Self {
        TypeKind::Reference(name.into())
    }

    /// Create an object type from its properties.
    pub fn object(properties: Vec<PropertyIR>) -> Self {
        TypeKind::Object(ObjectSchema::new(properties))
    }

    /// Create a union type.
    pub fn union(members: impl IntoIterator<Item = impl Into<TypeIR>>) -> Self {
        TypeKind::Union(members.into_iter().map(Into::into).collect())
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeKind::String | TypeKind::Number | TypeKind::Boolean | TypeKind::BigInt
        )
    }

    /// Check if this is a literal type.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TypeKind::LiteralString(_) | TypeKind::LiteralNumber(_) | TypeKind::LiteralBoolean(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ir_creation() {
        let ty = TypeIR::new(TypeKind::String);
        assert_eq!(ty.kind, TypeKind::String);
        assert!(ty.alias.is_none());
    }

    #[test]
    fn test_type_ir_with_alias() {
        let ty = TypeIR::new(TypeKind::String).with_alias("Uuid");
        assert_eq!(ty.alias.as_deref(), Some("Uuid"));
    }

    #[test]
    fn test_type_kind_primitives() {
        assert!(TypeKind::String.is_primitive());
        assert!(TypeKind::Number.is_primitive());
        assert!(TypeKind::Boolean.is_primitive());
        assert!(!TypeKind::Null.is_primitive());
        assert!(!TypeKind::LiteralString("a".into()).is_primitive());
    }

    #[test]
    fn test_type_kind_literals() {
        assert!(TypeKind::LiteralNumber(1.0).is_literal());
        assert!(TypeKind::LiteralBoolean(true).is_literal());
        assert!(!TypeKind::Number.is_literal());
    }

    #[test]
    fn test_contains_internal_nested() {
        let ty = TypeIR::new(TypeKind::array(TypeKind::union([
            TypeKind::String,
            TypeKind::Internal("__type".into()),
        ])));
        assert!(ty.contains_internal());
        assert!(!TypeIR::new(TypeKind::array(TypeKind::String)).contains_internal());
    }

    #[test]
    fn test_serde_shape() {
        let ty = TypeIR::new(TypeKind::array(TypeKind::Number));
        let json = serde_json::to_value(&ty).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": { "type": "Array", "value": { "kind": { "type": "Number" } } } })
        );
    }
}
