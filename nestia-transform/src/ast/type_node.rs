//! Syntactic type nodes.
//!
//! A [`TypeNode`] is the written form of a type, the way it would appear in
//! a type annotation. Converting a resolved [`TypeIR`] into a node can fail
//! when the type has no syntactic form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::{TypeIR, TypeKind};

use super::printer::{escape_string, format_number, is_identifier};

/// Written form of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeNode {
    /// `string`, `number`, `null`, `any`, ...
    Keyword { name: String },

    /// `"text"`, `42`, `true`
    Literal { text: String },

    /// `Name` or `Name<A, B>`
    Reference {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<TypeNode>,
    },

    /// `T[]`
    Array { element: Box<TypeNode> },

    /// `[A, B]`
    Tuple { elements: Vec<TypeNode> },

    /// `{ a: A; b?: B }`
    TypeLiteral { members: Vec<TypeMember> },

    /// `A | B`
    Union { types: Vec<TypeNode> },

    /// `A & B`
    Intersection { types: Vec<TypeNode> },
}

/// Member of a type literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMember {
    /// Member name
    pub name: String,
    /// Declared with `?`
    #[serde(default)]
    pub optional: bool,
    /// Member type
    pub ty: TypeNode,
}

impl TypeNode {
    /// Create a keyword node.
    pub fn keyword(name: impl Into<String>) -> Self {
        TypeNode::Keyword { name: name.into() }
    }

    /// Create a reference node without type arguments.
    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Render a resolved type as a type node.
    ///
    /// Returns `None` when the type, or any type nested in it, is a
    /// compiler-internal type.
    pub fn from_type(ty: &TypeIR) -> Option<TypeNode> {
        if ty.contains_internal() {
            return None;
        }
        Some(Self::from_type_unchecked(ty))
    }

    fn from_type_unchecked(ty: &TypeIR) -> TypeNode {
        if let Some(alias) = &ty.alias {
            return TypeNode::reference(alias.clone());
        }
        match &ty.kind {
            TypeKind::String => TypeNode::keyword("string"),
            TypeKind::Number => TypeNode::keyword("number"),
            TypeKind::Boolean => TypeNode::keyword("boolean"),
            TypeKind::BigInt => TypeNode::keyword("bigint"),
            TypeKind::Null => TypeNode::keyword("null"),
            TypeKind::Undefined => TypeNode::keyword("undefined"),
            TypeKind::Void => TypeNode::keyword("void"),
            TypeKind::Any => TypeNode::keyword("any"),
            TypeKind::Unknown => TypeNode::keyword("unknown"),
            TypeKind::Never => TypeNode::keyword("never"),
            TypeKind::LiteralString(s) => TypeNode::Literal {
                text: format!("\"{}\"", escape_string(s)),
            },
            TypeKind::LiteralNumber(n) => TypeNode::Literal {
                text: format_number(*n),
            },
            TypeKind::LiteralBoolean(b) => TypeNode::Literal {
                text: b.to_string(),
            },
            TypeKind::Date => TypeNode::reference("Date"),
            TypeKind::Function => TypeNode::reference("Function"),
            TypeKind::Array(inner) => TypeNode::Array {
                element: Box::new(Self::from_type_unchecked(inner)),
            },
            TypeKind::Tuple(elements) => TypeNode::Tuple {
                elements: elements.iter().map(Self::from_type_unchecked).collect(),
            },
            TypeKind::Object(schema) => TypeNode::TypeLiteral {
                members: schema
                    .properties
                    .iter()
                    .map(|property| TypeMember {
                        name: property.name.clone(),
                        optional: property.optional,
                        ty: Self::from_type_unchecked(&property.ty),
                    })
                    .collect(),
            },
            TypeKind::Record(value) => TypeNode::Reference {
                name: "Record".to_string(),
                arguments: vec![TypeNode::keyword("string"), Self::from_type_unchecked(value)],
            },
            TypeKind::Promise(inner) => TypeNode::Reference {
                name: "Promise".to_string(),
                arguments: vec![Self::from_type_unchecked(inner)],
            },
            TypeKind::Reference(name) => TypeNode::reference(name.clone()),
            TypeKind::Union(members) => TypeNode::Union {
                types: members.iter().map(Self::from_type_unchecked).collect(),
            },
            TypeKind::Intersection(members) => TypeNode::Intersection {
                types: members.iter().map(Self::from_type_unchecked).collect(),
            },
            // filtered out by `from_type`
            TypeKind::Internal(name) => TypeNode::reference(name.clone()),
        }
    }

    fn needs_parens_in_array(&self) -> bool {
        matches!(self, TypeNode::Union { .. } | TypeNode::Intersection { .. })
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Keyword { name } => write!(f, "{}", name),
            TypeNode::Literal { text } => write!(f, "{}", text),
            TypeNode::Reference { name, arguments } => {
                write!(f, "{}", name)?;
                if !arguments.is_empty() {
                    write!(f, "<{}>", join(arguments, ", "))?;
                }
                Ok(())
            }
            TypeNode::Array { element } => {
                if element.needs_parens_in_array() {
                    write!(f, "({})[]", element)
                } else {
                    write!(f, "{}[]", element)
                }
            }
            TypeNode::Tuple { elements } => write!(f, "[{}]", join(elements, ", ")),
            TypeNode::TypeLiteral { members } => {
                if members.is_empty() {
                    return write!(f, "{{}}");
                }
                let members: Vec<String> = members
                    .iter()
                    .map(|member| {
                        let key = if is_identifier(&member.name) {
                            member.name.clone()
                        } else {
                            format!("\"{}\"", escape_string(&member.name))
                        };
                        let optional = if member.optional { "?" } else { "" };
                        format!("{}{}: {}", key, optional, member.ty)
                    })
                    .collect();
                write!(f, "{{ {} }}", members.join("; "))
            }
            TypeNode::Union { types } => write!(f, "{}", join(types, " | ")),
            TypeNode::Intersection { types } => {
                let parts: Vec<String> = types
                    .iter()
                    .map(|ty| match ty {
                        TypeNode::Union { .. } => format!("({})", ty),
                        _ => ty.to_string(),
                    })
                    .collect();
                write!(f, "{}", parts.join(" & "))
            }
        }
    }
}

fn join(nodes: &[TypeNode], separator: &str) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PropertyIR;

    fn render(kind: TypeKind) -> String {
        TypeNode::from_type(&TypeIR::new(kind)).unwrap().to_string()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(render(TypeKind::String), "string");
        assert_eq!(render(TypeKind::Number), "number");
        assert_eq!(render(TypeKind::Null), "null");
    }

    #[test]
    fn test_literals() {
        assert_eq!(render(TypeKind::LiteralString("a\"b".into())), "\"a\\\"b\"");
        assert_eq!(render(TypeKind::LiteralNumber(4000.0)), "4000");
        assert_eq!(render(TypeKind::LiteralNumber(0.5)), "0.5");
        assert_eq!(render(TypeKind::LiteralBoolean(false)), "false");
    }

    #[test]
    fn test_array_of_union_is_parenthesized() {
        let kind = TypeKind::array(TypeKind::union([TypeKind::String, TypeKind::Null]));
        assert_eq!(render(kind), "(string | null)[]");
    }

    #[test]
    fn test_object_literal() {
        let kind = TypeKind::object(vec![
            PropertyIR::new("id", TypeKind::Number),
            PropertyIR::optional("x-key", TypeKind::String),
        ]);
        assert_eq!(render(kind), "{ id: number; \"x-key\"?: string }");
        assert_eq!(render(TypeKind::object(vec![])), "{}");
    }

    #[test]
    fn test_generic_references() {
        assert_eq!(render(TypeKind::promise(TypeKind::Void)), "Promise<void>");
        assert_eq!(
            render(TypeKind::record(TypeKind::Number)),
            "Record<string, number>"
        );
    }

    #[test]
    fn test_alias_wins() {
        let ty = TypeIR::new(TypeKind::String).with_alias("Uuid");
        assert_eq!(TypeNode::from_type(&ty).unwrap().to_string(), "Uuid");
    }

    #[test]
    fn test_internal_is_not_expressible() {
        let ty = TypeIR::new(TypeKind::array(TypeKind::Internal("__object".into())));
        assert!(TypeNode::from_type(&ty).is_none());
    }
}
