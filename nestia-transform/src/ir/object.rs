//! Object shape IR definitions.

use serde::{Deserialize, Serialize};

use super::types::TypeIR;

/// Object schema definition.
///
/// Represents an interface or anonymous object type with named properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyIR>,
}

impl ObjectSchema {
    /// Create a new object schema with the given properties.
    pub fn new(properties: Vec<PropertyIR>) -> Self {
        Self { properties }
    }

    /// Whether any property may be absent from the serialized object.
    pub fn has_optional(&self) -> bool {
        self.properties.iter().any(PropertyIR::may_be_absent)
    }
}

/// Property intermediate representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyIR {
    /// Property key
    pub name: String,

    /// Property type
    pub ty: TypeIR,

    /// Declared with `?`
    #[serde(default)]
    pub optional: bool,

    /// JSDoc description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyIR {
    /// Create a required property.
    pub fn new(name: impl Into<String>, ty: impl Into<TypeIR>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: false,
            description: None,
        }
    }

    /// Create an optional (`?`) property.
    pub fn optional(name: impl Into<String>, ty: impl Into<TypeIR>) -> Self {
        Self {
            optional: true,
            ..Self::new(name, ty)
        }
    }

    /// Whether the property can be `undefined` and therefore skipped by JSON.
    pub fn may_be_absent(&self) -> bool {
        use super::types::TypeKind;

        if self.optional {
            return true;
        }
        match &self.ty.kind {
            TypeKind::Undefined | TypeKind::Void => true,
            TypeKind::Union(members) => members
                .iter()
                .any(|member| matches!(member.kind, TypeKind::Undefined | TypeKind::Void)),
            _ => false,
        }
    }
}
