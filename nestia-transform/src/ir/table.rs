//! Named type definitions.
//!
//! Interfaces and aliases the checker resolved are stored once by name and
//! referenced through [`TypeKind::Reference`]. This is the only way the IR
//! expresses recursive types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{TypeIR, TypeKind};

/// Table of named type definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
    definitions: BTreeMap<String, TypeIR>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, ty: impl Into<TypeIR>) {
        self.definitions.insert(name.into(), ty.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, ty: impl Into<TypeIR>) -> Self {
        self.insert(name, ty);
        self
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&TypeIR> {
        self.definitions.get(name)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table has no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeIR)> {
        self.definitions.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Names referenced anywhere in the table that have no definition.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut missing = Vec::new();
        for (_, ty) in self.iter() {
            collect_references(ty, &mut |name| {
                if self.get(name).is_none() && !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
            });
        }
        missing
    }
}

/// Visit every reference name inside a type.
pub fn collect_references(ty: &TypeIR, visit: &mut impl FnMut(&str)) {
    match &ty.kind {
        TypeKind::Reference(name) => visit(name),
        TypeKind::Array(inner) | TypeKind::Promise(inner) | TypeKind::Record(inner) => {
            collect_references(inner, visit)
        }
        TypeKind::Tuple(elements) | TypeKind::Union(elements) | TypeKind::Intersection(elements) => {
            for element in elements {
                collect_references(element, visit);
            }
        }
        TypeKind::Object(schema) => {
            for property in &schema.properties {
                collect_references(&property.ty, visit);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PropertyIR;

    #[test]
    fn test_insert_and_get() {
        let table = TypeTable::new().with("IMember", TypeKind::object(vec![]));
        assert_eq!(table.len(), 1);
        assert!(table.get("IMember").is_some());
        assert!(table.get("ISeller").is_none());
    }

    #[test]
    fn test_dangling_references() {
        let table = TypeTable::new().with(
            "IArticle",
            TypeKind::object(vec![
                PropertyIR::new("writer", TypeKind::reference("IMember")),
                PropertyIR::new("parent", TypeKind::reference("IArticle")),
            ]),
        );
        assert_eq!(table.dangling_references(), vec!["IMember".to_string()]);
    }

    #[test]
    fn test_transparent_serde() {
        let table = TypeTable::new().with("Id", TypeKind::String);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({ "Id": { "kind": { "type": "String" } } }));
    }
}
