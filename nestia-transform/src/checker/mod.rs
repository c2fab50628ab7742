//! Type resolution context.
//!
//! The transformer never type-checks anything itself. Everything it needs to
//! know about declarations and types is asked through [`TypeResolver`], so a
//! live compiler bridge, a recorded [`TypeSnapshot`] or a test double can all
//! drive the same decision procedure.

pub mod snapshot;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ast::{CallExpr, Expr, TypeNode};
use crate::ir::{TypeIR, TypeKind, TypeTable};

pub use snapshot::{SnapshotResolver, TypeSnapshot};

/// Queries the transformer issues against the type checker.
pub trait TypeResolver {
    /// Resolve the signature a call expression invokes.
    fn resolved_signature(&self, call: &CallExpr) -> Option<Signature>;

    /// Type of an expression at its location.
    fn type_at_location(&self, expr: &Expr) -> TypeIR;

    /// Written form of a type, or `None` when it has none.
    fn type_to_type_node(&self, ty: &TypeIR) -> Option<TypeNode> {
        TypeNode::from_type(ty)
    }

    /// Flag set of a type.
    fn type_flags(&self, ty: &TypeIR) -> TypeFlags;

    /// Named definition behind a [`TypeKind::Reference`].
    fn definition(&self, name: &str) -> Option<&TypeIR> {
        let _ = name;
        None
    }
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    fn resolved_signature(&self, call: &CallExpr) -> Option<Signature> {
        (**self).resolved_signature(call)
    }

    fn type_at_location(&self, expr: &Expr) -> TypeIR {
        (**self).type_at_location(expr)
    }

    fn type_to_type_node(&self, ty: &TypeIR) -> Option<TypeNode> {
        (**self).type_to_type_node(ty)
    }

    fn type_flags(&self, ty: &TypeIR) -> TypeFlags {
        (**self).type_flags(ty)
    }

    fn definition(&self, name: &str) -> Option<&TypeIR> {
        (**self).definition(name)
    }
}

/// A resolved call signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Where the invoked function is declared, when known
    pub declaration: Option<Declaration>,
}

impl Signature {
    /// Signature declared at `declaration`.
    pub fn declared_at(declaration: Declaration) -> Self {
        Self {
            declaration: Some(declaration),
        }
    }
}

/// Declaration site of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// File that contains the declaration
    pub file_name: PathBuf,
    /// Declared symbol name
    #[serde(default)]
    pub symbol: String,
}

impl Declaration {
    /// Create a declaration.
    pub fn new(file_name: impl Into<PathBuf>, symbol: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Subset of the checker's type flags the decider inspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeFlags {
    /// Object type (including arrays, tuples and functions)
    pub object: bool,
    /// Tuple type
    pub tuple: bool,
    /// `Array<T>`
    pub array: bool,
    /// Array or anything indexable like one
    pub array_like: bool,
}

impl TypeFlags {
    /// Compute flags for `ty`, looking references up in `definitions`.
    pub fn classify(ty: &TypeIR, definitions: &TypeTable) -> Self {
        Self::classify_at(ty, definitions, 0)
    }

    fn classify_at(ty: &TypeIR, definitions: &TypeTable, depth: usize) -> Self {
        match &ty.kind {
            TypeKind::Array(_) => Self {
                object: true,
                array: true,
                array_like: true,
                ..Self::default()
            },
            TypeKind::Tuple(_) => Self {
                object: true,
                tuple: true,
                array_like: true,
                ..Self::default()
            },
            TypeKind::Object(_)
            | TypeKind::Record(_)
            | TypeKind::Function
            | TypeKind::Date
            | TypeKind::Promise(_) => Self {
                object: true,
                ..Self::default()
            },
            TypeKind::Reference(name) if depth < MAX_REFERENCE_DEPTH => definitions
                .get(name)
                .map(|target| Self::classify_at(target, definitions, depth + 1))
                .unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// An object that is neither a tuple nor array(-like).
    pub fn is_plain_object(&self) -> bool {
        self.object && !self.tuple && !self.array && !self.array_like
    }
}

/// Alias chains longer than this are treated as unresolved.
const MAX_REFERENCE_DEPTH: usize = 32;
