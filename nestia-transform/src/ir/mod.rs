//! Intermediate Representation (IR) module.
//!
//! This module defines the resolved type descriptions handed to the
//! transformer by the type-resolution context. The IR mirrors the shapes a
//! TypeScript checker reports for a method's return type and is consumed
//! by the artifact programmers to produce validator/serializer closures.

pub mod object;
pub mod table;
pub mod types;

pub use object::{ObjectSchema, PropertyIR};
pub use table::{collect_references, TypeTable};
pub use types::{TypeIR, TypeKind};
