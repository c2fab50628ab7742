//! # nestia-transform
//!
//! Compile-time rewriting of typed route decorators.
//!
//! A controller method decorated with `@TypedRoute.Get()` (or one of the
//! other `TypedRoute`/`EncryptedRoute` factories) returns some type `T`.
//! This crate appends a generated artifact to the decorator call: a closure
//! that checks a response value against `T` and serializes it to JSON with a
//! plan specialized for `T`.
//!
//! ## Overview
//!
//! ```text
//! @TypedRoute.Get("users")
//!        │
//!        ▼  MethodDecoratorTransformer (decide)
//!        │
//!        ▼  TypedRouteProgrammer (generate)
//!        │
//!        ▼
//! @TypedRoute.Get("users", { type: "assert", assert: (input) => { ... } })
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nestia_transform::{
//!     AllowList, FileTransformer, SnapshotResolver, TransformOptions, TransformProject,
//!     CompilationUnit,
//! };
//!
//! let unit = CompilationUnit::load(path)?;
//! let resolver = SnapshotResolver::new(&unit.types);
//! let allow_list = AllowList::new(package_root);
//! let project = TransformProject::new(&resolver, TransformOptions::default())
//!     .with_allow_list(&allow_list);
//! let rewrite = FileTransformer::rewrite(&project, &unit.source);
//! println!("{} decorators augmented", rewrite.report.augmented());
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | Expression, statement and type nodes, factory, printer |
//! | [`ir`] | Resolved type descriptions |
//! | [`checker`] | [`TypeResolver`] and the snapshot-backed resolver |
//! | [`allow_list`] | Declaration files whose decorators qualify |
//! | [`transformers`] | Decorator, method and file transformers |
//! | [`programmers`] | Artifact generation |
//! | [`source`] | Source file model and compilation units |

pub mod allow_list;
pub mod ast;
pub mod checker;
pub mod error;
pub mod ir;
pub mod options;
pub mod programmers;
pub mod project;
pub mod source;
pub mod transformers;

// Re-export main types for convenience
pub use allow_list::{AllowList, MARKER_CLASSES};
pub use ast::{Decorator, Expr, Printer, TypeNode};
pub use checker::{Declaration, Signature, SnapshotResolver, TypeFlags, TypeResolver, TypeSnapshot};
pub use error::{LoadError, LoadResult};
pub use ir::{TypeIR, TypeKind, TypeTable};
pub use options::{StringifyMode, TransformOptions};
pub use programmers::TypedRouteProgrammer;
pub use project::TransformProject;
pub use source::{ClassDeclaration, CompilationUnit, MethodDeclaration, SourceFile};
pub use transformers::{
    FileTransformer, MethodDecoratorTransformer, MethodTransformer, Outcome, SkipReason,
    TransformReport, Verdict,
};
