//! Transformers.
//!
//! - [`MethodDecoratorTransformer`] decides and applies the rewrite of a
//!   single decorator.
//! - [`MethodTransformer`] runs it over every decorator of a method.
//! - [`FileTransformer`] runs that over a whole file and reports outcomes.

pub mod file;
pub mod method;
pub mod method_decorator;

pub use file::{FileRewrite, FileTransformer, ReportEntry, TransformReport};
pub use method::{MethodRewrite, MethodTransformer};
pub use method_decorator::{MethodDecoratorTransformer, Outcome, Rewrite, SkipReason, Verdict};
