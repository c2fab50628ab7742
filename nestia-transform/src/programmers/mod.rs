//! Artifact programmers.
//!
//! Turn a resolved [`TypeIR`](crate::ir::TypeIR) into the runtime closure a
//! route decorator receives. [`TypedRouteProgrammer`] assembles the
//! artifact; the remaining modules each program one concern.

pub mod context;
pub mod functions;
pub mod is;
pub mod stringify;
pub mod typed_route;
pub mod validate;

pub use context::ProgrammerContext;
pub use functions::{FunctionRegistry, HelperKind};
pub use typed_route::TypedRouteProgrammer;
