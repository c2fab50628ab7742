//! Decorator rewrite decider.
//!
//! Decides whether a route decorator gets a generated artifact appended to
//! its arguments, and applies the rewrite when it does. Every condition that
//! cannot be established passes the decorator through unchanged.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ast::{factory, CallExpr, Decorator, Expr, Printer, TypeNode};
use crate::checker::TypeResolver;
use crate::ir::TypeIR;
use crate::programmers::TypedRouteProgrammer;
use crate::project::TransformProject;

/// Why a decorator was left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The decorator is a plain reference, not a factory call
    NotACall,
    /// The checker resolved no signature for the call
    UnresolvedSignature,
    /// The signature has no declaration site
    MissingDeclaration,
    /// The declaration lives outside the allow-listed files
    OutsideAllowList,
    /// The call already carries two or more arguments
    AlreadyAugmented,
    /// The single argument is an object, i.e. an options bag or artifact
    ObjectArgument,
    /// The return type has no written form
    InexpressibleType,
    /// The method's return type was not resolved
    MissingReturnType,
}

impl SkipReason {
    /// Short human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::NotACall => "decorator is not a call",
            SkipReason::UnresolvedSignature => "signature could not be resolved",
            SkipReason::MissingDeclaration => "signature has no declaration",
            SkipReason::OutsideAllowList => "not a typed route decorator",
            SkipReason::AlreadyAugmented => "already has an artifact argument",
            SkipReason::ObjectArgument => "argument is an object",
            SkipReason::InexpressibleType => "return type cannot be written",
            SkipReason::MissingReturnType => "method has no resolved return type",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Result of inspecting a decorator.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<'d> {
    /// The decorator gets an artifact argument.
    Eligible {
        /// The call to rebuild
        call: &'d CallExpr,
        /// Written form of the method's return type
        type_node: TypeNode,
    },
    /// The decorator stays as it is.
    Skip(SkipReason),
}

impl Verdict<'_> {
    /// Whether the decorator would be rewritten.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible { .. })
    }
}

/// What happened to a decorator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    /// An artifact argument was appended
    Augmented,
    /// Returned unchanged
    Skipped(SkipReason),
}

/// A decorator after the decider ran, with the outcome that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    /// The resulting decorator
    pub decorator: Decorator,
    /// How it was produced
    pub outcome: Outcome,
}

/// Rewrites typed route decorators.
pub struct MethodDecoratorTransformer;

impl MethodDecoratorTransformer {
    /// Rewrite `decorator` for a method returning `ty`.
    ///
    /// Returns the decorator unchanged unless it is an allow-listed route
    /// factory call without an artifact argument and `ty` can be written.
    pub fn transform<R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        ty: &TypeIR,
        decorator: &Decorator,
    ) -> Decorator {
        Self::rewrite(project, ty, decorator).decorator
    }

    /// [`transform`](Self::transform), also reporting the outcome.
    pub fn rewrite<R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        ty: &TypeIR,
        decorator: &Decorator,
    ) -> Rewrite {
        match Self::inspect(project, ty, decorator) {
            Verdict::Skip(reason) => {
                trace!(%reason, "Leaving decorator unchanged");
                Rewrite {
                    decorator: decorator.clone(),
                    outcome: Outcome::Skipped(reason),
                }
            }
            Verdict::Eligible { call, type_node } => {
                debug!(
                    callee = %Printer::new().print_expr(&call.callee),
                    return_type = %type_node,
                    mode = %project.options.stringify,
                    "Appending route artifact"
                );
                Rewrite {
                    decorator: Self::apply(project, ty, call),
                    outcome: Outcome::Augmented,
                }
            }
        }
    }

    /// Decide whether `decorator` should be rewritten, without rewriting it.
    pub fn inspect<'d, R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        ty: &TypeIR,
        decorator: &'d Decorator,
    ) -> Verdict<'d> {
        let resolver = project.resolver;

        let Some(call) = decorator.expression.as_call() else {
            return Verdict::Skip(SkipReason::NotACall);
        };

        let Some(signature) = resolver.resolved_signature(call) else {
            return Verdict::Skip(SkipReason::UnresolvedSignature);
        };
        let Some(declaration) = signature.declaration else {
            return Verdict::Skip(SkipReason::MissingDeclaration);
        };

        if !project.allow_list.contains(&declaration.file_name) {
            return Verdict::Skip(SkipReason::OutsideAllowList);
        }

        match call.arguments.as_slice() {
            [] => {}
            [last] => {
                let argument = resolver.type_at_location(last);
                if resolver.type_flags(&argument).is_plain_object() {
                    return Verdict::Skip(SkipReason::ObjectArgument);
                }
            }
            _ => return Verdict::Skip(SkipReason::AlreadyAugmented),
        }

        match resolver.type_to_type_node(ty) {
            Some(type_node) => Verdict::Eligible { call, type_node },
            None => Verdict::Skip(SkipReason::InexpressibleType),
        }
    }

    /// Append the artifact for `ty` to `call`, keeping callee, type
    /// arguments and span.
    fn apply<R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        ty: &TypeIR,
        call: &CallExpr,
    ) -> Decorator {
        let artifact = TypedRouteProgrammer::generate(project, &call.callee)(ty);

        let mut arguments = call.arguments.clone();
        arguments.push(Arc::new(artifact));

        factory::create_decorator(Expr::Call(factory::update_call_expression(
            call,
            Arc::clone(&call.callee),
            call.type_arguments.clone(),
            arguments,
        )))
    }
}
