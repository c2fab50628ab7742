//! Method-level traversal.

use crate::ast::Decorator;
use crate::checker::TypeResolver;
use crate::ir::{TypeIR, TypeKind};
use crate::project::TransformProject;
use crate::source::MethodDeclaration;

use super::method_decorator::{MethodDecoratorTransformer, Outcome, SkipReason};

/// A method after its decorators were visited.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRewrite {
    /// The resulting method
    pub method: MethodDeclaration,
    /// One outcome per decorator, in decorator order
    pub outcomes: Vec<Outcome>,
}

/// Runs the decider over every decorator of a method.
pub struct MethodTransformer;

impl MethodTransformer {
    /// Rewrite the decorators of `method`.
    pub fn transform<R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        method: &MethodDeclaration,
    ) -> MethodDeclaration {
        Self::rewrite(project, method).method
    }

    /// [`transform`](Self::transform), also reporting per-decorator outcomes.
    pub fn rewrite<R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        method: &MethodDeclaration,
    ) -> MethodRewrite {
        if method.decorators.is_empty() {
            return MethodRewrite {
                method: method.clone(),
                outcomes: Vec::new(),
            };
        }

        let Some(ty) = method.return_type.as_ref().map(Self::response_type) else {
            return MethodRewrite {
                method: method.clone(),
                outcomes: vec![
                    Outcome::Skipped(SkipReason::MissingReturnType);
                    method.decorators.len()
                ],
            };
        };

        let (decorators, outcomes): (Vec<Decorator>, Vec<Outcome>) = method
            .decorators
            .iter()
            .map(|decorator| {
                let rewrite = MethodDecoratorTransformer::rewrite(project, ty, decorator);
                (rewrite.decorator, rewrite.outcome)
            })
            .unzip();

        MethodRewrite {
            method: MethodDeclaration {
                decorators,
                ..method.clone()
            },
            outcomes,
        }
    }

    /// The type a route actually responds with: `T` for `Promise<T>`.
    pub fn response_type(ty: &TypeIR) -> &TypeIR {
        match &ty.kind {
            TypeKind::Promise(inner) => inner,
            _ => ty,
        }
    }
}
