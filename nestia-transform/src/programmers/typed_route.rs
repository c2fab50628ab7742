//! Route artifact programmer.
//!
//! The artifact appended to a route decorator is an object literal naming
//! the stringify mode and carrying the closure for it:
//!
//! ```text
//! { type: "assert", assert: (input) => { ... } }
//! ```

use std::sync::Arc;

use crate::ast::factory::{
    array_literal, arrow_block, boolean_literal, call, conditional, const_stmt, expr_stmt,
    identifier, if_stmt, not, null, object_literal, property_access, return_stmt,
    string_literal, throw_stmt,
};
use crate::ast::{Expr, Stmt};
use crate::checker::TypeResolver;
use crate::ir::TypeIR;
use crate::options::StringifyMode;
use crate::project::TransformProject;

use super::context::ProgrammerContext;
use super::validate::REPORT;
use super::{is, stringify, validate};

/// Builds route artifacts.
pub struct TypedRouteProgrammer;

impl TypedRouteProgrammer {
    /// Bind the artifact generator to a project and a decorator factory.
    ///
    /// The returned function is pure: the same type always yields the same
    /// expression, and no node of the result is shared with its inputs
    /// except the factory reference inside runtime helper calls.
    pub fn generate<'a, R: TypeResolver + ?Sized>(
        project: &TransformProject<'a, R>,
        factory: &Arc<Expr>,
    ) -> impl Fn(&TypeIR) -> Expr + 'a {
        let resolver = project.resolver;
        let mode = project.options.stringify;
        let factory = Arc::clone(factory);
        move |ty: &TypeIR| {
            let mut ctx = ProgrammerContext::new(resolver, Arc::clone(&factory));
            let closure = Self::closure(&mut ctx, mode, ty);
            object_literal(vec![
                ("type", string_literal(mode.as_str())),
                (mode.as_str(), closure),
            ])
        }
    }

    fn closure<R: TypeResolver + ?Sized>(
        ctx: &mut ProgrammerContext<'_, R>,
        mode: StringifyMode,
        ty: &TypeIR,
    ) -> Expr {
        let input = identifier("input");
        let mut prologue: Vec<Stmt> = Vec::new();
        let mut body: Vec<Stmt> = Vec::new();

        match mode {
            StringifyMode::Stringify => {
                body.push(return_stmt(stringify::stringify(ctx, ty, input)));
            }
            StringifyMode::Is => {
                let check = is::check(ctx, ty, input.clone());
                let json = stringify::stringify(ctx, ty, input);
                body.push(return_stmt(if check.is_boolean_literal(true) {
                    json
                } else {
                    conditional(check, json, null())
                }));
            }
            StringifyMode::Assert => {
                let check = is::check(ctx, ty, input.clone());
                if !check.is_boolean_literal(true) {
                    let error = call(
                        ctx.runtime("guard"),
                        vec![object_literal(vec![
                            ("expected", string_literal(ctx.expected(ty))),
                            ("value", input.clone()),
                        ])],
                    );
                    body.push(if_stmt(not(check), vec![throw_stmt(error)], vec![]));
                }
                body.push(return_stmt(stringify::stringify(ctx, ty, input)));
            }
            StringifyMode::Validate => {
                prologue.push(const_stmt("errors", array_literal(vec![])));
                prologue.push(const_stmt(
                    REPORT,
                    arrow_block(
                        &["path", "expected", "value"],
                        vec![
                            expr_stmt(call(
                                property_access(identifier("errors"), "push"),
                                vec![object_literal(vec![
                                    ("path", identifier("path")),
                                    ("expected", identifier("expected")),
                                    ("value", identifier("value")),
                                ])],
                            )),
                            return_stmt(boolean_literal(false)),
                        ],
                    ),
                ));
                let expected = ctx.expected(ty);
                let success = validate::validate(
                    ctx,
                    ty,
                    input.clone(),
                    string_literal("$input"),
                    &expected,
                );
                let json = stringify::stringify(ctx, ty, input);
                body.push(const_stmt("success", success));
                body.push(return_stmt(object_literal(vec![
                    ("success", identifier("success")),
                    ("data", conditional(identifier("success"), json, null())),
                    ("errors", identifier("errors")),
                ])));
            }
        }

        let mut statements = prologue;
        statements.extend(ctx.drain_helpers());
        statements.extend(body);
        arrow_block(&["input"], statements)
    }
}
