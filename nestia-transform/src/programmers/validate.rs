//! Validation programmer.
//!
//! Like the structural check, but every mismatch is handed to a `$report`
//! helper with its path, and containers keep descending after a failure so
//! that all errors are collected.

use crate::ast::factory::{
    and_all, array_literal, arrow, boolean_literal, call, concat, element_access, identifier,
    member, numeric_literal, or_any, property_access, strict_equals, string_literal, undefined,
};
use crate::ast::printer::is_identifier;
use crate::ast::Expr;
use crate::checker::TypeResolver;
use crate::ir::{TypeIR, TypeKind};

use super::context::ProgrammerContext;
use super::functions::HelperKind;
use super::is;

/// Name of the error collector inside validate closures.
pub const REPORT: &str = "$report";

/// Boolean expression validating `input` at `path`, reporting mismatches
/// as `expected`.
pub fn validate<R: TypeResolver + ?Sized>(
    ctx: &mut ProgrammerContext<'_, R>,
    ty: &TypeIR,
    input: Expr,
    path: Expr,
    expected: &str,
) -> Expr {
    match &ty.kind {
        TypeKind::Reference(name) => ctx
            .call_helper(HelperKind::Validate, name, vec![input, path])
            .unwrap_or_else(|| boolean_literal(true)),
        TypeKind::Array(element) => {
            let head = or_any(vec![
                is::is_array(input.clone()),
                report(path.clone(), expected, input.clone()),
            ]);
            let element_expected = ctx.expected(element);
            let elem = ctx.binding("elem");
            let index = ctx.binding("index");
            let item = ctx.nested(|ctx| {
                validate(
                    ctx,
                    element,
                    identifier(elem.as_str()),
                    concat(vec![
                        path,
                        string_literal("["),
                        identifier(index.as_str()),
                        string_literal("]"),
                    ]),
                    &element_expected,
                )
            });
            if item.is_boolean_literal(true) {
                return head;
            }
            let items = call(
                property_access(input, "map"),
                vec![arrow(&[elem.as_str(), index.as_str()], item)],
            );
            and_all(vec![head, every_flag(items)])
        }
        TypeKind::Tuple(elements) => {
            let head = or_any(vec![
                and_all(vec![
                    is::is_array(input.clone()),
                    strict_equals(
                        numeric_literal(elements.len() as f64),
                        property_access(input.clone(), "length"),
                    ),
                ]),
                report(path.clone(), expected, input.clone()),
            ]);
            let mut items = Vec::new();
            for (i, element) in elements.iter().enumerate() {
                let element_expected = ctx.expected(element);
                let item = validate(
                    ctx,
                    element,
                    element_access(input.clone(), numeric_literal(i as f64)),
                    concat(vec![path.clone(), string_literal(format!("[{}]", i))]),
                    &element_expected,
                );
                if !item.is_boolean_literal(true) {
                    items.push(item);
                }
            }
            combine(head, items)
        }
        TypeKind::Object(schema) => {
            let head = or_any(vec![
                and_all(is::is_object(input.clone())),
                report(path.clone(), expected, input.clone()),
            ]);
            let mut items = Vec::new();
            for property in &schema.properties {
                let value = member(input.clone(), &property.name);
                let property_expected = ctx.expected(&property.ty);
                let item = validate(
                    ctx,
                    &property.ty,
                    value.clone(),
                    concat(vec![path.clone(), string_literal(accessor(&property.name))]),
                    &property_expected,
                );
                if item.is_boolean_literal(true) {
                    continue;
                }
                items.push(if property.optional {
                    or_any(vec![strict_equals(undefined(), value), item])
                } else {
                    item
                });
            }
            combine(head, items)
        }
        TypeKind::Record(value) => {
            let head = or_any(vec![
                and_all(is::is_object(input.clone())),
                report(path.clone(), expected, input.clone()),
            ]);
            let value_expected = ctx.expected(value);
            let key = ctx.binding("key");
            let item = ctx.nested(|ctx| {
                validate(
                    ctx,
                    value,
                    element_access(input.clone(), identifier(key.as_str())),
                    concat(vec![
                        path,
                        string_literal("["),
                        call(
                            property_access(identifier("JSON"), "stringify"),
                            vec![identifier(key.as_str())],
                        ),
                        string_literal("]"),
                    ]),
                    &value_expected,
                )
            });
            if item.is_boolean_literal(true) {
                return head;
            }
            let items = call(
                property_access(
                    call(
                        property_access(identifier("Object"), "keys"),
                        vec![input],
                    ),
                    "map",
                ),
                vec![arrow(&[key.as_str()], item)],
            );
            and_all(vec![head, every_flag(items)])
        }
        _ => {
            let condition = is::check(ctx, ty, input.clone());
            if condition.is_boolean_literal(true) {
                condition
            } else {
                or_any(vec![condition, report(path, expected, input)])
            }
        }
    }
}

/// `$report(path, "expected", value)`
fn report(path: Expr, expected: &str, value: Expr) -> Expr {
    call(
        identifier(REPORT),
        vec![path, string_literal(expected), value],
    )
}

/// `head && [items...].every((flag) => flag)`
fn combine(head: Expr, items: Vec<Expr>) -> Expr {
    if items.is_empty() {
        head
    } else {
        and_all(vec![head, every_flag(array_literal(items))])
    }
}

/// `flags.every((flag) => flag)`
fn every_flag(flags: Expr) -> Expr {
    call(
        property_access(flags, "every"),
        vec![arrow(&["flag"], identifier("flag"))],
    )
}

/// Path suffix for a property key: `.id` or `["x-key"]`.
fn accessor(key: &str) -> String {
    if is_identifier(key) {
        format!(".{}", key)
    } else {
        format!("[{}]", serde_json::Value::String(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor() {
        assert_eq!(accessor("id"), ".id");
        assert_eq!(accessor("x-key"), "[\"x-key\"]");
    }
}
