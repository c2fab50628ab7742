//! Structural check programmer.
//!
//! Produces a boolean expression that is `true` exactly when a value
//! matches the type. Types without a runtime check yield `true`.

use crate::ast::factory::{
    and_all, arrow, binary, boolean_literal, call, element_access, identifier, member,
    null, numeric_literal, or_any, property_access, strict_equals, strict_not_equals,
    string_literal, type_of, undefined,
};
use crate::ast::{BinaryOp, Expr};
use crate::checker::TypeResolver;
use crate::ir::{ObjectSchema, TypeIR, TypeKind};

use super::context::ProgrammerContext;
use super::functions::HelperKind;

/// Boolean expression checking `input` against `ty`.
pub fn check<R: TypeResolver + ?Sized>(
    ctx: &mut ProgrammerContext<'_, R>,
    ty: &TypeIR,
    input: Expr,
) -> Expr {
    match &ty.kind {
        TypeKind::String => type_is("string", input),
        TypeKind::Number => and_all(vec![
            type_is("number", input.clone()),
            call(
                property_access(identifier("Number"), "isFinite"),
                vec![input],
            ),
        ]),
        TypeKind::Boolean => type_is("boolean", input),
        TypeKind::BigInt => type_is("bigint", input),
        TypeKind::Function => type_is("function", input),
        TypeKind::Null => strict_equals(null(), input),
        TypeKind::Undefined | TypeKind::Void => strict_equals(undefined(), input),
        TypeKind::LiteralString(value) => strict_equals(string_literal(value.clone()), input),
        TypeKind::LiteralNumber(value) => strict_equals(numeric_literal(*value), input),
        TypeKind::LiteralBoolean(value) => strict_equals(boolean_literal(*value), input),
        TypeKind::Never => boolean_literal(false),
        TypeKind::Any
        | TypeKind::Unknown
        | TypeKind::Promise(_)
        | TypeKind::Internal(_) => boolean_literal(true),
        TypeKind::Date => binary(BinaryOp::InstanceOf, input, identifier("Date")),
        TypeKind::Array(element) => {
            let elem = ctx.binding("elem");
            let element = ctx.nested(|ctx| check(ctx, element, identifier(elem.as_str())));
            if element.is_boolean_literal(true) {
                is_array(input)
            } else {
                and_all(vec![
                    is_array(input.clone()),
                    call(
                        property_access(input, "every"),
                        vec![arrow(&[elem.as_str()], element)],
                    ),
                ])
            }
        }
        TypeKind::Tuple(elements) => {
            let mut conditions = vec![
                is_array(input.clone()),
                strict_equals(
                    numeric_literal(elements.len() as f64),
                    property_access(input.clone(), "length"),
                ),
            ];
            for (i, element) in elements.iter().enumerate() {
                let item = element_access(input.clone(), numeric_literal(i as f64));
                conditions.push(check(ctx, element, item));
            }
            and_all(conditions)
        }
        TypeKind::Object(schema) => {
            let mut conditions = is_object(input.clone());
            conditions.extend(properties(ctx, schema, &input));
            and_all(conditions)
        }
        TypeKind::Record(value) => {
            let binding = ctx.binding("value");
            let value = ctx.nested(|ctx| check(ctx, value, identifier(binding.as_str())));
            let mut conditions = is_object(input.clone());
            if !value.is_boolean_literal(true) {
                conditions.push(call(
                    property_access(
                        call(
                            property_access(identifier("Object"), "values"),
                            vec![input],
                        ),
                        "every",
                    ),
                    vec![arrow(&[binding.as_str()], value)],
                ));
            }
            and_all(conditions)
        }
        TypeKind::Reference(name) => ctx
            .call_helper(HelperKind::Is, name, vec![input])
            .unwrap_or_else(|| boolean_literal(true)),
        TypeKind::Union(members) => {
            let checks = members
                .iter()
                .map(|member| check(ctx, member, input.clone()))
                .collect();
            or_any(checks)
        }
        TypeKind::Intersection(members) => {
            let checks = members
                .iter()
                .map(|member| check(ctx, member, input.clone()))
                .collect();
            and_all(checks)
        }
    }
}

/// Property conditions of an object check.
fn properties<R: TypeResolver + ?Sized>(
    ctx: &mut ProgrammerContext<'_, R>,
    schema: &ObjectSchema,
    input: &Expr,
) -> Vec<Expr> {
    schema
        .properties
        .iter()
        .map(|property| {
            let value = member(input.clone(), &property.name);
            let condition = check(ctx, &property.ty, value.clone());
            if property.optional && !condition.is_boolean_literal(true) {
                or_any(vec![strict_equals(undefined(), value), condition])
            } else {
                condition
            }
        })
        .collect()
}

/// `"name" === typeof input`
pub(crate) fn type_is(name: &str, input: Expr) -> Expr {
    strict_equals(string_literal(name), type_of(input))
}

/// `Array.isArray(input)`
pub(crate) fn is_array(input: Expr) -> Expr {
    call(
        property_access(identifier("Array"), "isArray"),
        vec![input],
    )
}

/// `"object" === typeof input && null !== input`
pub(crate) fn is_object(input: Expr) -> Vec<Expr> {
    vec![
        type_is("object", input.clone()),
        strict_not_equals(null(), input),
    ]
}

