//! JSON serialization programmer.
//!
//! Produces a string expression holding the JSON text of a value that is
//! already known to match the type. Object shapes are written out key by
//! key; types without a plan fall back to `JSON.stringify`.

use crate::ast::factory::{
    array_literal, arrow, call, concat, conditional, element_access, identifier, member,
    numeric_literal, object_literal, property_access, strict_equals, strict_not_equals,
    string_literal, undefined,
};
use crate::ast::printer::format_number;
use crate::ast::Expr;
use crate::checker::TypeResolver;
use crate::ir::{ObjectSchema, TypeIR, TypeKind};

use super::context::ProgrammerContext;
use super::functions::HelperKind;
use super::is;

/// String expression serializing `input` as `ty`.
pub fn stringify<R: TypeResolver + ?Sized>(
    ctx: &mut ProgrammerContext<'_, R>,
    ty: &TypeIR,
    input: Expr,
) -> Expr {
    match &ty.kind {
        TypeKind::String => call(ctx.runtime("string"), vec![input]),
        TypeKind::Number => call(ctx.runtime("number"), vec![input]),
        TypeKind::Boolean => call(identifier("String"), vec![input]),
        TypeKind::Null => string_literal("null"),
        TypeKind::LiteralString(value) => string_literal(json_string(value)),
        TypeKind::LiteralNumber(value) if value.is_finite() => {
            string_literal(format_number(*value))
        }
        TypeKind::LiteralNumber(_) => string_literal("null"),
        TypeKind::LiteralBoolean(value) => string_literal(value.to_string()),
        TypeKind::Date => call(
            ctx.runtime("string"),
            vec![call(property_access(input, "toJSON"), vec![])],
        ),
        TypeKind::Array(element) => {
            let elem = ctx.binding("elem");
            let element = ctx.nested(|ctx| stringify(ctx, element, identifier(elem.as_str())));
            let items = call(
                property_access(input, "map"),
                vec![arrow(&[elem.as_str()], element)],
            );
            concat(vec![
                string_literal("["),
                call(property_access(items, "join"), vec![string_literal(",")]),
                string_literal("]"),
            ])
        }
        TypeKind::Tuple(elements) => {
            let mut parts = vec![string_literal("[")];
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    parts.push(string_literal(","));
                }
                let item = element_access(input.clone(), numeric_literal(i as f64));
                parts.push(stringify(ctx, element, item));
            }
            parts.push(string_literal("]"));
            concat(parts)
        }
        TypeKind::Object(schema) => object(ctx, schema, input),
        TypeKind::Record(value) => {
            let key = ctx.binding("key");
            let value = ctx.nested(|ctx| {
                stringify(
                    ctx,
                    value,
                    element_access(input.clone(), identifier(key.as_str())),
                )
            });
            let entry = concat(vec![
                call(ctx.runtime("string"), vec![identifier(key.as_str())]),
                string_literal(":"),
                value,
            ]);
            let entries = call(
                property_access(
                    call(
                        property_access(identifier("Object"), "keys"),
                        vec![input],
                    ),
                    "map",
                ),
                vec![arrow(&[key.as_str()], entry)],
            );
            concat(vec![
                string_literal("{"),
                call(property_access(entries, "join"), vec![string_literal(",")]),
                string_literal("}"),
            ])
        }
        TypeKind::Reference(name) => {
            match ctx.call_helper(HelperKind::Stringify, name, vec![input.clone()]) {
                Some(helper) => helper,
                None => json_stringify(input),
            }
        }
        TypeKind::Union(members) => union(ctx, ty, members, input),
        TypeKind::BigInt
        | TypeKind::Undefined
        | TypeKind::Void
        | TypeKind::Any
        | TypeKind::Unknown
        | TypeKind::Never
        | TypeKind::Function
        | TypeKind::Promise(_)
        | TypeKind::Intersection(_)
        | TypeKind::Internal(_) => json_stringify(input),
    }
}

/// `{"a":...,"b":...}`, skipping properties that may be absent when they are.
fn object<R: TypeResolver + ?Sized>(
    ctx: &mut ProgrammerContext<'_, R>,
    schema: &ObjectSchema,
    input: Expr,
) -> Expr {
    if !schema.has_optional() {
        let mut parts = vec![string_literal("{")];
        for (i, property) in schema.properties.iter().enumerate() {
            let prefix = if i == 0 { "" } else { "," };
            parts.push(string_literal(format!("{}{}:", prefix, json_string(&property.name))));
            parts.push(stringify(ctx, &property.ty, member(input.clone(), &property.name)));
        }
        parts.push(string_literal("}"));
        return concat(parts);
    }

    let entries = schema
        .properties
        .iter()
        .map(|property| {
            let value = member(input.clone(), &property.name);
            let entry = concat(vec![
                string_literal(format!("{}:", json_string(&property.name))),
                stringify(ctx, &defined(&property.ty), value.clone()),
            ]);
            if property.may_be_absent() {
                conditional(strict_equals(undefined(), value), undefined(), entry)
            } else {
                entry
            }
        })
        .collect();
    let present = call(
        property_access(array_literal(entries), "filter"),
        vec![arrow(
            &["str"],
            strict_not_equals(undefined(), identifier("str")),
        )],
    );
    concat(vec![
        string_literal("{"),
        call(property_access(present, "join"), vec![string_literal(",")]),
        string_literal("}"),
    ])
}

/// First matching member wins; no match throws.
fn union<R: TypeResolver + ?Sized>(
    ctx: &mut ProgrammerContext<'_, R>,
    ty: &TypeIR,
    members: &[TypeIR],
    input: Expr,
) -> Expr {
    let branches: Vec<(Expr, Expr)> = members
        .iter()
        .map(|member_ty| {
            (
                is::check(ctx, member_ty, input.clone()),
                stringify(ctx, member_ty, input.clone()),
            )
        })
        .collect();

    let expected = ctx.expected(ty);
    let mut result = call(
        ctx.runtime("throws"),
        vec![object_literal(vec![
            ("expected", string_literal(expected)),
            ("value", input.clone()),
        ])],
    );
    for (condition, value) in branches.into_iter().rev() {
        result = if condition.is_boolean_literal(true) {
            value
        } else {
            conditional(condition, value, result)
        };
    }
    result
}

/// `ty` without its `undefined` members.
fn defined(ty: &TypeIR) -> TypeIR {
    match &ty.kind {
        TypeKind::Union(members) => {
            let kept: Vec<TypeIR> = members
                .iter()
                .filter(|m| !matches!(m.kind, TypeKind::Undefined | TypeKind::Void))
                .cloned()
                .collect();
            match kept.len() {
                0 => TypeIR::new(TypeKind::Undefined),
                1 => kept.into_iter().next().unwrap_or_else(|| ty.clone()),
                _ => TypeIR::new(TypeKind::Union(kept)),
            }
        }
        _ => ty.clone(),
    }
}

/// `JSON.stringify(input)`
fn json_stringify(input: Expr) -> Expr {
    call(
        property_access(identifier("JSON"), "stringify"),
        vec![input],
    )
}

/// JSON text of a string, quotes included.
fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_string() {
        assert_eq!(json_string("id"), "\"id\"");
        assert_eq!(json_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_defined_strips_undefined() {
        let ty = TypeIR::new(TypeKind::union([TypeKind::String, TypeKind::Undefined]));
        assert_eq!(defined(&ty).kind, TypeKind::String);

        let many = TypeIR::new(TypeKind::union([
            TypeKind::String,
            TypeKind::Null,
            TypeKind::Undefined,
        ]));
        assert_eq!(
            defined(&many).kind,
            TypeKind::union([TypeKind::String, TypeKind::Null])
        );
    }
}
