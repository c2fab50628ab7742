//! Snapshot tests for generated route artifacts.
//!
//! These pin the printed TypeScript of the artifact appended to a route
//! decorator for each stringify mode.

use std::sync::Arc;

use nestia_transform::ast::factory;
use nestia_transform::ir::PropertyIR;
use nestia_transform::{
    AllowList, ClassDeclaration, CompilationUnit, Declaration, Decorator, FileTransformer,
    MethodDeclaration, Printer, SnapshotResolver, SourceFile, StringifyMode, TransformOptions,
    TransformProject, TypeIR, TypeKind, TypeSnapshot, TypedRouteProgrammer,
};

fn types() -> TypeSnapshot {
    TypeSnapshot::new()
        .with_symbol(
            "TypedRoute",
            Declaration::new(
                "/app/node_modules/@nestia/core/lib/decorators/TypedRoute.d.ts",
                "TypedRoute",
            ),
        )
        .with_definition(
            "ICategory",
            TypeKind::object(vec![
                PropertyIR::new("name", TypeKind::String),
                PropertyIR::new("children", TypeKind::array(TypeKind::reference("ICategory"))),
            ]),
        )
}

/// Print the artifact generated for `ty` on `TypedRoute.Get`.
fn artifact(mode: StringifyMode, ty: TypeKind) -> String {
    let snapshot = types();
    let resolver = SnapshotResolver::new(&snapshot);
    let allow_list = AllowList::new("/app");
    let project = TransformProject::new(&resolver, TransformOptions::default().with_stringify(mode))
        .with_allow_list(&allow_list);
    let callee = Arc::new(factory::property_access(
        factory::identifier("TypedRoute"),
        "Get",
    ));
    let expr = TypedRouteProgrammer::generate(&project, &callee)(&TypeIR::new(ty));
    Printer::new().print_expr(&expr)
}

// =============================================================================
// Stringify Mode
// =============================================================================

#[test]
fn test_stringify_object() {
    let printed = artifact(
        StringifyMode::Stringify,
        TypeKind::object(vec![
            PropertyIR::new("id", TypeKind::Number),
            PropertyIR::new("name", TypeKind::String),
        ]),
    );
    insta::assert_snapshot!(printed, @r###"
{
  type: "stringify",
  stringify: (input) => {
    return "{\"id\":" + TypedRoute.Get.number(input.id) + ",\"name\":" + TypedRoute.Get.string(input.name) + "}";
  }
}
"###);
}

#[test]
fn test_stringify_optional_property() {
    let printed = artifact(
        StringifyMode::Stringify,
        TypeKind::object(vec![
            PropertyIR::new("id", TypeKind::Number),
            PropertyIR::optional("nickname", TypeKind::String),
        ]),
    );
    insta::assert_snapshot!(printed, @r###"
{
  type: "stringify",
  stringify: (input) => {
    return "{" + ["\"id\":" + TypedRoute.Get.number(input.id), undefined === input.nickname ? undefined : "\"nickname\":" + TypedRoute.Get.string(input.nickname)].filter((str) => undefined !== str).join(",") + "}";
  }
}
"###);
}

#[test]
fn test_stringify_nested_record() {
    let printed = artifact(
        StringifyMode::Stringify,
        TypeKind::record(TypeKind::record(TypeKind::Number)),
    );
    insta::assert_snapshot!(printed, @r###"
{
  type: "stringify",
  stringify: (input) => {
    return "{" + Object.keys(input).map((key) => TypedRoute.Get.string(key) + ":{" + Object.keys(input[key]).map((key1) => TypedRoute.Get.string(key1) + ":" + TypedRoute.Get.number(input[key][key1])).join(",") + "}").join(",") + "}";
  }
}
"###);
}

#[test]
fn test_stringify_nested_array() {
    let printed = artifact(
        StringifyMode::Stringify,
        TypeKind::array(TypeKind::array(TypeKind::Number)),
    );
    insta::assert_snapshot!(printed, @r###"
{
  type: "stringify",
  stringify: (input) => {
    return "[" + input.map((elem) => "[" + elem.map((elem1) => TypedRoute.Get.number(elem1)).join(",") + "]").join(",") + "]";
  }
}
"###);
}

// =============================================================================
// Is Mode
// =============================================================================

#[test]
fn test_is_recursive_reference() {
    let printed = artifact(StringifyMode::Is, TypeKind::reference("ICategory"));
    insta::assert_snapshot!(printed, @r###"
{
  type: "is",
  is: (input) => {
    const $io0 = (input) => "object" === typeof input && null !== input && "string" === typeof input.name && Array.isArray(input.children) && input.children.every((elem) => $io0(elem));
    const $so0 = (input) => "{\"name\":" + TypedRoute.Get.string(input.name) + ",\"children\":[" + input.children.map((elem) => $so0(elem)).join(",") + "]}";
    return $io0(input) ? $so0(input) : null;
  }
}
"###);
}

#[test]
fn test_is_any_skips_check() {
    let printed = artifact(StringifyMode::Is, TypeKind::Any);
    insta::assert_snapshot!(printed, @r###"
{
  type: "is",
  is: (input) => {
    return JSON.stringify(input);
  }
}
"###);
}

// =============================================================================
// Validate Mode
// =============================================================================

#[test]
fn test_validate_object() {
    let printed = artifact(
        StringifyMode::Validate,
        TypeKind::object(vec![PropertyIR::new("id", TypeKind::Number)]),
    );
    insta::assert_snapshot!(printed, @r###"
{
  type: "validate",
  validate: (input) => {
    const errors = [];
    const $report = (path, expected, value) => {
      errors.push({ path: path, expected: expected, value: value });
      return false;
    };
    const success = ("object" === typeof input && null !== input || $report("$input", "{ id: number }", input)) && ["number" === typeof input.id && Number.isFinite(input.id) || $report("$input.id", "number", input.id)].every((flag) => flag);
    return { success: success, data: success ? "{\"id\":" + TypedRoute.Get.number(input.id) + "}" : null, errors: errors };
  }
}
"###);
}

#[test]
fn test_validate_nested_array_paths() {
    let printed = artifact(
        StringifyMode::Validate,
        TypeKind::array(TypeKind::array(TypeKind::Number)),
    );
    insta::assert_snapshot!(printed, @r###"
{
  type: "validate",
  validate: (input) => {
    const errors = [];
    const $report = (path, expected, value) => {
      errors.push({ path: path, expected: expected, value: value });
      return false;
    };
    const success = (Array.isArray(input) || $report("$input", "number[][]", input)) && input.map((elem, index) => (Array.isArray(elem) || $report("$input[" + index + "]", "number[]", elem)) && elem.map((elem1, index1) => "number" === typeof elem1 && Number.isFinite(elem1) || $report("$input[" + index + "][" + index1 + "]", "number", elem1)).every((flag) => flag)).every((flag) => flag);
    return { success: success, data: success ? "[" + input.map((elem) => "[" + elem.map((elem1) => TypedRoute.Get.number(elem1)).join(",") + "]").join(",") + "]" : null, errors: errors };
  }
}
"###);
}

// =============================================================================
// Decorator Rewrite
// =============================================================================

#[test]
fn test_assert_decorator_rewrite() {
    let source = SourceFile::new("/app/src/controllers/UserController.ts").with_class(
        ClassDeclaration::new("UserController").with_method(
            MethodDeclaration::new("index")
                .with_decorator(Decorator::new(factory::call(
                    factory::property_access(factory::identifier("TypedRoute"), "Get"),
                    vec![factory::string_literal("users")],
                )))
                .with_return_type(TypeKind::promise(TypeKind::String)),
        ),
    );
    let unit = CompilationUnit::new(source, types());
    let resolver = SnapshotResolver::new(&unit.types);
    let allow_list = AllowList::new("/app");
    let project =
        TransformProject::new(&resolver, TransformOptions::default()).with_allow_list(&allow_list);

    let rewrite = FileTransformer::rewrite(&project, &unit.source);

    assert_eq!(rewrite.report.augmented(), 1);
    let decorator = rewrite.file.decorators().next().unwrap();
    insta::assert_snapshot!(Printer::new().print_decorator(decorator), @r###"
@TypedRoute.Get("users", {
  type: "assert",
  assert: (input) => {
    if (!("string" === typeof input)) {
      throw TypedRoute.Get.guard({ expected: "string", value: input });
    }
    return TypedRoute.Get.string(input);
  }
})
"###);
}
