//! State shared by the programmers while one artifact is generated.

use std::sync::Arc;

use crate::ast::{factory, Expr, Stmt};
use crate::checker::TypeResolver;
use crate::ir::TypeIR;

use super::functions::{FunctionRegistry, HelperKind};

/// Generation state for one artifact.
pub struct ProgrammerContext<'a, R: ?Sized> {
    resolver: &'a R,
    factory: Arc<Expr>,
    functions: FunctionRegistry,
    depth: usize,
}

impl<'a, R: TypeResolver + ?Sized> ProgrammerContext<'a, R> {
    /// Start generating against `resolver`, calling runtime helpers on
    /// `factory`.
    pub fn new(resolver: &'a R, factory: Arc<Expr>) -> Self {
        Self {
            resolver,
            factory,
            functions: FunctionRegistry::new(),
            depth: 0,
        }
    }

    /// `F.name`, a runtime helper exposed by the decorator factory.
    pub fn runtime(&self, name: &str) -> Expr {
        factory::property_access(Arc::clone(&self.factory), name)
    }

    /// Parameter name for a closure at the current nesting depth: `elem`
    /// at the top, then `elem1`, `elem2`, ... so inner closures never
    /// shadow the bindings of outer ones.
    pub fn binding(&self, name: &str) -> String {
        match self.depth {
            0 => name.to_string(),
            depth => format!("{}{}", name, depth),
        }
    }

    /// Generate the body of a closure one level deeper.
    pub fn nested<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let out = body(self);
        self.depth -= 1;
        out
    }

    /// Call a helper for the named type, or `None` when the type has no
    /// definition.
    pub fn call_helper(&mut self, kind: HelperKind, type_name: &str, arguments: Vec<Expr>) -> Option<Expr> {
        self.resolver.definition(type_name)?;
        let name = self.functions.request(kind, type_name);
        Some(factory::call(factory::identifier(name), arguments))
    }

    /// Written form of `ty` for error messages.
    pub fn expected(&self, ty: &TypeIR) -> String {
        self.resolver
            .type_to_type_node(ty)
            .map(|node| node.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Generate the body of every requested helper, including helpers that
    /// other helper bodies request, as `const` statements.
    pub fn drain_helpers(&mut self) -> Vec<Stmt> {
        let mut generated: Vec<(HelperKind, usize, Stmt)> = Vec::new();
        while let Some(pending) = self.functions.next_pending() {
            let Some(definition) = self.resolver.definition(&pending.type_name).cloned() else {
                continue;
            };
            let input = factory::identifier("input");
            let function = match pending.kind {
                HelperKind::Is => factory::arrow(&["input"], super::is::check(self, &definition, input)),
                HelperKind::Stringify => factory::arrow(
                    &["input"],
                    super::stringify::stringify(self, &definition, input),
                ),
                HelperKind::Validate => factory::arrow(
                    &["input", "path"],
                    super::validate::validate(
                        self,
                        &definition,
                        input,
                        factory::identifier("path"),
                        &pending.type_name,
                    ),
                ),
            };
            generated.push((
                pending.kind,
                pending.index,
                factory::const_stmt(pending.kind.function_name(pending.index), function),
            ));
        }
        generated.sort_by_key(|(kind, index, _)| (*kind, *index));
        generated.into_iter().map(|(_, _, stmt)| stmt).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{SnapshotResolver, TypeSnapshot};

    #[test]
    fn test_bindings_are_unique_per_depth() {
        let snapshot = TypeSnapshot::new();
        let resolver = SnapshotResolver::new(&snapshot);
        let mut ctx = ProgrammerContext::new(&resolver, Arc::new(factory::identifier("F")));

        assert_eq!(ctx.binding("key"), "key");
        let (inner, innermost) = ctx.nested(|ctx| {
            let inner = ctx.binding("key");
            (inner, ctx.nested(|ctx| ctx.binding("key")))
        });
        assert_eq!(inner, "key1");
        assert_eq!(innermost, "key2");
        assert_eq!(ctx.binding("key"), "key");
    }
}
