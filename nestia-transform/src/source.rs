//! Source file model.
//!
//! Only the parts of a file the transformer visits are modelled: classes,
//! their methods, and each method's decorators and resolved return type.
//! A [`CompilationUnit`] pairs a file with the checker answers recorded for
//! it and is the on-disk format the CLI consumes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ast::Decorator;
use crate::checker::TypeSnapshot;
use crate::error::{LoadError, LoadResult};
use crate::ir::TypeIR;

/// A source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path of the file
    pub file_name: PathBuf,
    /// Class declarations in source order
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
}

impl SourceFile {
    /// Create an empty source file.
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            classes: Vec::new(),
        }
    }

    /// Add a class.
    pub fn with_class(mut self, class: ClassDeclaration) -> Self {
        self.classes.push(class);
        self
    }

    /// Iterate every decorator in the file.
    pub fn decorators(&self) -> impl Iterator<Item = &Decorator> {
        self.classes
            .iter()
            .flat_map(|class| class.methods.iter())
            .flat_map(|method| method.decorators.iter())
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    /// Class name
    pub name: String,
    /// Methods in source order
    #[serde(default)]
    pub methods: Vec<MethodDeclaration>,
}

impl ClassDeclaration {
    /// Create a class without methods.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodDeclaration) -> Self {
        self.methods.push(method);
        self
    }
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    /// Method name
    pub name: String,

    /// Decorators in source order
    #[serde(default)]
    pub decorators: Vec<Decorator>,

    /// Return type as resolved by the checker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeIR>,
}

impl MethodDeclaration {
    /// Create a method without decorators or return type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decorators: Vec::new(),
            return_type: None,
        }
    }

    /// Add a decorator.
    pub fn with_decorator(mut self, decorator: Decorator) -> Self {
        self.decorators.push(decorator);
        self
    }

    /// Set the resolved return type.
    pub fn with_return_type(mut self, ty: impl Into<TypeIR>) -> Self {
        self.return_type = Some(ty.into());
        self
    }
}

/// A source file together with the checker answers recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// The syntax
    pub source: SourceFile,
    /// The recorded checker answers
    #[serde(default)]
    pub types: TypeSnapshot,
}

impl CompilationUnit {
    /// Pair a file with its snapshot.
    pub fn new(source: SourceFile, types: TypeSnapshot) -> Self {
        Self { source, types }
    }

    /// Parse a unit from JSON text. `origin` is only used in errors.
    pub fn from_json(text: &str, origin: &Path) -> LoadResult<Self> {
        let unit: CompilationUnit =
            serde_json::from_str(text).map_err(|source| LoadError::Json {
                file: origin.to_path_buf(),
                source,
            })?;
        unit.types.validate()?;
        Ok(unit)
    }

    /// Read and parse a unit from disk.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            file: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> String {
        // Every node serializes to plain JSON values.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::factory;
    use crate::ir::TypeKind;

    #[test]
    fn test_decorators_iterates_all_methods() {
        let file = SourceFile::new("/app/src/controllers/UserController.ts").with_class(
            ClassDeclaration::new("UserController")
                .with_method(
                    MethodDeclaration::new("index")
                        .with_decorator(Decorator::new(factory::identifier("A")))
                        .with_decorator(Decorator::new(factory::identifier("B"))),
                )
                .with_method(
                    MethodDeclaration::new("at")
                        .with_decorator(Decorator::new(factory::identifier("C"))),
                ),
        );
        assert_eq!(file.decorators().count(), 3);
    }

    #[test]
    fn test_from_json_reports_origin() {
        let err = CompilationUnit::from_json("{", Path::new("broken.nestia.json")).unwrap_err();
        assert!(err.to_string().contains("broken.nestia.json"));
    }

    #[test]
    fn test_json_round_trip() {
        let unit = CompilationUnit::new(
            SourceFile::new("a.ts").with_class(
                ClassDeclaration::new("A")
                    .with_method(MethodDeclaration::new("m").with_return_type(TypeKind::String)),
            ),
            TypeSnapshot::new(),
        );
        let back = CompilationUnit::from_json(&unit.to_json(), Path::new("a.json")).unwrap();
        assert_eq!(back, unit);
    }
}
