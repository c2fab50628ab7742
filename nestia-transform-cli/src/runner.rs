//! Transform pipeline over loaded snapshots.
//!
//! Each snapshot is served through its own [`SnapshotResolver`] and
//! rewritten with [`FileTransformer`]. The result can be rendered as a new
//! snapshot or as the printed decorators.

use std::path::{Path, PathBuf};

use nestia_transform::transformers::TransformReport;
use nestia_transform::{
    AllowList, CompilationUnit, FileTransformer, Printer, SnapshotResolver, TransformOptions,
    TransformProject,
};
use tracing::info;

use crate::config::{Config, OutputFormat};
use crate::loader::LoadedSnapshot;
use crate::scanner::snapshot_stem;

/// One snapshot after the transform.
#[derive(Debug, Clone)]
pub struct TransformedSnapshot {
    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// The rewritten unit; its type snapshot is carried over unchanged.
    pub unit: CompilationUnit,

    /// What happened to each decorator.
    pub report: TransformReport,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    /// Transformed snapshots, in scan order.
    pub snapshots: Vec<TransformedSnapshot>,
}

/// Runs the transform with one configuration.
pub struct TransformRunner {
    options: TransformOptions,
    allow_list: AllowList,
}

impl TransformRunner {
    /// Create a runner for the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            options: config.transform.options(),
            allow_list: config.transform.allow_list(),
        }
    }

    /// Transform every loaded snapshot.
    pub fn run(&self, snapshots: &[LoadedSnapshot]) -> RunOutput {
        let snapshots = snapshots
            .iter()
            .map(|snapshot| self.run_one(snapshot))
            .collect();
        RunOutput { snapshots }
    }

    fn run_one(&self, snapshot: &LoadedSnapshot) -> TransformedSnapshot {
        let resolver = SnapshotResolver::new(&snapshot.unit.types);
        let project =
            TransformProject::new(&resolver, self.options).with_allow_list(&self.allow_list);
        let rewrite = FileTransformer::rewrite(&project, &snapshot.unit.source);

        info!(
            path = %snapshot.relative_path.display(),
            augmented = rewrite.report.augmented(),
            skipped = rewrite.report.skipped(),
            "Transformed snapshot"
        );

        TransformedSnapshot {
            relative_path: snapshot.relative_path.clone(),
            unit: CompilationUnit::new(rewrite.file, snapshot.unit.types.clone()),
            report: rewrite.report,
        }
    }
}

impl RunOutput {
    /// Total decorators augmented.
    pub fn augmented(&self) -> usize {
        self.snapshots.iter().map(|s| s.report.augmented()).sum()
    }

    /// Total decorators left unchanged.
    pub fn skipped(&self) -> usize {
        self.snapshots.iter().map(|s| s.report.skipped()).sum()
    }

    /// Snapshots the transform changed.
    pub fn changed(&self) -> impl Iterator<Item = &TransformedSnapshot> {
        self.snapshots.iter().filter(|s| s.report.is_changed())
    }
}

impl TransformedSnapshot {
    /// Where this snapshot is written under `dir`.
    pub fn output_path(&self, dir: &Path, format: OutputFormat) -> PathBuf {
        match format {
            OutputFormat::Json => dir.join(&self.relative_path),
            OutputFormat::Typescript => {
                let stem = snapshot_stem(&self.relative_path).unwrap_or("snapshot");
                let name = format!("{}.decorators.ts", stem);
                match self.relative_path.parent() {
                    Some(parent) => dir.join(parent).join(name),
                    None => dir.join(name),
                }
            }
        }
    }

    /// Output file content in `format`.
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let mut json = self.unit.to_json();
                json.push('\n');
                json
            }
            OutputFormat::Typescript => self.render_decorators(),
        }
    }

    /// Rewritten decorators, grouped by method.
    fn render_decorators(&self) -> String {
        let printer = Printer::new();
        let mut out = format!(
            "// Generated from {}\n",
            self.unit.source.file_name.display()
        );

        for class in &self.unit.source.classes {
            for method in class.methods.iter().filter(|m| !m.decorators.is_empty()) {
                out.push('\n');
                out.push_str(&format!("// {}.{}\n", class.name, method.name));
                for decorator in &method.decorators {
                    out.push_str(&printer.print_decorator(decorator));
                    out.push('\n');
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestia_transform::ast::factory;
    use nestia_transform::{
        ClassDeclaration, Declaration, Decorator, MethodDeclaration, SourceFile, TypeKind,
        TypeSnapshot,
    };

    fn loaded(relative: &str) -> LoadedSnapshot {
        let source = SourceFile::new("/app/src/controllers/UserController.ts").with_class(
            ClassDeclaration::new("UserController")
                .with_method(
                    MethodDeclaration::new("index")
                        .with_decorator(Decorator::new(factory::call(
                            factory::property_access(factory::identifier("TypedRoute"), "Get"),
                            vec![],
                        )))
                        .with_return_type(TypeKind::String),
                )
                .with_method(MethodDeclaration::new("helper")),
        );
        let types = TypeSnapshot::new().with_symbol(
            "TypedRoute",
            Declaration::new(
                "/app/node_modules/@nestia/core/lib/decorators/TypedRoute.d.ts",
                "TypedRoute",
            ),
        );
        LoadedSnapshot {
            path: PathBuf::from("/snapshots").join(relative),
            relative_path: PathBuf::from(relative),
            unit: CompilationUnit::new(source, types),
        }
    }

    #[test]
    fn test_run_counts() {
        let runner = TransformRunner::new(&Config::default());
        let output = runner.run(&[loaded("UserController.nestia.json")]);

        assert_eq!(output.augmented(), 1);
        assert_eq!(output.skipped(), 0);
        assert_eq!(output.changed().count(), 1);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let runner = TransformRunner::new(&Config::default());
        let first = runner.run(&[loaded("UserController.nestia.json")]);

        let again = LoadedSnapshot {
            unit: first.snapshots[0].unit.clone(),
            ..loaded("UserController.nestia.json")
        };
        let second = runner.run(&[again]);

        assert_eq!(second.changed().count(), 0);
        assert_eq!(second.snapshots[0].unit, first.snapshots[0].unit);
    }

    #[test]
    fn test_output_paths() {
        let runner = TransformRunner::new(&Config::default());
        let output = runner.run(&[loaded("admin/UserController.nestia.json")]);
        let snapshot = &output.snapshots[0];
        let dir = Path::new("/out");

        assert_eq!(
            snapshot.output_path(dir, OutputFormat::Json),
            PathBuf::from("/out/admin/UserController.nestia.json")
        );
        assert_eq!(
            snapshot.output_path(dir, OutputFormat::Typescript),
            PathBuf::from("/out/admin/UserController.decorators.ts")
        );
    }

    #[test]
    fn test_render_typescript() {
        let runner = TransformRunner::new(&Config::default());
        let output = runner.run(&[loaded("UserController.nestia.json")]);

        let rendered = output.snapshots[0].render(OutputFormat::Typescript);

        assert!(rendered.starts_with("// Generated from /app/src/controllers/UserController.ts\n"));
        assert!(rendered.contains("// UserController.index\n@TypedRoute.Get({\n  type: \"assert\","));
        assert!(!rendered.contains("helper"));
    }

    #[test]
    fn test_rendered_json_loads_back() {
        let runner = TransformRunner::new(&Config::default());
        let output = runner.run(&[loaded("UserController.nestia.json")]);

        let rendered = output.snapshots[0].render(OutputFormat::Json);
        let unit = CompilationUnit::from_json(&rendered, Path::new("out.json")).unwrap();

        assert_eq!(unit, output.snapshots[0].unit);
    }
}
