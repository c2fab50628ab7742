//! File-level traversal and reporting.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::Printer;
use crate::checker::TypeResolver;
use crate::project::TransformProject;
use crate::source::{ClassDeclaration, SourceFile};

use super::method::MethodTransformer;
use super::method_decorator::{Outcome, SkipReason};

/// What happened to one decorator of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Owning class
    pub class: String,
    /// Owning method
    pub method: String,
    /// Printed decorator before the transform
    pub decorator: String,
    /// Outcome
    pub outcome: Outcome,
}

/// Per-decorator outcomes for a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformReport {
    /// File the report describes
    pub file_name: PathBuf,
    /// Entries in source order
    pub entries: Vec<ReportEntry>,
}

impl TransformReport {
    /// Number of decorators that received an artifact.
    pub fn augmented(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == Outcome::Augmented)
            .count()
    }

    /// Number of decorators left unchanged.
    pub fn skipped(&self) -> usize {
        self.entries.len() - self.augmented()
    }

    /// Entries skipped for `reason`.
    pub fn skipped_for(&self, reason: SkipReason) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.outcome == Outcome::Skipped(reason))
    }

    /// Whether the transform changed anything.
    pub fn is_changed(&self) -> bool {
        self.augmented() > 0
    }
}

/// A file after every method was visited.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRewrite {
    /// The resulting file
    pub file: SourceFile,
    /// What happened to each decorator
    pub report: TransformReport,
}

/// Runs the method transformer over a whole file.
pub struct FileTransformer;

impl FileTransformer {
    /// Rewrite every method of every class in `file`.
    pub fn transform<R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        file: &SourceFile,
    ) -> SourceFile {
        Self::rewrite(project, file).file
    }

    /// [`transform`](Self::transform), also building a report.
    #[tracing::instrument(skip_all, fields(file = %file.file_name.display()))]
    pub fn rewrite<R: TypeResolver + ?Sized>(
        project: &TransformProject<'_, R>,
        file: &SourceFile,
    ) -> FileRewrite {
        let printer = Printer::new();
        let mut report = TransformReport {
            file_name: file.file_name.clone(),
            entries: Vec::new(),
        };

        let classes = file
            .classes
            .iter()
            .map(|class| {
                let methods = class
                    .methods
                    .iter()
                    .map(|method| {
                        let rewrite = MethodTransformer::rewrite(project, method);
                        for (decorator, outcome) in method.decorators.iter().zip(&rewrite.outcomes)
                        {
                            report.entries.push(ReportEntry {
                                class: class.name.clone(),
                                method: method.name.clone(),
                                decorator: printer.print_decorator(decorator),
                                outcome: *outcome,
                            });
                        }
                        rewrite.method
                    })
                    .collect();
                ClassDeclaration {
                    name: class.name.clone(),
                    methods,
                }
            })
            .collect();

        debug!(
            augmented = report.augmented(),
            skipped = report.skipped(),
            "Transformed source file"
        );

        FileRewrite {
            file: SourceFile {
                file_name: file.file_name.clone(),
                classes,
            },
            report,
        }
    }
}
