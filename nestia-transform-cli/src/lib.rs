//! # nestia-transform-cli
//!
//! CLI library for rewriting typed route decorators from type snapshots.
//!
//! A type snapshot (`*.nestia.json`) is what a compiler-side exporter writes
//! for one controller source file: the decorated methods and the type
//! checker's answers about them. This crate finds snapshots, runs the
//! [`nestia_transform`] rewrite over them and writes the results.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Snapshot discovery and filtering
//! - [`loader`] - Snapshot parsing
//! - [`runner`] - The transform pipeline and output rendering
//! - [`writer`] - File output and dry-run support
//! - [`watcher`] - File system watching for development mode
//! - [`logging`] - Diagnostic logging setup
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod runner;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager, OutputFormat};
pub use error::{CliError, CliResult};
pub use loader::{LoadedSnapshot, SnapshotLoader};
pub use runner::{RunOutput, TransformRunner, TransformedSnapshot};
pub use scanner::{SnapshotFile, SnapshotScanner};
pub use watcher::FileWatcher;
pub use writer::FileWriter;
