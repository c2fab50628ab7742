//! Snapshot discovery.
//!
//! Walks a directory for `*.nestia.json` type snapshots, respecting
//! `.gitignore` patterns and an optional glob filter.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::trace;

use crate::error::{CliError, CliResult, ScanError};

/// File name suffix of type snapshots.
pub const SNAPSHOT_SUFFIX: &str = ".nestia.json";

/// A discovered snapshot with its content.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    /// Path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering snapshot files.
#[derive(Debug)]
pub struct SnapshotScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,

    /// Directory whose contents are skipped.
    excluded: Option<PathBuf>,
}

impl SnapshotScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: true,
            filter: None,
            excluded: None,
        }
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Only include files whose path relative to the root matches `pattern`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Skip everything below `dir`, normally the output directory.
    pub fn excluding(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded = Some(dir.into());
        self
    }

    /// Scan the directory and return every snapshot, sorted by path.
    pub fn scan(&self) -> CliResult<Vec<SnapshotFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut files = Vec::new();
        let excluded = self
            .excluded
            .as_deref()
            .and_then(|dir| std::fs::canonicalize(dir).ok());

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || !is_snapshot(path) {
                continue;
            }

            if let Some(ref dir) = excluded {
                if std::fs::canonicalize(path).is_ok_and(|p| p.starts_with(dir)) {
                    trace!(path = %path.display(), "Excluded");
                    continue;
                }
            }

            let relative = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative) {
                    trace!(path = %relative.display(), "Filtered out");
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(SnapshotFile {
                path: path.to_path_buf(),
                relative_path: relative,
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_snapshots(self.root.clone()).into());
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Scan without failing on empty results.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<SnapshotFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(CliError::Scan(ScanError::NoSnapshots { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether `path` names a type snapshot.
pub fn is_snapshot(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > SNAPSHOT_SUFFIX.len() && name.ends_with(SNAPSHOT_SUFFIX))
}

/// Snapshot name without its suffix: `UserController` for
/// `UserController.nestia.json`.
pub fn snapshot_stem(path: &Path) -> Option<&str> {
    path.file_name()?
        .to_str()?
        .strip_suffix(SNAPSHOT_SUFFIX)
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("UserController.nestia.json"), "{}").unwrap();
        fs::write(dir.path().join("ArticleController.nestia.json"), "{}").unwrap();

        fs::create_dir(dir.path().join("admin")).unwrap();
        fs::write(dir.path().join("admin/AuditController.nestia.json"), "{}").unwrap();

        // Not snapshots
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(dir.path().join(".nestia.json"), "{}").unwrap();
        fs::write(dir.path().join("README.md"), "# Test").unwrap();

        dir
    }

    #[test]
    fn test_scan_finds_all_snapshots() {
        let dir = create_test_dir();
        let scanner = SnapshotScanner::new(dir.path());

        let files = scanner.scan().unwrap();

        let paths: Vec<_> = files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            paths,
            vec![
                "ArticleController.nestia.json",
                "UserController.nestia.json",
                "admin/AuditController.nestia.json",
            ]
        );
    }

    #[test]
    fn test_scan_with_filter() {
        let dir = create_test_dir();
        let scanner = SnapshotScanner::new(dir.path())
            .with_filter("admin/*")
            .unwrap();

        let files = scanner.scan().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0]
            .relative_path
            .to_string_lossy()
            .contains("AuditController"));
    }

    #[test]
    fn test_invalid_filter() {
        let result = SnapshotScanner::new(".").with_filter("[");
        assert!(matches!(result, Err(ScanError::InvalidPattern { .. })));
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let scanner = SnapshotScanner::new("/nonexistent/path");

        let result = scanner.scan();

        assert!(matches!(
            result,
            Err(CliError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        let scanner = SnapshotScanner::new(dir.path());

        assert!(matches!(
            scanner.scan(),
            Err(CliError::Scan(ScanError::NoSnapshots { .. }))
        ));
        assert!(scanner.scan_allow_empty().unwrap().is_empty());
    }

    #[test]
    fn test_scan_excluding_output_dir() {
        let dir = create_test_dir();
        let scanner = SnapshotScanner::new(dir.path()).excluding(dir.path().join("admin"));

        let files = scanner.scan().unwrap();

        assert_eq!(files.len(), 2);
        assert!(files
            .iter()
            .all(|f| !f.relative_path.starts_with("admin")));
    }

    #[test]
    fn test_missing_excluded_dir_is_ignored() {
        let dir = create_test_dir();
        let scanner = SnapshotScanner::new(dir.path()).excluding(dir.path().join("transformed"));
        assert_eq!(scanner.scan().unwrap().len(), 3);
    }

    #[test]
    fn test_snapshot_stem() {
        assert_eq!(
            snapshot_stem(Path::new("a/UserController.nestia.json")),
            Some("UserController")
        );
        assert_eq!(snapshot_stem(Path::new(".nestia.json")), None);
        assert_eq!(snapshot_stem(Path::new("package.json")), None);
    }
}
