//! Declaration sites whose decorators get augmented.
//!
//! Two families of files qualify. Installed declaration files are matched by
//! substring, so any project layout that ends in the package's `lib/`
//! directory works. Source files of the decorators themselves are matched
//! exactly, relative to the package root.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Decorator classes whose factories accept a trailing artifact argument.
pub const MARKER_CLASSES: [&str; 2] = ["EncryptedRoute", "TypedRoute"];

const LIBRARY_DIR: &str = "node_modules/@nestia/core/lib/decorators";
const SOURCE_DIR: &str = "src/decorators";

static GLOBAL: OnceLock<AllowList> = OnceLock::new();

/// Immutable set of eligible declaration paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    root: String,
    library_paths: Vec<String>,
    source_paths: Vec<String>,
}

impl AllowList {
    /// Build the allow-list for a package rooted at `package_root`.
    ///
    /// A relative root is taken relative to the current directory.
    pub fn new(package_root: impl AsRef<Path>) -> Self {
        let root = absolute_root(package_root.as_ref());
        let library_paths = MARKER_CLASSES
            .iter()
            .map(|class| format!("{}/{}.d.ts", LIBRARY_DIR, class))
            .collect();
        let source_paths = MARKER_CLASSES
            .iter()
            .map(|class| normalize(&format!("{}/{}/{}.ts", root, SOURCE_DIR, class)))
            .collect();
        Self {
            root,
            library_paths,
            source_paths,
        }
    }

    /// Process-wide allow-list rooted at the current directory.
    pub fn global() -> &'static AllowList {
        GLOBAL.get_or_init(|| {
            let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
            AllowList::new(root)
        })
    }

    /// Library declaration suffixes, matched by substring.
    pub fn library_paths(&self) -> &[String] {
        &self.library_paths
    }

    /// Absolute source paths, matched exactly.
    pub fn source_paths(&self) -> &[String] {
        &self.source_paths
    }

    /// Absolute, lexically normalized form of `file` with `/` separators.
    pub fn resolve(&self, file: &Path) -> String {
        let file = to_slashes(file);
        if is_absolute(&file) {
            normalize(&file)
        } else {
            normalize(&format!("{}/{}", self.root, file))
        }
    }

    /// Whether a declaration in `file` is eligible.
    pub fn contains(&self, file: &Path) -> bool {
        let location = self.resolve(file);
        self.library_paths
            .iter()
            .any(|suffix| location.contains(suffix.as_str()))
            || self.source_paths.iter().any(|path| *path == location)
    }
}

/// Normalized, absolute form of a package root.
fn absolute_root(root: &Path) -> String {
    let slashed = to_slashes(root);
    if is_absolute(&slashed) {
        return normalize(&slashed);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&format!("{}/{}", to_slashes(&cwd), slashed)),
        Err(_) => normalize(&slashed),
    }
}

fn to_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Collapse `.`, `..` and repeated separators without touching the disk.
fn normalize(path: &str) -> String {
    let (prefix, rest) = if let Some(rest) = path.strip_prefix('/') {
        ("/".to_string(), rest)
    } else if is_absolute(path) {
        let (drive, rest) = path.split_at(2);
        (format!("{}/", drive), rest.trim_start_matches('/'))
    } else {
        (String::new(), path)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if prefix.is_empty() {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }
    format!("{}{}", prefix, segments.join("/"))
}
