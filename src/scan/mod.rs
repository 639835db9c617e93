//! Directory scanning with default ignore rules.
//!
//! The scanner is a pure filesystem query: it returns the sorted list of
//! absolute file paths under a root, pruning version-control metadata,
//! dependency/build output, lockfiles, and minified artifacts. Only a missing
//! or non-directory root is fatal; unreadable entries during traversal are
//! skipped.

pub mod categorize;

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use walkdir::WalkDir;

/// Directories never descended into.
const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "bower_components",
    "dist",
    "build",
    "out",
    "target",
    "coverage",
    "__pycache__",
    ".venv",
    "venv",
    ".next",
    ".nuxt",
    ".cache",
    "vendor",
];

/// File patterns excluded by default.
const IGNORED_FILES: &[&str] = &[
    "*.min.js",
    "*.min.css",
    "*.map",
    "*.pyc",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "poetry.lock",
    "Pipfile.lock",
    ".DS_Store",
];

/// Errors that halt a scan. Everything else degrades to skipped entries.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("invalid ignore pattern: {0}")]
    Pattern(#[from] globset::Error),
}

/// Scan options.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Path segments to descend below the root; `<= 0` restricts the scan to
    /// the root's immediate children.
    pub max_depth: i32,
    /// Extra glob patterns excluded in addition to the defaults.
    pub ignore: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: 10,
            ignore: Vec::new(),
        }
    }
}

/// Enumerate files under `root`, sorted, with ignore rules applied.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>, ScanError> {
    let root = root
        .canonicalize()
        .map_err(|_| ScanError::NotFound(root.to_path_buf()))?;
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root));
    }

    let ignore = ignore_set(&options.ignore)?;
    let depth = if options.max_depth <= 0 {
        1
    } else {
        options.max_depth as usize
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(&root)
        .max_depth(depth)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .map(|name| !IGNORED_DIRS.contains(&name))
                .unwrap_or(true)
        });

    for entry in walker {
        // Unreadable entries are skipped, not fatal.
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        if ignore.is_match(relative) {
            continue;
        }
        files.push(entry.path().to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn ignore_set(extra: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in IGNORED_FILES
        .iter()
        .map(|p| (*p).to_string())
        .chain(extra.iter().cloned())
    {
        builder.add(Glob::new(&pattern)?);
        if !pattern.starts_with("**/") {
            builder.add(Glob::new(&format!("**/{pattern}"))?);
        }
    }
    Ok(builder.build()?)
}

/// Root-relative path with `/` separators, for stable cross-platform output.
pub fn relative_slash(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_scan_is_sorted_and_excludes_defaults() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("b.js"));
        touch(&temp.path().join("a.py"));
        touch(&temp.path().join("lib/util.js"));
        touch(&temp.path().join("node_modules/react/index.js"));
        touch(&temp.path().join(".git/config"));
        touch(&temp.path().join("bundle.min.js"));
        touch(&temp.path().join("package-lock.json"));
        touch(&temp.path().join("app.js.map"));

        let files = scan(temp.path(), &ScanOptions::default()).unwrap();
        let names: Vec<String> = {
            let root = temp.path().canonicalize().unwrap();
            files.iter().map(|f| relative_slash(&root, f)).collect()
        };

        assert_eq!(names, vec!["a.py", "b.js", "lib/util.js"]);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_scan_missing_root() {
        let err = scan(Path::new("/no/such/dir"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::NotFound(_)));
    }

    #[test]
    fn test_scan_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        touch(&file);
        let err = scan(&file, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn test_depth_bound() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("top.js"));
        touch(&temp.path().join("a/one.js"));
        touch(&temp.path().join("a/b/two.js"));

        let shallow = scan(
            temp.path(),
            &ScanOptions {
                max_depth: 0,
                ignore: Vec::new(),
            },
        )
        .unwrap();
        assert_eq!(shallow.len(), 1, "depth <= 0 keeps immediate children only");

        let one_level = scan(
            temp.path(),
            &ScanOptions {
                max_depth: 2,
                ignore: Vec::new(),
            },
        )
        .unwrap();
        assert_eq!(one_level.len(), 2);
    }

    #[test]
    fn test_extra_ignore_patterns() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("keep.js"));
        touch(&temp.path().join("skip.snap"));
        touch(&temp.path().join("fixtures/data.js"));

        let files = scan(
            temp.path(),
            &ScanOptions {
                max_depth: 10,
                ignore: vec!["*.snap".to_string(), "fixtures/**".to_string()],
            },
        )
        .unwrap();
        let root = temp.path().canonicalize().unwrap();
        let names: Vec<String> = files.iter().map(|f| relative_slash(&root, f)).collect();
        assert_eq!(names, vec!["keep.js"]);
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = scan(
            temp.path(),
            &ScanOptions {
                max_depth: 10,
                ignore: vec!["[".to_string()],
            },
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::Pattern(_)));
    }
}
