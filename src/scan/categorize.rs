//! File categorization by extension, basename, and path segments.
//!
//! Pure classification, no filesystem access. Precedence is significant and
//! first match wins: test markers beat everything else, so a `.json` fixture
//! under `tests/` is still classified as a test file.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

const CODE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "pyw", "rb", "go", "rs", "java", "kt", "c",
    "cc", "cpp", "h", "hpp", "cs", "php", "swift", "scala", "vue", "svelte",
];

const CONFIG_FILENAMES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "jsconfig.json",
    ".babelrc",
    ".eslintrc",
    ".prettierrc",
    ".editorconfig",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "requirements.txt",
    "cargo.toml",
    "makefile",
    "dockerfile",
    "docker-compose.yml",
    ".gitignore",
    ".env",
];

const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml", "ini", "cfg", "conf"];

const DOC_EXTENSIONS: &[&str] = &["md", "mdx", "rst", "txt", "adoc"];

const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "bmp", "woff", "woff2", "ttf", "otf",
    "eot", "mp3", "mp4", "wav", "avi", "mov", "pdf", "zip", "tar", "gz",
];

const TEST_DIR_SEGMENTS: &[&str] = &["test", "tests", "__tests__", "__test__", "spec", "specs"];

/// File category, in classification precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Tests,
    Code,
    Config,
    Docs,
    Assets,
    Other,
}

/// Paths grouped by category, preserving input order within each group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorizedFiles {
    pub code: Vec<String>,
    pub config: Vec<String>,
    pub docs: Vec<String>,
    pub tests: Vec<String>,
    pub assets: Vec<String>,
    pub other: Vec<String>,
}

/// Classify one root-relative path.
pub fn categorize_path(path: &Path) -> FileCategory {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if is_test_path(path, &name) {
        return FileCategory::Tests;
    }
    if CODE_EXTENSIONS.contains(&extension.as_str()) {
        return FileCategory::Code;
    }
    if CONFIG_FILENAMES.contains(&name.as_str()) || CONFIG_EXTENSIONS.contains(&extension.as_str())
    {
        return FileCategory::Config;
    }
    if DOC_EXTENSIONS.contains(&extension.as_str()) {
        return FileCategory::Docs;
    }
    if ASSET_EXTENSIONS.contains(&extension.as_str()) {
        return FileCategory::Assets;
    }
    FileCategory::Other
}

/// Categorize a scanned file list; paths are stored root-relative.
pub fn categorize(root: &Path, files: &[PathBuf]) -> CategorizedFiles {
    let mut categorized = CategorizedFiles::default();
    for file in files {
        let relative = super::relative_slash(root, file);
        let bucket = match categorize_path(Path::new(&relative)) {
            FileCategory::Tests => &mut categorized.tests,
            FileCategory::Code => &mut categorized.code,
            FileCategory::Config => &mut categorized.config,
            FileCategory::Docs => &mut categorized.docs,
            FileCategory::Assets => &mut categorized.assets,
            FileCategory::Other => &mut categorized.other,
        };
        bucket.push(relative);
    }
    categorized
}

fn is_test_path(path: &Path, name: &str) -> bool {
    if name.contains(".test.")
        || name.contains(".spec.")
        || name.contains("_test.")
        || name.starts_with("test_")
    {
        return true;
    }
    path.components().any(|component| match component {
        Component::Normal(segment) => segment
            .to_str()
            .map(|s| TEST_DIR_SEGMENTS.contains(&s.to_ascii_lowercase().as_str()))
            .unwrap_or(false),
        _ => false,
    })
}
