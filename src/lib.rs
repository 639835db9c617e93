//! Codefacts - structural fact extraction for codebases.
//!
//! Codefacts walks a project tree and reduces it to structured facts:
//! per-file imports, exports, functions, classes, and comments for
//! ECMAScript-family and Python sources, JSON shape descriptions for data
//! files, plus project-level statistics, dependency manifests, entry points,
//! and an inferred technology stack. The output is deterministic JSON meant
//! to feed documentation generators and other downstream tooling.
//!
//! # Architecture
//!
//! - `extract`: per-file extraction, dispatched by extension (tree-sitter
//!   for ECMAScript dialects, line heuristics for Python, serde for JSON)
//! - `scan`: directory traversal with ignore rules, plus file categorization
//! - `project`: aggregation into project-level facts
//! - `summary`: optional prose-summarization seam
//! - `report`: output formatting (pretty, JSON)
//!
//! # Adding a Language
//!
//! Add a `Strategy` variant in `extract` and implement its handler; the
//! dispatch table in `Strategy::for_extension` is the single registration
//! point.

pub mod cli;
pub mod extract;
pub mod project;
pub mod report;
pub mod scan;
pub mod summary;

use std::fs;
use std::path::Path;

use serde::Serialize;

pub use extract::{
    ClassRecord, ExportKind, ExportRecord, FileRecord, FunctionRecord, ImportRecord, JsonShape,
    StructuralFacts, VariableKind, VariableRecord,
};
pub use project::{dependencies::DependencyInfo, ProjectFacts, ProjectStats};
pub use scan::categorize::{CategorizedFiles, FileCategory};
pub use scan::{ScanError, ScanOptions};
pub use summary::{SummaryKind, Summarizer};

/// Options for a full analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Path segments to descend below the root; `<= 0` restricts the scan to
    /// the root's immediate children.
    pub max_depth: i32,
    /// Extra glob patterns excluded in addition to the defaults.
    pub ignore: Vec<String>,
    /// Attach raw syntax trees to file records (in-memory consumers only;
    /// trees are never serialized).
    pub include_tree: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_depth: 10,
            ignore: Vec::new(),
            include_tree: false,
        }
    }
}

/// A complete analysis: project-level facts plus per-file records.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub project: ProjectFacts,
    /// Extraction records for code, config, and test files.
    #[serde(rename = "files")]
    pub records: Vec<FileRecord>,
}

/// Scan, aggregate, and extract in one pass.
///
/// Only code, config, and test files go through extraction; docs, assets,
/// and unknown files still count toward project statistics. Files that
/// become unreadable between scan and read are dropped from the records.
pub fn analyze(root: &Path, options: &AnalyzeOptions) -> anyhow::Result<Analysis> {
    let root = root
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", root, e))?;

    let scan_options = ScanOptions {
        max_depth: options.max_depth,
        ignore: options.ignore.clone(),
    };
    let files = scan::scan(&root, &scan_options)?;
    let project = project::aggregate(&root, &files);

    let extract_options = extract::ExtractOptions {
        include_tree: options.include_tree,
    };

    let mut records = Vec::new();
    for file in &files {
        let relative = scan::relative_slash(&root, file);
        let category = scan::categorize::categorize_path(Path::new(&relative));
        if !matches!(
            category,
            FileCategory::Code | FileCategory::Config | FileCategory::Tests
        ) {
            continue;
        }
        // Binary or vanished files are skipped, not fatal.
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        records.push(extract::extract(
            Path::new(&relative),
            &content,
            extract_options,
        ));
    }

    Ok(Analysis { project, records })
}
