//! Project-level aggregation.
//!
//! Takes the scanner's file list and folds it into one `ProjectFacts` value:
//! size and extension statistics, category groups, directory structure,
//! dependency manifests, entry points, and the inferred technology stack.

pub mod dependencies;
pub mod techstack;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::scan::categorize::{categorize, CategorizedFiles};
use crate::scan::relative_slash;
use dependencies::DependencyInfo;

/// Well-known entry-point paths, probed root-relative.
const ENTRY_POINT_NAMES: &[&str] = &[
    "index.js",
    "index.ts",
    "index.mjs",
    "main.js",
    "main.ts",
    "main.py",
    "app.js",
    "app.ts",
    "app.py",
    "server.js",
    "server.ts",
    "server.py",
    "cli.js",
    "manage.py",
    "src/index.js",
    "src/index.ts",
    "src/main.js",
    "src/main.ts",
    "src/app.js",
    "src/app.ts",
];

/// Aggregate counters over the scanned file list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub file_count: usize,
    /// Lowercased extension -> file count. Extensionless files are omitted.
    pub by_extension: BTreeMap<String, usize>,
    /// Top-level directory name -> file count. Root-level files tally
    /// under ".".
    pub by_top_level_dir: BTreeMap<String, usize>,
    pub total_size: u64,
}

/// Directory names and nesting depth observed under the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStructure {
    pub directories: Vec<String>,
    pub max_depth: usize,
}

/// Everything the aggregator knows about one project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFacts {
    pub name: String,
    pub root: String,
    /// Root-relative file paths, sorted.
    pub files: Vec<String>,
    pub stats: ProjectStats,
    pub categories: CategorizedFiles,
    pub structure: DirectoryStructure,
    pub dependencies: DependencyInfo,
    pub entry_points: Vec<String>,
    pub tech_stack: Vec<String>,
}

const ROOT_MARKER: &str = ".";

/// Fold a scanned file list into project facts.
pub fn aggregate(root: &Path, files: &[PathBuf]) -> ProjectFacts {
    let relative: Vec<String> = files.iter().map(|f| relative_slash(root, f)).collect();

    let mut stats = ProjectStats {
        file_count: files.len(),
        ..Default::default()
    };
    let mut directories: BTreeSet<String> = BTreeSet::new();
    let mut max_depth = 0usize;

    for (file, path) in relative.iter().zip(files) {
        // Metadata failures (racing deletes, permission flips) lose the size
        // contribution, nothing else.
        if let Ok(metadata) = fs::metadata(path) {
            stats.total_size += metadata.len();
        }

        if let Some(extension) = Path::new(file).extension().and_then(|e| e.to_str()) {
            *stats
                .by_extension
                .entry(extension.to_ascii_lowercase())
                .or_insert(0) += 1;
        }

        let segments: Vec<&str> = file.split('/').collect();
        let top = if segments.len() > 1 {
            segments[0]
        } else {
            ROOT_MARKER
        };
        *stats.by_top_level_dir.entry(top.to_string()).or_insert(0) += 1;

        // Every strict prefix of the path is a directory.
        for end in 1..segments.len() {
            directories.insert(segments[..end].join("/"));
        }
        // Depth counts path segments, so a root-level file is depth 1.
        max_depth = max_depth.max(segments.len());
    }

    let dependencies = dependencies::detect(root);
    let entry_points = entry_points(root, &relative, &dependencies);
    let tech_stack = techstack::infer(&stats.by_extension, &dependencies);
    let categories = categorize(root, files);

    ProjectFacts {
        name: root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(ROOT_MARKER)
            .to_string(),
        root: root.display().to_string(),
        files: relative,
        stats,
        categories,
        structure: DirectoryStructure {
            directories: directories.into_iter().collect(),
            max_depth,
        },
        dependencies,
        entry_points,
        tech_stack,
    }
}

/// Entry points: well-known names present in the file set, then
/// package.json `main` and `bin` targets. Insertion order, deduplicated.
fn entry_points(root: &Path, files: &[String], deps: &DependencyInfo) -> Vec<String> {
    let file_set: BTreeSet<&str> = files.iter().map(String::as_str).collect();
    let mut points: Vec<String> = Vec::new();
    let push = |candidate: &str, points: &mut Vec<String>| {
        let candidate = candidate.trim_start_matches("./");
        if !candidate.is_empty() && !points.iter().any(|p| p == candidate) {
            points.push(candidate.to_string());
        }
    };

    for name in ENTRY_POINT_NAMES {
        if file_set.contains(name) {
            push(name, &mut points);
        }
    }

    if deps.manager.as_deref() == Some("npm") {
        if let Some(manifest) = read_package_json(root) {
            if let Some(main) = manifest.get("main").and_then(Value::as_str) {
                push(main, &mut points);
            }
            match manifest.get("bin") {
                Some(Value::String(target)) => push(target, &mut points),
                Some(Value::Object(map)) => {
                    for target in map.values().filter_map(Value::as_str) {
                        push(target, &mut points);
                    }
                }
                _ => {}
            }
        }
    }

    points
}

fn read_package_json(root: &Path) -> Option<Value> {
    let content = fs::read_to_string(root.join("package.json")).ok()?;
    serde_json::from_str(&content).ok()
}
