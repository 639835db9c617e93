//! Dependency-manifest probing.
//!
//! Manifests are probed in fixed priority order: package.json, then
//! requirements.txt, then pyproject.toml. The first manifest that parses
//! wins and sets the manager tag. A project with none of the three simply
//! has no dependency info; that is not an error.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Dependency facts for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub dependencies: IndexMap<String, String>,
    pub dev_dependencies: IndexMap<String, String>,
}

impl DependencyInfo {
    /// Names across prod and dev dependencies.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .map(String::as_str)
    }
}

/// Probe manifests under `root` in priority order.
pub fn detect(root: &Path) -> DependencyInfo {
    if let Some(info) = package_json(root) {
        return info;
    }
    if let Some(info) = requirements_txt(root) {
        return info;
    }
    if let Some(info) = pyproject_toml(root) {
        return info;
    }
    DependencyInfo::default()
}

fn package_json(root: &Path) -> Option<DependencyInfo> {
    let content = fs::read_to_string(root.join("package.json")).ok()?;
    let value: Value = serde_json::from_str(&content).ok()?;

    let mut info = DependencyInfo {
        manager: Some("npm".to_string()),
        ..Default::default()
    };
    if let Some(map) = value.get("dependencies").and_then(Value::as_object) {
        for (name, version) in map {
            info.dependencies
                .insert(name.clone(), version.as_str().unwrap_or("").to_string());
        }
    }
    if let Some(map) = value.get("devDependencies").and_then(Value::as_object) {
        for (name, version) in map {
            info.dev_dependencies
                .insert(name.clone(), version.as_str().unwrap_or("").to_string());
        }
    }
    Some(info)
}

fn requirements_txt(root: &Path) -> Option<DependencyInfo> {
    let content = fs::read_to_string(root.join("requirements.txt")).ok()?;

    let mut info = DependencyInfo {
        manager: Some("pip".to_string()),
        ..Default::default()
    };
    for line in content.lines() {
        let line = line.trim();
        // Comments, blanks, and pip options (-r, -e, --index-url) carry no
        // dependency.
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        let (name, spec) = split_requirement(line);
        if !name.is_empty() {
            info.dependencies.insert(name, spec);
        }
    }
    Some(info)
}

/// Split a requirement like `flask==2.0` into name and version specifier.
///
/// Permissive by design: extras (`pkg[sql]`) and environment markers
/// (`; python_version < "3.9"`) are stripped from both sides.
fn split_requirement(entry: &str) -> (String, String) {
    match entry.find(|c| matches!(c, '=' | '<' | '>' | '~' | '!')) {
        Some(index) => {
            let name = entry[..index]
                .split('[')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            let spec = entry[index..]
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            (name, spec)
        }
        None => {
            let name = entry
                .split(|c| matches!(c, '[' | ';' | ' '))
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            (name, "*".to_string())
        }
    }
}

#[derive(PartialEq)]
enum Section {
    Top,
    Project,
    ProjectDepsArray,
    PoetryDeps,
    PoetryDevDeps,
}

fn pyproject_toml(root: &Path) -> Option<DependencyInfo> {
    let content = fs::read_to_string(root.join("pyproject.toml")).ok()?;

    let mut info = DependencyInfo {
        manager: Some("poetry".to_string()),
        ..Default::default()
    };
    let mut section = Section::Top;

    for line in content.lines() {
        let trimmed = line.trim();

        if section == Section::ProjectDepsArray {
            if trimmed.starts_with(']') {
                section = Section::Project;
                continue;
            }
            insert_array_entry(trimmed, &mut info.dependencies);
            continue;
        }

        if trimmed.starts_with('[') {
            section = match trimmed {
                "[project]" => Section::Project,
                "[tool.poetry.dependencies]" => Section::PoetryDeps,
                "[tool.poetry.dev-dependencies]" | "[tool.poetry.group.dev.dependencies]" => {
                    Section::PoetryDevDeps
                }
                _ => Section::Top,
            };
            continue;
        }

        match section {
            Section::Project if trimmed.starts_with("dependencies") && trimmed.contains('[') => {
                match (trimmed.find('['), trimmed.rfind(']')) {
                    (Some(open), Some(close)) if close > open => {
                        // Inline array: dependencies = ["a", "b>=1"]
                        for entry in trimmed[open + 1..close].split(',') {
                            insert_array_entry(entry.trim(), &mut info.dependencies);
                        }
                    }
                    _ => section = Section::ProjectDepsArray,
                }
            }
            Section::PoetryDeps | Section::PoetryDevDeps => {
                let Some((key, value)) = trimmed.split_once('=') else {
                    continue;
                };
                let name = key.trim();
                // The python entry is an interpreter constraint, not a
                // dependency.
                if name.is_empty() || name == "python" || name.starts_with('#') {
                    continue;
                }
                let spec = value
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_string();
                let bucket = if section == Section::PoetryDevDeps {
                    &mut info.dev_dependencies
                } else {
                    &mut info.dependencies
                };
                bucket.insert(name.to_string(), spec);
            }
            _ => {}
        }
    }

    Some(info)
}

fn insert_array_entry(raw: &str, into: &mut IndexMap<String, String>) {
    let entry = raw.trim_matches(|c| matches!(c, '"' | '\'' | ','));
    if entry.is_empty() || entry.starts_with('#') {
        return;
    }
    let (name, spec) = split_requirement(entry);
    if !name.is_empty() {
        into.insert(name, spec);
    }
}
