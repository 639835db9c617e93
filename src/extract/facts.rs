//! Fact structures extracted from source files.
//!
//! The tree walk in `ecma` and the line scan in `python` both emit a flat
//! list of `SyntaxEvent`s in source order; `reduce` folds that list into the
//! final `StructuralFacts`. Derived fields (`is_exported`, export kinds for
//! bare `export { .. }` clauses) are computed during the fold, never during
//! traversal.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use super::json::JsonShape;

/// Byte span of a source region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

/// One import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Module identifier as written in the source (e.g., "./util", "react").
    pub source: String,
    /// Default-import binding, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Named-import local bindings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub named: Vec<String>,
    /// Namespace-import binding (`* as ns`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub line: usize,
}

impl ImportRecord {
    pub fn bare(source: String, line: usize) -> Self {
        Self {
            source,
            default: None,
            named: Vec::new(),
            namespace: None,
            line,
        }
    }
}

/// What an export statement exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Function,
    Variable,
    Class,
    Default,
    #[serde(rename = "re-export")]
    ReExport,
}

/// One exported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub kind: ExportKind,
    pub name: String,
    pub line: usize,
}

/// One function declaration (or a function-valued variable declarator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    pub name: String,
    pub params: Vec<String>,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_arrow: bool,
    pub is_method: bool,
    pub line: usize,
    /// Derived during reduction from the set of exported names.
    pub is_exported: bool,
}

/// Method role inside a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Getter,
    Setter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecord {
    pub name: String,
    pub kind: MethodKind,
    pub is_static: bool,
}

/// One class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub name: String,
    /// Parent class name, when an extends clause is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub methods: Vec<MethodRecord>,
    pub line: usize,
    /// Derived during reduction from the set of exported names.
    pub is_exported: bool,
}

/// Declaration kind of a variable binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRecord {
    pub name: String,
    pub kind: VariableKind,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Block,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub kind: CommentKind,
    pub text: String,
    pub span: ByteSpan,
}

/// Structural facts for one code file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralFacts {
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub variables: Vec<VariableRecord>,
    pub comments: Vec<CommentRecord>,
}

/// One record per extracted file.
///
/// Created once per extraction call and never mutated afterwards. Extension-
/// agnostic fields are always populated; `facts` is non-empty only for code
/// files and `json` only for JSON files.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub extension: String,
    pub lines: usize,
    pub size: u64,
    pub facts: StructuralFacts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<JsonShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    /// Raw syntax tree, attached only when requested. Unbounded size,
    /// proportional to the source; excluded from serialized output.
    #[serde(skip)]
    pub tree: Option<tree_sitter::Tree>,
}

impl FileRecord {
    /// Build a record carrying only the extension-agnostic fields.
    pub fn stub(path: &Path, content: &str) -> Self {
        Self {
            path: path.display().to_string(),
            name: path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string(),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_ascii_lowercase(),
            lines: content.lines().count(),
            size: content.len() as u64,
            facts: StructuralFacts::default(),
            json: None,
            parse_error: None,
            tree: None,
        }
    }
}

/// A raw syntax event emitted by a traversal, in source order.
#[derive(Debug, Clone)]
pub(crate) enum SyntaxEvent {
    Import(ImportRecord),
    /// Export with `kind: None` when the kind is only knowable after all
    /// declarations are collected (`export { a, b }` without a source).
    Export {
        name: String,
        line: usize,
        kind: Option<ExportKind>,
    },
    Function(FunctionRecord),
    Class(ClassRecord),
    Variable(VariableRecord),
    Comment(CommentRecord),
}

/// Fold an event list into the final fact record.
///
/// Resolves deferred export kinds against the collected declarations and
/// derives `is_exported` as membership of a declaration's name in the set of
/// exported names. Two declarations sharing a name both end up exported; that
/// is an accepted heuristic limitation.
pub(crate) fn reduce(events: Vec<SyntaxEvent>) -> StructuralFacts {
    let mut facts = StructuralFacts::default();
    let mut pending_exports: Vec<(String, usize, Option<ExportKind>)> = Vec::new();

    for event in events {
        match event {
            SyntaxEvent::Import(import) => facts.imports.push(import),
            SyntaxEvent::Export { name, line, kind } => pending_exports.push((name, line, kind)),
            SyntaxEvent::Function(function) => facts.functions.push(function),
            SyntaxEvent::Class(class) => facts.classes.push(class),
            SyntaxEvent::Variable(variable) => facts.variables.push(variable),
            SyntaxEvent::Comment(comment) => facts.comments.push(comment),
        }
    }

    let function_names: HashSet<String> =
        facts.functions.iter().map(|f| f.name.clone()).collect();
    let class_names: HashSet<String> = facts.classes.iter().map(|c| c.name.clone()).collect();

    for (name, line, kind) in pending_exports {
        let kind = kind.unwrap_or_else(|| {
            if function_names.contains(&name) {
                ExportKind::Function
            } else if class_names.contains(&name) {
                ExportKind::Class
            } else {
                ExportKind::Variable
            }
        });
        facts.exports.push(ExportRecord { kind, name, line });
    }

    let exported: HashSet<&str> = facts
        .exports
        .iter()
        .filter(|e| e.kind != ExportKind::ReExport)
        .map(|e| e.name.as_str())
        .collect();
    for function in &mut facts.functions {
        function.is_exported = exported.contains(function.name.as_str());
    }
    for class in &mut facts.classes {
        class.is_exported = exported.contains(class.name.as_str());
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            params: Vec::new(),
            is_async: false,
            is_generator: false,
            is_arrow: false,
            is_method: false,
            line: 1,
            is_exported: false,
        }
    }

    #[test]
    fn test_reduce_marks_exported_declarations() {
        let events = vec![
            SyntaxEvent::Function(function("visible")),
            SyntaxEvent::Function(function("hidden")),
            SyntaxEvent::Export {
                name: "visible".to_string(),
                line: 1,
                kind: Some(ExportKind::Function),
            },
        ];

        let facts = reduce(events);
        assert!(facts.functions[0].is_exported);
        assert!(!facts.functions[1].is_exported);
    }

    #[test]
    fn test_reduce_resolves_clause_export_kind() {
        let events = vec![
            SyntaxEvent::Function(function("f")),
            SyntaxEvent::Export {
                name: "f".to_string(),
                line: 3,
                kind: None,
            },
            SyntaxEvent::Export {
                name: "x".to_string(),
                line: 3,
                kind: None,
            },
        ];

        let facts = reduce(events);
        assert_eq!(facts.exports[0].kind, ExportKind::Function);
        assert_eq!(facts.exports[1].kind, ExportKind::Variable);
    }

    #[test]
    fn test_reduce_reexport_does_not_mark_declarations() {
        let events = vec![
            SyntaxEvent::Function(function("f")),
            SyntaxEvent::Export {
                name: "f".to_string(),
                line: 1,
                kind: Some(ExportKind::ReExport),
            },
        ];

        let facts = reduce(events);
        assert!(!facts.functions[0].is_exported);
    }

    #[test]
    fn test_stub_record_fields() {
        let record = FileRecord::stub(Path::new("/p/Data.BIN"), "a\nb\n");
        assert_eq!(record.name, "Data.BIN");
        assert_eq!(record.extension, "bin");
        assert_eq!(record.lines, 2);
        assert_eq!(record.size, 4);
        assert!(record.facts.imports.is_empty());
        assert!(record.parse_error.is_none());
    }
}
