//! Per-file structural extraction, dispatched by extension.
//!
//! Dispatch is a closed tagged union: adding a language means adding a
//! `Strategy` variant and its handler, not patching a conditional chain.
//! Extraction never fails past this boundary; malformed input degrades to a
//! `parse_error` field on the record so one bad file cannot abort a
//! multi-file scan.

pub mod ecma;
pub mod facts;
pub mod json;
pub mod python;

use std::path::Path;

pub use facts::{
    ByteSpan, ClassRecord, CommentKind, CommentRecord, ExportKind, ExportRecord, FileRecord,
    FunctionRecord, ImportRecord, MethodKind, MethodRecord, StructuralFacts, VariableKind,
    VariableRecord,
};
pub use json::JsonShape;

/// ECMAScript grammar variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaDialect {
    JavaScript,
    TypeScript,
    Tsx,
}

/// Extraction strategy for a file, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    EcmaFamily(EcmaDialect),
    Python,
    Json,
    Unsupported,
}

impl Strategy {
    pub fn for_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Strategy::EcmaFamily(EcmaDialect::JavaScript),
            "ts" | "mts" | "cts" => Strategy::EcmaFamily(EcmaDialect::TypeScript),
            "tsx" => Strategy::EcmaFamily(EcmaDialect::Tsx),
            "py" | "pyw" => Strategy::Python,
            "json" => Strategy::Json,
            _ => Strategy::Unsupported,
        }
    }
}

/// Extraction options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Attach the raw syntax tree to the record for downstream inspection.
    /// Memory cost is unbounded and proportional to source size.
    pub include_tree: bool,
}

/// Extract structural facts from one file's content.
pub fn extract(path: &Path, content: &str, options: ExtractOptions) -> FileRecord {
    let mut record = FileRecord::stub(path, content);

    match Strategy::for_extension(&record.extension) {
        Strategy::EcmaFamily(dialect) => {
            let outcome = ecma::extract(content, dialect, options.include_tree);
            record.facts = outcome.facts;
            record.parse_error = outcome.parse_error;
            record.tree = outcome.tree;
        }
        Strategy::Python => record.facts = python::extract(content),
        Strategy::Json => match json::extract(content) {
            Ok(shape) => record.json = Some(shape),
            Err(message) => record.parse_error = Some(message),
        },
        Strategy::Unsupported => {}
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_extension() {
        assert_eq!(
            Strategy::for_extension("JSX"),
            Strategy::EcmaFamily(EcmaDialect::JavaScript)
        );
        assert_eq!(
            Strategy::for_extension("ts"),
            Strategy::EcmaFamily(EcmaDialect::TypeScript)
        );
        assert_eq!(
            Strategy::for_extension("tsx"),
            Strategy::EcmaFamily(EcmaDialect::Tsx)
        );
        assert_eq!(Strategy::for_extension("py"), Strategy::Python);
        assert_eq!(Strategy::for_extension("json"), Strategy::Json);
        assert_eq!(Strategy::for_extension("rb"), Strategy::Unsupported);
    }

    #[test]
    fn test_unsupported_extension_yields_stub() {
        let record = extract(
            Path::new("notes.adoc"),
            "line one\nline two\n",
            ExtractOptions::default(),
        );
        assert_eq!(record.extension, "adoc");
        assert_eq!(record.lines, 2);
        assert!(record.facts.functions.is_empty());
        assert!(record.json.is_none());
        assert!(record.parse_error.is_none());
    }

    #[test]
    fn test_json_parse_failure_sets_error_only() {
        let record = extract(Path::new("broken.json"), "{ nope", ExtractOptions::default());
        assert!(record.json.is_none());
        assert!(record.parse_error.is_some());
    }

    #[test]
    fn test_ecma_record_carries_facts() {
        let record = extract(
            Path::new("mod.js"),
            "export const x = 1;\n",
            ExtractOptions::default(),
        );
        assert_eq!(record.facts.exports.len(), 1);
        assert_eq!(record.facts.variables.len(), 1);
    }
}
