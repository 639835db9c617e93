//! ECMAScript-family extraction over tree-sitter syntax trees.
//!
//! One recursive walk emits syntax events in source order; the shared
//! reduction in `facts` folds them into `StructuralFacts`. The JavaScript,
//! TypeScript, and TSX grammars expose the same node kinds for every
//! construct recorded here, so all three dialects share the walk.
//!
//! Failure semantics: a tree containing syntax errors yields a record with
//! `parse_error` set and empty fact lists. Extraction never returns an error
//! to the caller.

use tree_sitter::{Node, Parser as TsParser, Tree};

use super::facts::{
    reduce, ByteSpan, ClassRecord, CommentKind, CommentRecord, ExportKind, FunctionRecord,
    ImportRecord, MethodKind, MethodRecord, StructuralFacts, SyntaxEvent, VariableKind,
    VariableRecord,
};
use super::EcmaDialect;

/// Result of one extraction pass.
pub(crate) struct Outcome {
    pub facts: StructuralFacts,
    pub parse_error: Option<String>,
    pub tree: Option<Tree>,
}

fn language(dialect: EcmaDialect) -> tree_sitter::Language {
    match dialect {
        EcmaDialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        EcmaDialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        EcmaDialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

pub(crate) fn extract(source: &str, dialect: EcmaDialect, include_tree: bool) -> Outcome {
    let mut parser = TsParser::new();
    if let Err(e) = parser.set_language(&language(dialect)) {
        return Outcome {
            facts: StructuralFacts::default(),
            parse_error: Some(e.to_string()),
            tree: None,
        };
    }

    let Some(tree) = parser.parse(source, None) else {
        return Outcome {
            facts: StructuralFacts::default(),
            parse_error: Some("failed to parse source".to_string()),
            tree: None,
        };
    };

    let root = tree.root_node();
    if root.has_error() {
        let message = match first_error_line(root) {
            Some(line) => format!("syntax error near line {}", line),
            None => "syntax error".to_string(),
        };
        return Outcome {
            facts: StructuralFacts::default(),
            parse_error: Some(message),
            tree: include_tree.then_some(tree),
        };
    }

    let mut events = Vec::new();
    collect(root, source, &mut events);
    Outcome {
        facts: reduce(events),
        parse_error: None,
        tree: include_tree.then_some(tree),
    }
}

/// Line of the first error or missing node under `node`, if any.
fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if !child.has_error() {
            continue;
        }
        if let Some(line) = first_error_line(child) {
            return Some(line);
        }
    }
    None
}

fn text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

/// True when `node` carries an anonymous child token of the given kind
/// (e.g. `async`, `static`, `get`).
fn has_keyword(node: Node, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == keyword);
    found
}

fn collect(node: Node, source: &str, events: &mut Vec<SyntaxEvent>) {
    match node.kind() {
        "comment" => events.push(SyntaxEvent::Comment(comment_record(node, source))),
        "import_statement" => {
            if let Some(import) = import_record(node, source) {
                events.push(SyntaxEvent::Import(import));
            }
        }
        "export_statement" => export_events(node, source, events),
        "function_declaration" | "generator_function_declaration" => {
            events.push(SyntaxEvent::Function(function_record(node, source, false)));
        }
        "variable_declarator" => declarator_events(node, source, events),
        "class_declaration" => {
            events.push(SyntaxEvent::Class(class_record(node, source)));
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, events);
    }
}

fn comment_record(node: Node, source: &str) -> CommentRecord {
    let raw = text(node, source);
    let (kind, body) = match raw.strip_prefix("//") {
        Some(rest) => (CommentKind::Line, rest),
        None => (
            CommentKind::Block,
            raw.trim_start_matches("/*").trim_end_matches("*/"),
        ),
    };
    CommentRecord {
        kind,
        text: body.trim().to_string(),
        span: ByteSpan {
            start: node.start_byte(),
            end: node.end_byte(),
        },
    }
}

/// Unquoted value of a `string` node.
fn string_value(node: Node, source: &str) -> String {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "string_fragment" {
            return text(child, source).to_string();
        }
    }
    text(node, source)
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

fn import_record(node: Node, source: &str) -> Option<ImportRecord> {
    let source_node = node.child_by_field_name("source")?;
    let mut record = ImportRecord::bare(string_value(source_node, source), line_of(node));

    let mut cursor = node.walk();
    let clause = node
        .children(&mut cursor)
        .find(|c| c.kind() == "import_clause");
    let Some(clause) = clause else {
        // Side-effect import: `import "./polyfill"`.
        return Some(record);
    };

    let mut clause_cursor = clause.walk();
    for child in clause.named_children(&mut clause_cursor) {
        match child.kind() {
            "identifier" => record.default = Some(text(child, source).to_string()),
            "named_imports" => {
                let mut spec_cursor = child.walk();
                for spec in child.named_children(&mut spec_cursor) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    // Local binding: the alias when present, otherwise the name.
                    let binding = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(binding) = binding {
                        record.named.push(text(binding, source).to_string());
                    }
                }
            }
            "namespace_import" => {
                let mut ns_cursor = child.walk();
                record.namespace = child
                    .named_children(&mut ns_cursor)
                    .find(|c| c.kind() == "identifier")
                    .map(|c| text(c, source).to_string());
            }
            _ => {}
        }
    }
    Some(record)
}

fn export_events(node: Node, source: &str, events: &mut Vec<SyntaxEvent>) {
    let line = line_of(node);
    let has_source = node.child_by_field_name("source").is_some();
    let is_default = has_keyword(node, "default");

    if is_default {
        if let Some(decl) = node.child_by_field_name("declaration") {
            let name = decl
                .child_by_field_name("name")
                .map(|n| text(n, source).to_string())
                .unwrap_or_else(|| "default".to_string());
            events.push(SyntaxEvent::Export {
                name,
                line,
                kind: Some(ExportKind::Default),
            });
        } else if let Some(value) = node.child_by_field_name("value") {
            events.push(SyntaxEvent::Export {
                name: "default".to_string(),
                line,
                kind: Some(ExportKind::Default),
            });
            // `export default () => {}` and friends still count as functions.
            if matches!(
                value.kind(),
                "arrow_function" | "function_expression" | "function" | "generator_function"
            ) {
                events.push(SyntaxEvent::Function(function_record(
                    value,
                    source,
                    value.kind() == "arrow_function",
                )));
            }
        } else {
            events.push(SyntaxEvent::Export {
                name: "default".to_string(),
                line,
                kind: Some(ExportKind::Default),
            });
        }
        return;
    }

    if let Some(decl) = node.child_by_field_name("declaration") {
        match decl.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = decl.child_by_field_name("name") {
                    events.push(SyntaxEvent::Export {
                        name: text(name, source).to_string(),
                        line,
                        kind: Some(ExportKind::Function),
                    });
                }
            }
            "class_declaration" => {
                if let Some(name) = decl.child_by_field_name("name") {
                    events.push(SyntaxEvent::Export {
                        name: text(name, source).to_string(),
                        line,
                        kind: Some(ExportKind::Class),
                    });
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = decl.walk();
                for declarator in decl.named_children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    let Some(name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    if name.kind() != "identifier" {
                        continue;
                    }
                    // Function-valued declarators export a function, not a
                    // variable; the reduction resolves the kind by name.
                    events.push(SyntaxEvent::Export {
                        name: text(name, source).to_string(),
                        line,
                        kind: None,
                    });
                }
            }
            _ => {}
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "export_clause" => {
                let mut spec_cursor = child.walk();
                for spec in child.named_children(&mut spec_cursor) {
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let exported = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(exported) = exported {
                        events.push(SyntaxEvent::Export {
                            name: text(exported, source).to_string(),
                            line,
                            kind: if has_source {
                                Some(ExportKind::ReExport)
                            } else {
                                None
                            },
                        });
                    }
                }
            }
            "*" => events.push(SyntaxEvent::Export {
                name: "*".to_string(),
                line,
                kind: Some(ExportKind::ReExport),
            }),
            "namespace_export" => {
                let mut ns_cursor = child.walk();
                let name = child
                    .named_children(&mut ns_cursor)
                    .next()
                    .map(|n| text(n, source).to_string())
                    .unwrap_or_else(|| "*".to_string());
                events.push(SyntaxEvent::Export {
                    name,
                    line,
                    kind: Some(ExportKind::ReExport),
                });
            }
            _ => {}
        }
    }
}

/// Build a function record from a declaration, expression, or arrow node.
fn function_record(node: Node, source: &str, is_arrow: bool) -> FunctionRecord {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string())
        .unwrap_or_else(|| "anonymous".to_string());
    FunctionRecord {
        name,
        params: parameter_names(node, source),
        is_async: has_keyword(node, "async"),
        is_generator: matches!(
            node.kind(),
            "generator_function_declaration" | "generator_function"
        ),
        is_arrow,
        is_method: false,
        line: line_of(node),
        is_exported: false,
    }
}

fn parameter_names(node: Node, source: &str) -> Vec<String> {
    let Some(params) = node.child_by_field_name("parameters") else {
        // Arrow with a single bare parameter: `x => x + 1`.
        return node
            .child_by_field_name("parameter")
            .map(|p| vec![text(p, source).to_string()])
            .unwrap_or_default();
    };
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        if let Some(name) = pattern_name(child, source) {
            names.push(name);
        }
    }
    names
}

fn pattern_name(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" | "this" => Some(text(node, source).to_string()),
        "assignment_pattern" => node
            .child_by_field_name("left")
            .and_then(|n| pattern_name(n, source)),
        // TypeScript wraps each parameter; the pattern field holds the binding.
        "required_parameter" | "optional_parameter" => node
            .child_by_field_name("pattern")
            .and_then(|n| pattern_name(n, source)),
        "rest_pattern" => node.named_child(0).and_then(|n| pattern_name(n, source)),
        // Destructuring parameters keep their full source text.
        "object_pattern" | "array_pattern" => Some(text(node, source).to_string()),
        _ => None,
    }
}

fn declarator_events(node: Node, source: &str, events: &mut Vec<SyntaxEvent>) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let line = line_of(node);

    if let Some(value) = node.child_by_field_name("value") {
        if matches!(
            value.kind(),
            "arrow_function" | "function_expression" | "function" | "generator_function"
        ) {
            // Reclassify: function-valued declarators are functions, never
            // variables.
            if name_node.kind() == "identifier" {
                let mut record =
                    function_record(value, source, value.kind() == "arrow_function");
                record.name = text(name_node, source).to_string();
                record.line = line;
                events.push(SyntaxEvent::Function(record));
            }
            return;
        }
    }

    // Destructuring declarators are not recorded.
    if name_node.kind() != "identifier" {
        return;
    }
    events.push(SyntaxEvent::Variable(VariableRecord {
        name: text(name_node, source).to_string(),
        kind: declaration_kind(node),
        line,
    }));
}

fn declaration_kind(declarator: Node) -> VariableKind {
    match declarator.parent() {
        Some(parent) if parent.kind() == "lexical_declaration" => {
            if parent.child(0).map(|c| c.kind()) == Some("const") {
                VariableKind::Const
            } else {
                VariableKind::Let
            }
        }
        _ => VariableKind::Var,
    }
}

fn class_record(node: Node, source: &str) -> ClassRecord {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, source).to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    let mut methods = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "method_definition" {
                continue;
            }
            let Some(name_node) = member.child_by_field_name("name") else {
                continue;
            };
            let method_name = text(name_node, source).to_string();
            let kind = if method_name == "constructor" {
                MethodKind::Constructor
            } else if has_keyword(member, "get") {
                MethodKind::Getter
            } else if has_keyword(member, "set") {
                MethodKind::Setter
            } else {
                MethodKind::Method
            };
            methods.push(MethodRecord {
                name: method_name,
                kind,
                is_static: has_keyword(member, "static"),
            });
        }
    }

    ClassRecord {
        name,
        parent: superclass_name(node, source),
        methods,
        line: line_of(node),
        is_exported: false,
    }
}

fn superclass_name(node: Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let heritage = node
        .children(&mut cursor)
        .find(|c| c.kind() == "class_heritage")?;

    let mut heritage_cursor = heritage.walk();
    for inner in heritage.named_children(&mut heritage_cursor) {
        match inner.kind() {
            // TypeScript nests an extends_clause inside the heritage.
            "extends_clause" => {
                return inner
                    .child_by_field_name("value")
                    .or_else(|| inner.named_child(0))
                    .map(|n| text(n, source).to_string());
            }
            "implements_clause" => continue,
            // JavaScript puts the superclass expression directly here.
            _ => return Some(text(inner, source).to_string()),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::facts::ExportKind;

    fn facts(source: &str) -> StructuralFacts {
        let outcome = extract(source, EcmaDialect::JavaScript, false);
        assert!(
            outcome.parse_error.is_none(),
            "unexpected parse error: {:?}",
            outcome.parse_error
        );
        outcome.facts
    }

    #[test]
    fn test_import_forms() {
        let facts = facts(
            r#"
import React from "react";
import { useState, useEffect as effect } from "react";
import * as path from "path";
import "./side-effect";
"#,
        );

        assert_eq!(facts.imports.len(), 4);
        assert_eq!(facts.imports[0].source, "react");
        assert_eq!(facts.imports[0].default.as_deref(), Some("React"));
        assert_eq!(facts.imports[1].named, vec!["useState", "effect"]);
        assert_eq!(facts.imports[2].namespace.as_deref(), Some("path"));
        assert_eq!(facts.imports[3].source, "./side-effect");
        assert!(facts.imports[3].named.is_empty());
        assert_eq!(facts.imports[0].line, 2);
    }

    #[test]
    fn test_export_kinds_and_derived_flags() {
        let facts = facts(
            r#"
export function visible() {}
function hidden() {}
export class Widget {}
export const LIMIT = 10;
export { hidden };
export { other } from "./other";
export * from "./all";
"#,
        );

        let kinds: Vec<(String, ExportKind)> = facts
            .exports
            .iter()
            .map(|e| (e.name.clone(), e.kind))
            .collect();
        assert!(kinds.contains(&("visible".to_string(), ExportKind::Function)));
        assert!(kinds.contains(&("Widget".to_string(), ExportKind::Class)));
        assert!(kinds.contains(&("LIMIT".to_string(), ExportKind::Variable)));
        // Bare clause resolves against the collected declarations.
        assert!(kinds.contains(&("hidden".to_string(), ExportKind::Function)));
        assert!(kinds.contains(&("other".to_string(), ExportKind::ReExport)));
        assert!(kinds.contains(&("*".to_string(), ExportKind::ReExport)));

        let visible = facts.functions.iter().find(|f| f.name == "visible").unwrap();
        let hidden = facts.functions.iter().find(|f| f.name == "hidden").unwrap();
        assert!(visible.is_exported);
        assert!(hidden.is_exported, "clause-exported function is exported");
        assert!(facts.classes[0].is_exported);
    }

    #[test]
    fn test_every_export_has_a_declaration() {
        let facts = facts(
            r#"
export function a() {}
export class B {}
function c() {}
export { c };
"#,
        );
        for export in facts
            .exports
            .iter()
            .filter(|e| matches!(e.kind, ExportKind::Function | ExportKind::Class))
        {
            let declared = facts
                .functions
                .iter()
                .any(|f| f.name == export.name && f.is_exported)
                || facts
                    .classes
                    .iter()
                    .any(|c| c.name == export.name && c.is_exported);
            assert!(declared, "export {:?} has no exported declaration", export.name);
        }
        let exported_names: Vec<&str> = facts
            .exports
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        for function in &facts.functions {
            assert_eq!(
                function.is_exported,
                exported_names.contains(&function.name.as_str())
            );
        }
    }

    #[test]
    fn test_default_export_of_anonymous_function() {
        let facts = facts("export default function () { return 1; }\n");
        assert_eq!(facts.exports[0].kind, ExportKind::Default);
        assert_eq!(facts.exports[0].name, "default");
        assert!(facts.functions.iter().any(|f| f.name == "anonymous"));

        let arrow = extract(
            "export default () => 42;\n",
            EcmaDialect::JavaScript,
            false,
        )
        .facts;
        assert!(arrow.functions.iter().any(|f| f.name == "anonymous" && f.is_arrow));
    }

    #[test]
    fn test_function_flags_and_params() {
        let facts = facts(
            r#"
async function fetchIt(url, options = {}) {}
function* walk(tree) {}
const sum = (a, b) => a + b;
const scale = async x => x * 2;
"#,
        );

        let fetch = facts.functions.iter().find(|f| f.name == "fetchIt").unwrap();
        assert!(fetch.is_async && !fetch.is_generator && !fetch.is_arrow);
        assert_eq!(fetch.params, vec!["url", "options"]);

        let walk = facts.functions.iter().find(|f| f.name == "walk").unwrap();
        assert!(walk.is_generator);

        let sum = facts.functions.iter().find(|f| f.name == "sum").unwrap();
        assert!(sum.is_arrow);
        assert_eq!(sum.params, vec!["a", "b"]);
        assert_eq!(sum.line, 4);

        let scale = facts.functions.iter().find(|f| f.name == "scale").unwrap();
        assert!(scale.is_arrow && scale.is_async);
        assert_eq!(scale.params, vec!["x"]);
    }

    #[test]
    fn test_function_valued_declarators_are_not_variables() {
        let facts = facts(
            r#"
const handler = () => {};
const plain = 1;
let counter = 0;
var legacy = "x";
"#,
        );

        assert!(facts.variables.iter().all(|v| v.name != "handler"));
        assert!(facts.functions.iter().any(|f| f.name == "handler"));

        let kinds: Vec<(&str, VariableKind)> = facts
            .variables
            .iter()
            .map(|v| (v.name.as_str(), v.kind))
            .collect();
        assert!(kinds.contains(&("plain", VariableKind::Const)));
        assert!(kinds.contains(&("counter", VariableKind::Let)));
        assert!(kinds.contains(&("legacy", VariableKind::Var)));
    }

    #[test]
    fn test_destructuring_declarators_are_skipped() {
        let facts = facts("const { a, b } = load();\nconst [x] = items;\n");
        assert!(facts.variables.is_empty());
    }

    #[test]
    fn test_class_shape() {
        let facts = facts(
            r#"
class Registry extends Base {
    constructor(size) { super(); this.size = size; }
    get length() { return this.size; }
    set length(v) { this.size = v; }
    static create() { return new Registry(0); }
    lookup(key) { return key; }
}
"#,
        );

        let class = &facts.classes[0];
        assert_eq!(class.name, "Registry");
        assert_eq!(class.parent.as_deref(), Some("Base"));
        assert_eq!(class.line, 2);

        let by_name = |n: &str| class.methods.iter().find(|m| m.name == n).unwrap();
        assert_eq!(by_name("constructor").kind, MethodKind::Constructor);
        assert_eq!(by_name("length").kind, MethodKind::Getter);
        assert_eq!(by_name("create").kind, MethodKind::Method);
        assert!(by_name("create").is_static);
        assert_eq!(by_name("lookup").kind, MethodKind::Method);
        assert!(!by_name("lookup").is_static);
    }

    #[test]
    fn test_comments_with_spans() {
        let source = "// first\nconst a = 1;\n/* block\n   body */\n";
        let facts = facts(source);

        assert_eq!(facts.comments.len(), 2);
        assert_eq!(facts.comments[0].kind, CommentKind::Line);
        assert_eq!(facts.comments[0].text, "first");
        assert_eq!(facts.comments[0].span, ByteSpan { start: 0, end: 8 });
        assert_eq!(facts.comments[1].kind, CommentKind::Block);
        assert!(facts.comments[1].text.contains("block"));
    }

    #[test]
    fn test_malformed_source_degrades_to_parse_error() {
        let outcome = extract("function { broken", EcmaDialect::JavaScript, false);
        let error = outcome.parse_error.expect("should record a parse error");
        assert!(error.contains("syntax error"), "got {:?}", error);
        assert!(outcome.facts.functions.is_empty());
        assert!(outcome.facts.imports.is_empty());
        assert!(outcome.facts.comments.is_empty());
    }

    #[test]
    fn test_include_tree_attaches_tree() {
        let with_tree = extract("const a = 1;\n", EcmaDialect::JavaScript, true);
        assert!(with_tree.tree.is_some());
        let without = extract("const a = 1;\n", EcmaDialect::JavaScript, false);
        assert!(without.tree.is_none());
    }

    #[test]
    fn test_typescript_params_and_heritage() {
        let outcome = extract(
            r#"
import type { Config } from "./config";

export class Store extends BaseStore {
    get(key: string): string | undefined { return undefined; }
}

export function make(name: string, retries: number = 3): Store {
    return new Store();
}
"#,
            EcmaDialect::TypeScript,
            false,
        );
        assert!(outcome.parse_error.is_none(), "{:?}", outcome.parse_error);
        let facts = outcome.facts;

        assert_eq!(facts.imports[0].source, "./config");
        let class = &facts.classes[0];
        assert_eq!(class.parent.as_deref(), Some("BaseStore"));
        assert!(class.is_exported);

        let make = facts.functions.iter().find(|f| f.name == "make").unwrap();
        assert_eq!(make.params, vec!["name", "retries"]);
        assert!(make.is_exported);
    }

    #[test]
    fn test_tsx_component() {
        let outcome = extract(
            r#"
export function App({ title }: { title: string }) {
    return <div>{title}</div>;
}
"#,
            EcmaDialect::Tsx,
            false,
        );
        assert!(outcome.parse_error.is_none(), "{:?}", outcome.parse_error);
        let app = outcome.facts.functions.iter().find(|f| f.name == "App");
        assert!(app.unwrap().is_exported);
    }
}
