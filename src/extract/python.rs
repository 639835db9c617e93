//! Line-heuristic extraction for Python sources.
//!
//! There is no full grammar here: each physical line is tested, in order,
//! against import, def, class, and module-constant patterns; the first match
//! wins the line. This tier is intentionally shallow and stays that way:
//! multi-line signatures, decorators, and nested scopes are not tracked, so
//! downstream output stays comparable with the documented behavior.

use once_cell::sync::Lazy;
use regex::Regex;

use super::facts::{
    reduce, ClassRecord, FunctionRecord, ImportRecord, StructuralFacts, SyntaxEvent, VariableKind,
    VariableRecord,
};

static FROM_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*from\s+([\w.]+)\s+import\s+(.+)").unwrap());
static IMPORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*import\s+([\w.]+)").unwrap());
// The closing paren must sit on the same line; multi-line signatures do not match.
static DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(async\s+)?def\s+([A-Za-z_]\w*)\s*\((.*)\)").unwrap());
static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*class\s+([A-Za-z_]\w*)\s*(?:\(([^)]*)\))?\s*:").unwrap());
// Module-level constants only: ALL_CAPS assignment at column 0.
static CONST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z][A-Z0-9_]*)\s*=").unwrap());

pub(crate) fn extract(source: &str) -> StructuralFacts {
    let mut events = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;

        if let Some(captures) = FROM_IMPORT_RE.captures(line) {
            let named = captures[2]
                .split(',')
                .map(|item| {
                    // `import y as z` binds z locally.
                    item.split(" as ").last().unwrap_or(item).trim().to_string()
                })
                .filter(|item| !item.is_empty())
                .collect();
            events.push(SyntaxEvent::Import(ImportRecord {
                source: captures[1].to_string(),
                default: None,
                named,
                namespace: None,
                line: line_number,
            }));
            continue;
        }

        if let Some(captures) = IMPORT_RE.captures(line) {
            events.push(SyntaxEvent::Import(ImportRecord::bare(
                captures[1].to_string(),
                line_number,
            )));
            continue;
        }

        if let Some(captures) = DEF_RE.captures(line) {
            let params = captures[4]
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            events.push(SyntaxEvent::Function(FunctionRecord {
                name: captures[3].to_string(),
                params,
                is_async: captures.get(2).is_some(),
                is_generator: false,
                is_arrow: false,
                // Any indentation means the def sits inside an enclosing block.
                is_method: !captures[1].is_empty(),
                line: line_number,
                is_exported: false,
            }));
            continue;
        }

        if let Some(captures) = CLASS_RE.captures(line) {
            let parent = captures
                .get(2)
                .and_then(|bases| bases.as_str().split(',').next())
                .map(str::trim)
                .filter(|base| !base.is_empty())
                .map(str::to_string);
            events.push(SyntaxEvent::Class(ClassRecord {
                name: captures[1].to_string(),
                parent,
                methods: Vec::new(),
                line: line_number,
                is_exported: false,
            }));
            continue;
        }

        if let Some(captures) = CONST_RE.captures(line) {
            events.push(SyntaxEvent::Variable(VariableRecord {
                name: captures[1].to_string(),
                kind: VariableKind::Const,
                line: line_number,
            }));
        }
    }

    reduce(events)
}
