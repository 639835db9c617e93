//! Optional natural-language summarization seam.
//!
//! The engine itself never generates prose. Callers that want a narrative
//! layer plug in a `Summarizer`; the analysis pipeline hands it serialized
//! facts and treats any failure as "no summary", never as a pipeline error.

use serde_json::Value;

/// What a summary request is describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// Whole-project facts.
    Project,
    /// A single file or module record.
    Module,
}

/// Produces prose from structural facts. Implementations live outside this
/// crate (an LLM client, a template engine, a fixture in tests).
pub trait Summarizer {
    fn summarize(&self, facts: &Value, kind: SummaryKind) -> anyhow::Result<String>;
}

/// Run a summarizer over serialized facts. Errors degrade to `None` so a
/// flaky summarizer can never fail an analysis run.
pub fn summarize_with(
    summarizer: &dyn Summarizer,
    facts: &Value,
    kind: SummaryKind,
) -> Option<String> {
    summarizer.summarize(facts, kind).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(&'static str);

    impl Summarizer for Fixed {
        fn summarize(&self, _facts: &Value, _kind: SummaryKind) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct AlwaysFails;

    impl Summarizer for AlwaysFails {
        fn summarize(&self, _facts: &Value, _kind: SummaryKind) -> anyhow::Result<String> {
            anyhow::bail!("backend unavailable")
        }
    }

    #[test]
    fn test_summary_passes_through() {
        let facts = json!({"name": "demo"});
        let summary = summarize_with(&Fixed("a demo project"), &facts, SummaryKind::Project);
        assert_eq!(summary.as_deref(), Some("a demo project"));
    }

    #[test]
    fn test_failure_degrades_to_none() {
        let facts = json!({});
        assert_eq!(summarize_with(&AlwaysFails, &facts, SummaryKind::Module), None);
    }
}
