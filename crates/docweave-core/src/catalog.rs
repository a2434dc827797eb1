//! Plan catalog
//!
//! Fixed table mapping known commands to precomputed plans. Lookup first
//! normalizes the command (trim + lowercase) and tries an exact key match;
//! failing that, it falls back to a sequence-matching similarity ratio
//! against every key and accepts the best match at or above the threshold.

use serde_json::json;
use similar::TextDiff;

use crate::tool::{BATCH_SUMMARIZE, FETCH_DOCUMENTS, MERGE_DOCUMENT};
use crate::types::{Plan, Step};

/// Minimum similarity ratio for a fuzzy catalog hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.70;

/// Ordered command → plan table with exact and fuzzy lookup.
///
/// Entries keep insertion order; similarity ties resolve to the
/// first-encountered key.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    entries: Vec<(String, Plan)>,
    threshold: f32,
}

impl PlanCatalog {
    /// Create an empty catalog with the default threshold.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Catalog of the known document-merge commands.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for command in [
            "Merge all documents from azure blob and generate a word document.",
            "Merge all the documents",
            "Merge all documents and give output as a word document.",
            "Merge all documents and generate a word document.",
        ] {
            catalog.insert(command, merge_pipeline());
        }
        catalog
    }

    /// Override the fuzzy-match threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Add a known command. Keys are stored normalized.
    pub fn insert(&mut self, command: impl AsRef<str>, plan: Plan) {
        let key = normalize(command.as_ref());
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = plan;
        } else {
            self.entries.push((key, plan));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a command to a precomputed plan, if any.
    pub fn lookup(&self, command: &str) -> Option<&Plan> {
        let normalized = normalize(command);

        if let Some((_, plan)) = self.entries.iter().find(|(key, _)| *key == normalized) {
            return Some(plan);
        }

        let mut best: Option<(&Plan, f32)> = None;
        for (key, plan) in &self.entries {
            let ratio = similarity(&normalized, key);
            // Strictly greater keeps the first-encountered key on ties.
            if ratio >= self.threshold && best.map_or(true, |(_, b)| ratio > b) {
                best = Some((plan, ratio));
            }
        }
        best.map(|(plan, ratio)| {
            tracing::debug!(ratio, command = %normalized, "fuzzy catalog hit");
            plan
        })
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize(command: &str) -> String {
    command.trim().to_lowercase()
}

/// Sequence-matching ratio over characters, in `[0.0, 1.0]`.
fn similarity(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}

/// The canonical fetch → summarize → merge pipeline.
fn merge_pipeline() -> Plan {
    Plan::new(vec![
        Step::new(FETCH_DOCUMENTS, json!({"source": "blob_storage"})),
        Step::new(BATCH_SUMMARIZE, json!({"documents": "use_previous_result"})),
        Step::new(MERGE_DOCUMENT, json!("use_previous_result")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepInput;

    #[test]
    fn test_exact_match_returns_pipeline() {
        let catalog = PlanCatalog::builtin();
        let plan = catalog.lookup("merge all the documents").expect("plan");
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.steps[0].tool, FETCH_DOCUMENTS);
        assert_eq!(plan.steps[1].tool, BATCH_SUMMARIZE);
        assert_eq!(plan.steps[2].tool, MERGE_DOCUMENT);
        assert_eq!(plan.steps[2].input, StepInput::UsePrevious);
    }

    #[test]
    fn test_lookup_normalizes_case_and_whitespace() {
        let catalog = PlanCatalog::builtin();
        let exact = catalog.lookup("merge all the documents").unwrap();
        let messy = catalog.lookup("  Merge ALL the Documents  ").unwrap();
        assert_eq!(exact, messy);
    }

    #[test]
    fn test_near_miss_resolves_via_similarity() {
        let catalog = PlanCatalog::builtin();
        // One word off from a catalog key; well above the 0.70 cutoff.
        assert!(catalog.lookup("merge all the document").is_some());
        assert!(catalog
            .lookup("merge all documents and generate a word doc")
            .is_some());
    }

    #[test]
    fn test_unrelated_command_misses() {
        let catalog = PlanCatalog::builtin();
        assert!(catalog.lookup("what tools do you have?").is_none());
        assert!(catalog.lookup("").is_none());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let strict = PlanCatalog::builtin().with_threshold(0.999);
        assert!(strict.lookup("merge all the document").is_none());
        assert!(strict.lookup("merge all the documents").is_some());
    }

    #[test]
    fn test_tie_breaks_to_first_inserted_key() {
        let mut catalog = PlanCatalog::new().with_threshold(0.5);
        catalog.insert("aab", Plan::new(vec![Step::new("first", serde_json::Value::Null)]));
        catalog.insert("aba", Plan::new(vec![Step::new("second", serde_json::Value::Null)]));
        // "aaa" matches both keys with the same ratio; the first entry wins.
        let plan = catalog.lookup("aaa").unwrap();
        assert_eq!(plan.steps[0].tool, "first");
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut catalog = PlanCatalog::new();
        catalog.insert("Do The Thing", Plan::new(vec![Step::new("a", serde_json::Value::Null)]));
        catalog.insert("do the thing", Plan::new(vec![Step::new("b", serde_json::Value::Null)]));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("do the thing").unwrap().steps[0].tool, "b");
    }
}
