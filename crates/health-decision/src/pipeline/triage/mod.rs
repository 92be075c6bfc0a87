//! Decision-table triage classifier.
//!
//! Rules are compiled once from the configured table into closed [`Predicate`] variants and
//! then evaluated against each set of facts. When several rules match, the configured
//! priority list decides; equal levels fall back to the rule id so rule order never changes
//! the outcome.

mod priority;
mod rules;

pub use priority::{LevelPriority, TriageLevel};
pub use rules::{
    ConditionsDocument, Predicate, RuleDocument, RuleTable, RuleTableDocument, RuleTableError,
    TriageRule,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::facts::HealthFacts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub triage_level: TriageLevel,
    /// Id of the single most severe matched rule.
    pub reasons: Vec<String>,
    /// Every matched rule id, most severe first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_rules: Vec<String>,
}

impl TriageResult {
    pub fn low() -> Self {
        Self {
            triage_level: TriageLevel::Low,
            reasons: Vec::new(),
            matched_rules: Vec::new(),
        }
    }
}

pub fn classify(facts: &HealthFacts, table: &RuleTable) -> TriageResult {
    let priority = table.priority();
    let mut matched: Vec<&TriageRule> = table
        .rules()
        .iter()
        .filter(|rule| rule.matches(facts))
        .collect();

    if matched.is_empty() {
        return TriageResult::low();
    }

    matched.sort_by(|a, b| {
        let rank_a = priority.rank(&a.level).unwrap_or(usize::MAX);
        let rank_b = priority.rank(&b.level).unwrap_or(usize::MAX);
        rank_a.cmp(&rank_b).then_with(|| a.id.cmp(&b.id))
    });

    let top = matched[0];
    debug!(rule = %top.id, level = %top.level, matches = matched.len(), "triage rule matched");

    TriageResult {
        triage_level: top.level.clone(),
        reasons: vec![top.id.clone()],
        matched_rules: matched.iter().map(|rule| rule.id.clone()).collect(),
    }
}
