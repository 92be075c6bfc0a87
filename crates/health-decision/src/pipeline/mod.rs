//! Health decision pipeline.
//!
//! Stages run feed-forward: triage, diet signals, score, delta, recommendations, then the
//! explanation, alert, and projection synthesizers. Every stage is a pure function of the
//! facts, the rule table, the previous history entry, and the evaluation date.

pub mod clinical;
pub mod delta;
pub mod diet;
pub mod facts;
pub mod recommendations;
pub mod scoring;
pub mod synthesis;
pub mod triage;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use clinical::{reason_clinical_state, ClinicalState};
use delta::{analyze_delta, HealthDelta, ScoreHistoryEntry};
use diet::analyze_diet;
use facts::HealthFacts;
use recommendations::{recommend_with_signals, RecommendationBundle};
use scoring::{score_health, HealthScore, ScoreInputs};
use synthesis::{explain, generate_alerts, project_scores, Explanation, HealthAlert, ScoreProjection};
use triage::{classify, RuleTable, TriageResult};

/// Response envelope for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub triage: TriageResult,
    pub health_score: HealthScore,
    pub delta: HealthDelta,
    pub explanation: Explanation,
    pub alerts: Vec<HealthAlert>,
    pub projections: Vec<ScoreProjection>,
    pub recommendations: RecommendationBundle,
    pub clinical_state: ClinicalState,
}

impl HealthAssessment {
    /// The single history entry this evaluation contributes.
    pub fn history_entry(&self, created_at: DateTime<Utc>) -> ScoreHistoryEntry {
        ScoreHistoryEntry {
            score: self.health_score.score,
            label: self.health_score.label,
            breakdown: self.health_score.breakdown,
            triage_level: self.triage.triage_level.clone(),
            created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthPipeline {
    rules: Arc<RuleTable>,
}

impl HealthPipeline {
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn evaluate(
        &self,
        facts: &HealthFacts,
        previous: Option<&ScoreHistoryEntry>,
        as_of: NaiveDate,
    ) -> HealthAssessment {
        let priority = self.rules.priority();

        let triage = classify(facts, &self.rules);
        let signals = analyze_diet(facts.diet.as_ref(), &facts.diagnoses);
        let health_score = score_health(
            &ScoreInputs {
                triage: &triage,
                diet: facts.diet.as_ref().map(|_| &signals),
                lifestyle: &facts.lifestyle,
                bmi: facts.bmi,
                nutrients: &facts.nutrients,
                birth_date: facts.birth_date,
            },
            as_of,
        );
        let delta = analyze_delta(previous, &health_score);
        let recommendations = recommend_with_signals(facts, &triage, &signals);

        let explanation = explain(&health_score, &delta, &triage, &recommendations, priority);
        let alerts = generate_alerts(&health_score, &delta, &triage, priority);
        let projections = project_scores(&health_score, &recommendations);
        let clinical_state = reason_clinical_state(facts);

        debug!(
            triage = %triage.triage_level,
            score = health_score.score,
            trend = ?delta.trend,
            alerts = alerts.len(),
            "evaluation complete"
        );

        HealthAssessment {
            triage,
            health_score,
            delta,
            explanation,
            alerts,
            projections,
            recommendations,
            clinical_state,
        }
    }
}
