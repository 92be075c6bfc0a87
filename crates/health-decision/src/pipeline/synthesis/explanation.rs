use serde::{Deserialize, Serialize};

use crate::pipeline::delta::{HealthDelta, Trend};
use crate::pipeline::recommendations::RecommendationBundle;
use crate::pipeline::scoring::{HealthScore, RiskLabel, ScoreAxis};
use crate::pipeline::triage::{LevelPriority, TriageLevel, TriageResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationDriver {
    pub factor: ScoreAxis,
    pub impact: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub main_drivers: Vec<ExplanationDriver>,
    pub what_hurts_most: Vec<String>,
    pub what_helps_fastest: Vec<String>,
    pub urgency: Urgency,
}

pub fn explain(
    score: &HealthScore,
    delta: &HealthDelta,
    triage: &TriageResult,
    recommendations: &RecommendationBundle,
    priority: &LevelPriority,
) -> Explanation {
    let mut summary = format!("Health score: {} ({}).", score.score, score.label.as_str());
    match delta.trend {
        Trend::Declining => summary.push_str(" Risk profile is worsening."),
        Trend::Improving => summary.push_str(" Risk profile is improving."),
        Trend::Stable | Trend::Baseline => {}
    }

    let main_drivers = score
        .breakdown
        .axes()
        .filter(|(_, impact)| *impact < 0)
        .map(|(factor, impact)| ExplanationDriver { factor, impact })
        .collect();

    let breakdown = &score.breakdown;
    let mut what_hurts_most = Vec::new();
    if breakdown.triage <= -30 {
        what_hurts_most.push("High clinical risk requires prioritized medical attention".to_string());
    }
    if breakdown.lifestyle <= -15 {
        what_hurts_most.push(
            "Smoking and/or alcohol use significantly increase overall health risk".to_string(),
        );
    }
    if breakdown.metabolic <= -10 {
        what_hurts_most
            .push("Metabolic stress is contributing to elevated risk levels".to_string());
    }

    let plan = &recommendations.recommendations;
    let mut what_helps_fastest = Vec::new();
    if plan.lifestyle_mentions("alcohol") {
        what_helps_fastest.push(
            "Alcohol cessation can lead to measurable short-term improvement in health score"
                .to_string(),
        );
    }
    if plan.lifestyle_mentions("smoking") {
        what_helps_fastest.push("Smoking cessation can significantly reduce overall risk".to_string());
    }

    let urgent = priority.is_at_least(&triage.triage_level, &TriageLevel::HighRisk)
        || score.label == RiskLabel::Critical;

    Explanation {
        summary,
        main_drivers,
        what_hurts_most,
        what_helps_fastest,
        urgency: if urgent { Urgency::High } else { Urgency::Normal },
    }
}
