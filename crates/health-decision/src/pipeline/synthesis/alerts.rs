use serde::{Deserialize, Serialize};

use crate::pipeline::delta::HealthDelta;
use crate::pipeline::scoring::HealthScore;
use crate::pipeline::triage::{LevelPriority, TriageLevel, TriageResult};

const RAPID_DECLINE: i32 = -10;
const LOW_SCORE: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Urgent,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAlert {
    pub level: AlertLevel,
    pub code: String,
    pub message: String,
}

impl HealthAlert {
    fn new(level: AlertLevel, code: &str, message: &str) -> Self {
        Self {
            level,
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// The urgent alert fires for `HIGH_RISK` or anything the priority list ranks above it,
/// including the table's most severe level.
pub fn generate_alerts(
    score: &HealthScore,
    delta: &HealthDelta,
    triage: &TriageResult,
    priority: &LevelPriority,
) -> Vec<HealthAlert> {
    let mut alerts = Vec::new();
    let level = &triage.triage_level;

    let most_severe = priority.most_severe() == Some(level) && *level != TriageLevel::Low;
    if most_severe || priority.is_at_least(level, &TriageLevel::HighRisk) {
        alerts.push(HealthAlert::new(
            AlertLevel::Urgent,
            "ALERT_HIGH_CLINICAL_RISK",
            "High clinical risk detected. Medical follow-up is strongly recommended.",
        ));
    }

    if delta.delta <= RAPID_DECLINE {
        alerts.push(HealthAlert::new(
            AlertLevel::Warning,
            "ALERT_RAPID_DECLINE",
            "Health score is declining significantly over a short period.",
        ));
    }

    if score.score <= LOW_SCORE {
        alerts.push(HealthAlert::new(
            AlertLevel::Warning,
            "ALERT_LOW_SCORE",
            "Overall health score is in a high-risk range.",
        ));
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::delta::Trend;
    use crate::pipeline::scoring::{RiskLabel, ScoreBreakdown};

    fn score(value: u8) -> HealthScore {
        HealthScore {
            score: value,
            label: RiskLabel::from_score(value),
            breakdown: ScoreBreakdown::default(),
        }
    }

    fn triage(level: TriageLevel) -> TriageResult {
        TriageResult {
            triage_level: level,
            ..TriageResult::low()
        }
    }

    fn delta(value: i32) -> HealthDelta {
        HealthDelta {
            delta: value,
            trend: Trend::Declining,
            drivers: Vec::new(),
        }
    }

    fn codes(alerts: &[HealthAlert]) -> Vec<&str> {
        alerts.iter().map(|alert| alert.code.as_str()).collect()
    }

    #[test]
    fn decline_from_72_to_60_warns() {
        let alerts = generate_alerts(
            &score(60),
            &delta(-12),
            &triage(TriageLevel::Moderate),
            &LevelPriority::default(),
        );
        assert_eq!(codes(&alerts), vec!["ALERT_RAPID_DECLINE"]);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
    }

    #[test]
    fn high_risk_and_emergency_are_urgent() {
        for level in [TriageLevel::HighRisk, TriageLevel::Emergency] {
            let alerts = generate_alerts(
                &score(70),
                &HealthDelta::baseline(),
                &triage(level),
                &LevelPriority::default(),
            );
            assert_eq!(codes(&alerts), vec!["ALERT_HIGH_CLINICAL_RISK"]);
            assert_eq!(alerts[0].level, AlertLevel::Urgent);
        }
    }

    #[test]
    fn custom_most_severe_level_is_urgent() {
        let priority = LevelPriority::new(vec![
            TriageLevel::from("CRITICAL_CARE"),
            TriageLevel::Moderate,
            TriageLevel::Low,
        ]);
        let alerts = generate_alerts(
            &score(70),
            &HealthDelta::baseline(),
            &triage(TriageLevel::from("CRITICAL_CARE")),
            &priority,
        );
        assert_eq!(codes(&alerts), vec!["ALERT_HIGH_CLINICAL_RISK"]);
    }

    #[test]
    fn low_score_warns_at_boundary() {
        let alerts = generate_alerts(
            &score(40),
            &delta(-9),
            &triage(TriageLevel::Low),
            &LevelPriority::default(),
        );
        assert_eq!(codes(&alerts), vec!["ALERT_LOW_SCORE"]);
        assert!(generate_alerts(
            &score(41),
            &HealthDelta::baseline(),
            &triage(TriageLevel::Low),
            &LevelPriority::default()
        )
        .is_empty());
    }
}
