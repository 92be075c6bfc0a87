use serde::{Deserialize, Serialize};

use crate::pipeline::recommendations::RecommendationBundle;
use crate::pipeline::scoring::HealthScore;

const TIMEFRAME_DAYS: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectedAction {
    AlcoholCessation,
    SmokingCessation,
    PhysicalActivity,
}

impl ProjectedAction {
    const fn keyword(self) -> &'static str {
        match self {
            Self::AlcoholCessation => "alcohol",
            Self::SmokingCessation => "smoking",
            Self::PhysicalActivity => "physical",
        }
    }

    const fn expected_change(self) -> i32 {
        match self {
            Self::AlcoholCessation => 10,
            Self::SmokingCessation => 8,
            Self::PhysicalActivity => 5,
        }
    }

    const fn confidence(self) -> ProjectionConfidence {
        match self {
            Self::AlcoholCessation | Self::SmokingCessation => ProjectionConfidence::Medium,
            Self::PhysicalActivity => ProjectionConfidence::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionConfidence {
    Low,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreProjection {
    pub action: ProjectedAction,
    pub timeframe_days: u16,
    pub expected_score_change: i32,
    pub projected_score: u8,
    pub confidence: ProjectionConfidence,
}

/// What-if projections for behavior changes the bundle already recommends.
pub fn project_scores(
    score: &HealthScore,
    recommendations: &RecommendationBundle,
) -> Vec<ScoreProjection> {
    [
        ProjectedAction::AlcoholCessation,
        ProjectedAction::SmokingCessation,
        ProjectedAction::PhysicalActivity,
    ]
    .into_iter()
    .filter(|action| {
        recommendations
            .recommendations
            .lifestyle_mentions(action.keyword())
    })
    .map(|action| {
        let change = action.expected_change();
        ScoreProjection {
            action,
            timeframe_days: TIMEFRAME_DAYS,
            expected_score_change: change,
            projected_score: (i32::from(score.score) + change).min(100) as u8,
            confidence: action.confidence(),
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::recommendations::RecommendationSet;
    use crate::pipeline::scoring::{RiskLabel, ScoreBreakdown};

    fn score(value: u8) -> HealthScore {
        HealthScore {
            score: value,
            label: RiskLabel::from_score(value),
            breakdown: ScoreBreakdown::default(),
        }
    }

    fn bundle(lifestyle: &[&str]) -> RecommendationBundle {
        RecommendationBundle {
            recommendations: RecommendationSet {
                lifestyle: lifestyle.iter().map(|entry| entry.to_string()).collect(),
                ..RecommendationSet::default()
            },
            ..RecommendationBundle::default()
        }
    }

    #[test]
    fn projects_each_detected_behavior() {
        let projections = project_scores(
            &score(60),
            &bundle(&[
                "Eliminate alcohol",
                "Stop smoking",
                "Increase physical activity to 150 minutes per week",
            ]),
        );
        let actions: Vec<ProjectedAction> = projections.iter().map(|p| p.action).collect();
        assert_eq!(
            actions,
            vec![
                ProjectedAction::AlcoholCessation,
                ProjectedAction::SmokingCessation,
                ProjectedAction::PhysicalActivity,
            ]
        );
        assert_eq!(projections[0].projected_score, 70);
        assert_eq!(projections[1].projected_score, 68);
        assert_eq!(projections[2].confidence, ProjectionConfidence::Low);
        assert!(projections.iter().all(|p| p.timeframe_days == 30));
    }

    #[test]
    fn projected_score_is_capped() {
        let projections = project_scores(&score(95), &bundle(&["Eliminate alcohol"]));
        assert_eq!(projections.len(), 1);
        assert_eq!(projections[0].projected_score, 100);
        assert_eq!(projections[0].expected_score_change, 10);
    }

    #[test]
    fn nothing_to_project_without_matching_advice() {
        assert!(project_scores(&score(80), &bundle(&["Sleep optimization"])).is_empty());
    }
}
