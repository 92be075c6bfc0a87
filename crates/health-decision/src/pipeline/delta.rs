use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::{HealthScore, RiskLabel, ScoreAxis, ScoreBreakdown};
use super::triage::TriageLevel;

const TREND_BAND: i32 = 5;

/// Persisted snapshot of one evaluation. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreHistoryEntry {
    pub score: u8,
    pub label: RiskLabel,
    pub breakdown: ScoreBreakdown,
    pub triage_level: TriageLevel,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Baseline,
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaDriver {
    pub factor: ScoreAxis,
    pub change: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDelta {
    pub delta: i32,
    pub trend: Trend,
    pub drivers: Vec<DeltaDriver>,
}

impl HealthDelta {
    pub fn baseline() -> Self {
        Self {
            delta: 0,
            trend: Trend::Baseline,
            drivers: Vec::new(),
        }
    }
}

pub fn analyze_delta(previous: Option<&ScoreHistoryEntry>, current: &HealthScore) -> HealthDelta {
    let Some(previous) = previous else {
        return HealthDelta::baseline();
    };

    let delta = i32::from(current.score) - i32::from(previous.score);
    let trend = if delta > TREND_BAND {
        Trend::Improving
    } else if delta < -TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let drivers = ScoreAxis::ALL
        .into_iter()
        .filter_map(|axis| {
            let change = current.breakdown.get(axis) - previous.breakdown.get(axis);
            (change != 0).then_some(DeltaDriver {
                factor: axis,
                change,
            })
        })
        .collect();

    HealthDelta {
        delta,
        trend,
        drivers,
    }
}
