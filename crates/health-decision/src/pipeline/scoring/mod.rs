//! Composite 0-100 health risk score with an auditable per-axis breakdown.

mod lifestyle;
mod metabolic;

pub use lifestyle::{age_behavior_factor, months_since, nicotine_penalty, recovery_factor};
pub use metabolic::{age_penalty, bmi_penalty};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::diet::DietSignals;
use super::facts::{age_on, Lifestyle, NutrientReading, NutrientStatus, NutrientValue};
use super::triage::{TriageLevel, TriageResult};

const BASE_SCORE: i32 = 100;

/// Named axis of the score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAxis {
    Triage,
    Diet,
    Lifestyle,
    Metabolic,
    Nutrients,
}

impl ScoreAxis {
    pub const ALL: [ScoreAxis; 5] = [
        ScoreAxis::Triage,
        ScoreAxis::Diet,
        ScoreAxis::Lifestyle,
        ScoreAxis::Metabolic,
        ScoreAxis::Nutrients,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ScoreAxis::Triage => "triage",
            ScoreAxis::Diet => "diet",
            ScoreAxis::Lifestyle => "lifestyle",
            ScoreAxis::Metabolic => "metabolic",
            ScoreAxis::Nutrients => "nutrients",
        }
    }
}

/// Signed penalty per axis. `score == clamp(100 + total(), 0, 100)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBreakdown {
    pub triage: i32,
    pub diet: i32,
    pub lifestyle: i32,
    pub metabolic: i32,
    pub nutrients: i32,
}

impl ScoreBreakdown {
    pub fn get(&self, axis: ScoreAxis) -> i32 {
        match axis {
            ScoreAxis::Triage => self.triage,
            ScoreAxis::Diet => self.diet,
            ScoreAxis::Lifestyle => self.lifestyle,
            ScoreAxis::Metabolic => self.metabolic,
            ScoreAxis::Nutrients => self.nutrients,
        }
    }

    pub fn axes(&self) -> impl Iterator<Item = (ScoreAxis, i32)> + '_ {
        ScoreAxis::ALL.into_iter().map(|axis| (axis, self.get(axis)))
    }

    pub fn total(&self) -> i32 {
        self.axes().map(|(_, value)| value).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLabel {
    LowRisk,
    ModerateRisk,
    HighRisk,
    Critical,
}

impl RiskLabel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => RiskLabel::LowRisk,
            55..=79 => RiskLabel::ModerateRisk,
            35..=54 => RiskLabel::HighRisk,
            _ => RiskLabel::Critical,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "LOW_RISK",
            RiskLabel::ModerateRisk => "MODERATE_RISK",
            RiskLabel::HighRisk => "HIGH_RISK",
            RiskLabel::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u8,
    pub label: RiskLabel,
    pub breakdown: ScoreBreakdown,
}

/// Everything the scorer reads, borrowed from upstream stage outputs and the facts.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub triage: &'a TriageResult,
    pub diet: Option<&'a DietSignals>,
    pub lifestyle: &'a Lifestyle,
    pub bmi: Option<f64>,
    pub nutrients: &'a [NutrientReading],
    pub birth_date: Option<NaiveDate>,
}

pub fn score_health(inputs: &ScoreInputs<'_>, as_of: NaiveDate) -> HealthScore {
    let age = inputs.birth_date.and_then(|birth| age_on(birth, as_of));

    let breakdown = ScoreBreakdown {
        triage: triage_axis(&inputs.triage.triage_level),
        diet: inputs.diet.map(diet_axis).unwrap_or(0),
        lifestyle: lifestyle::lifestyle_axis(inputs.lifestyle, age, as_of),
        metabolic: metabolic::metabolic_axis(inputs.bmi, age),
        nutrients: nutrients_axis(inputs.nutrients),
    };

    let score = (BASE_SCORE + breakdown.total()).clamp(0, 100) as u8;
    let label = RiskLabel::from_score(score);
    debug!(score, label = label.as_str(), ?breakdown, "health score computed");

    HealthScore {
        score,
        label,
        breakdown,
    }
}

fn triage_axis(level: &TriageLevel) -> i32 {
    match level {
        TriageLevel::Emergency => -60,
        TriageLevel::HighRisk => -35,
        TriageLevel::Moderate => -15,
        TriageLevel::Low | TriageLevel::Other(_) => 0,
    }
}

fn diet_axis(signals: &DietSignals) -> i32 {
    let risks = signals.diet_risks.len() as i32 * 5;
    let warnings = signals.diet_warnings.len() as i32 * 3;
    let gaps = signals.diet_gaps.len() as i32 * 4;
    -(risks + warnings + gaps)
}

fn nutrients_axis(nutrients: &[NutrientReading]) -> i32 {
    nutrients
        .iter()
        .map(|reading| match reading.value {
            NutrientValue::Status(NutrientStatus::Deficient) => -3,
            NutrientValue::Status(NutrientStatus::Excess) => -2,
            _ => 0,
        })
        .sum()
}
