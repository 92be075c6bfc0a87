use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pipeline::facts::{
    AlcoholLevel, DietProfile, NutrientReading, SmokingSeverity, SymptomEntry, VapingLevel,
};

/// Identifier wrapper for tracked individuals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndividualId(pub String);

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IndividualId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Raw profile as stored for an individual.
///
/// Smoking status, alcohol level, height, weight, and birth date are required before the
/// profile can be evaluated. They stay optional here so incomplete profiles can still be
/// stored while the individual finishes onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSubmission {
    pub smoking: Option<bool>,
    pub smoking_severity: Option<SmokingSeverity>,
    pub smoking_years: Option<u32>,
    pub cigarettes_per_day: Option<u32>,
    pub smoking_quit_date: Option<NaiveDate>,
    pub vaping: Option<VapingLevel>,
    pub vaping_quit_date: Option<NaiveDate>,
    pub alcohol: Option<AlcoholLevel>,
    pub alcohol_units_per_week: Option<f64>,
    pub alcohol_frequency: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub birth_date: Option<NaiveDate>,
    pub diagnoses: Vec<String>,
    pub symptoms: Vec<SymptomEntry>,
    pub medications: Vec<String>,
    pub supplements: Vec<String>,
    pub nutrients: Vec<NutrientReading>,
    pub diet: Option<DietProfile>,
}
