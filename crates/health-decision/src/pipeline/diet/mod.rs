//! Diet signal analysis.
//!
//! Each rule looks at the diet profile's own fields (plus one diagnosis overlay) and fires
//! independently; the count of fired rules sets the confidence band.

mod profile;

pub use profile::{characterize_diet, Band, DietCharacterization, FiberDensity, ProteinQuality};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::facts::{DietProfile, Frequency, IntakeLevel};

pub const HIGH_INFLAMMATORY_LOAD: &str = "HIGH_INFLAMMATORY_LOAD";
pub const GASTRO_INFLAMMATION_RISK: &str = "GASTRO_INFLAMMATION_RISK";
pub const METABOLIC_STRESS: &str = "METABOLIC_STRESS";
pub const ULTRA_PROCESSED_EXPOSURE: &str = "ULTRA_PROCESSED_EXPOSURE";
pub const LOW_PROTEIN_INTAKE: &str = "LOW_PROTEIN_INTAKE";
pub const LOW_FIBER_INTAKE: &str = "LOW_FIBER_INTAKE";
pub const LOW_MICRONUTRIENT_DIVERSITY: &str = "LOW_MICRONUTRIENT_DIVERSITY";
pub const MECHANICAL_IRRITATION_RISK: &str = "MECHANICAL_IRRITATION_RISK";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietConfidence {
    #[default]
    Low,
    Medium,
    High,
}

impl DietConfidence {
    pub fn from_fired(fired: usize) -> Self {
        match fired {
            n if n >= 4 => Self::High,
            n if n >= 2 => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietSignals {
    pub diet_risks: Vec<String>,
    pub diet_warnings: Vec<String>,
    pub diet_gaps: Vec<String>,
    pub confidence: DietConfidence,
}

impl DietSignals {
    pub fn fired(&self) -> usize {
        self.diet_risks.len() + self.diet_warnings.len() + self.diet_gaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired() == 0
    }
}

pub fn analyze_diet(profile: Option<&DietProfile>, diagnoses: &BTreeSet<String>) -> DietSignals {
    let Some(profile) = profile else {
        return DietSignals::default();
    };

    let mut signals = DietSignals::default();

    if profile.fast_food_frequency.is_some_and(|f| f.is_frequent()) {
        signals.diet_risks.push(HIGH_INFLAMMATORY_LOAD.to_string());
    }
    if profile
        .fried_food_frequency
        .is_some_and(|f| f == Frequency::Daily)
    {
        signals.diet_risks.push(GASTRO_INFLAMMATION_RISK.to_string());
    }
    if profile.sugar_level == Some(IntakeLevel::High) {
        signals.diet_risks.push(METABOLIC_STRESS.to_string());
    }
    if profile
        .ultra_processed_food_frequency
        .is_some_and(|f| f == Frequency::Daily)
    {
        signals.diet_risks.push(ULTRA_PROCESSED_EXPOSURE.to_string());
    }

    if profile.protein_level == Some(IntakeLevel::Low) {
        signals.diet_gaps.push(LOW_PROTEIN_INTAKE.to_string());
    }
    if profile.vegetables_frequency.is_some_and(|f| f.is_rare()) {
        signals.diet_gaps.push(LOW_FIBER_INTAKE.to_string());
    }
    if profile.fruits_frequency.is_some_and(|f| f.is_rare()) {
        signals.diet_gaps.push(LOW_MICRONUTRIENT_DIVERSITY.to_string());
    }

    if diagnoses.contains("diverticulitis")
        && profile.seeds_nuts_frequency.is_some_and(|f| f.is_frequent())
    {
        signals
            .diet_warnings
            .push(MECHANICAL_IRRITATION_RISK.to_string());
    }

    signals.confidence = DietConfidence::from_fired(signals.fired());
    signals
}
