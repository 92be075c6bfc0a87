use serde::{Deserialize, Serialize};

use crate::pipeline::facts::{DietProfile, Frequency, IntakeLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiberDensity {
    Low,
    Adequate,
    High,
}

pub type ProteinQuality = Band;

/// Coarse descriptors of an eating pattern, persisted with the diet analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietCharacterization {
    pub inflammatory_load: Band,
    pub fiber_density: FiberDensity,
    pub glycemic_load: Band,
    pub protein_quality: ProteinQuality,
    pub ultra_processed_ratio: Band,
    pub micronutrient_risk: Band,
}

pub fn characterize_diet(profile: Option<&DietProfile>) -> Option<DietCharacterization> {
    let profile = profile?;

    let vegetables = profile.vegetables_frequency;
    let whole_grains = profile.whole_grains_frequency;
    let fruits = profile.fruits_frequency;
    let processed = profile.ultra_processed_food_frequency;
    let sugar = profile.sugar_level;

    let daily = |value: Option<Frequency>| value == Some(Frequency::Daily);
    let rare = |value: Option<Frequency>| value.is_some_and(Frequency::is_rare);

    let fiber_density = if rare(vegetables) && rare(whole_grains) {
        FiberDensity::Low
    } else if daily(vegetables) && daily(whole_grains) {
        FiberDensity::High
    } else {
        FiberDensity::Adequate
    };

    let inflammatory_load = if daily(processed) || sugar == Some(IntakeLevel::High) {
        Band::High
    } else if rare(processed) && sugar == Some(IntakeLevel::Low) {
        Band::Low
    } else {
        Band::Moderate
    };

    let glycemic_load = match sugar {
        Some(IntakeLevel::High) => Band::High,
        Some(IntakeLevel::Low) => Band::Low,
        _ => Band::Moderate,
    };

    let protein_quality = if rare(profile.fish_frequency) && daily(profile.red_meat_frequency) {
        Band::Low
    } else if profile.fish_frequency == Some(Frequency::Weekly)
        && !daily(profile.red_meat_frequency)
    {
        Band::High
    } else {
        Band::Moderate
    };

    let ultra_processed_ratio = if daily(processed) {
        Band::High
    } else if rare(processed) {
        Band::Low
    } else {
        Band::Moderate
    };

    let micronutrient_risk = if rare(vegetables) && rare(fruits) {
        Band::High
    } else if daily(vegetables) && daily(fruits) {
        Band::Low
    } else {
        Band::Moderate
    };

    Some(DietCharacterization {
        inflammatory_load,
        fiber_density,
        glycemic_load,
        protein_quality,
        ultra_processed_ratio,
        micronutrient_risk,
    })
}
