//! Biological state derived from the facts. Describes, never prescribes.

use serde::{Deserialize, Serialize};

use super::facts::{AlcoholLevel, HealthFacts};

const INFLAMMATORY_DIAGNOSES: &[&str] = &[
    "psoriasis",
    "ibd",
    "crohns",
    "ulcerative_colitis",
    "diverticulitis",
];
const INFLAMMATORY_SYMPTOMS: &[&str] = &["joint_pain", "chronic_fatigue", "skin_flare", "abdominal_pain"];
const AUTOIMMUNE_DIAGNOSES: &[&str] = &["psoriasis", "hashimoto", "rheumatoid_arthritis", "lupus"];
const GUT_DIAGNOSES: &[&str] = &["gastritis", "peptic_ulcer", "diverticulitis", "ibs"];
const GUT_SYMPTOMS: &[&str] = &["bloating", "diarrhea", "constipation", "abdominal_pain", "nausea"];
const STRESS_SYMPTOMS: &[&str] = &["insomnia", "anxiety", "palpitations", "burnout"];
const PSYCHOTROPIC_MEDICATIONS: &[&str] = &["benzodiazepine", "ssri", "snri"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    #[default]
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImmuneLoad {
    #[default]
    Normal,
    Autoimmune,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GutTolerance {
    #[default]
    Normal,
    Sensitive,
    Inflamed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    pub inflammation: Grade,
    pub immune_load: ImmuneLoad,
    pub gut_tolerance: GutTolerance,
    pub metabolic_risk: Grade,
    pub stress_load: Grade,
}

/// Short phrases explaining each axis value, in the order they were inferred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateReasoning {
    pub inflammation: Vec<String>,
    pub immune_load: Vec<String>,
    pub gut_tolerance: Vec<String>,
    pub metabolic_risk: Vec<String>,
    pub stress_load: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalState {
    pub health_state: HealthState,
    pub reasoning: StateReasoning,
}

pub fn reason_clinical_state(facts: &HealthFacts) -> ClinicalState {
    let mut state = HealthState::default();
    let mut reasoning = StateReasoning::default();
    let any_symptom = |names: &[&str]| names.iter().any(|name| facts.has_symptom(name));

    if facts.has_any_diagnosis(INFLAMMATORY_DIAGNOSES) {
        state.inflammation = Grade::High;
        reasoning.inflammation.push("chronic inflammatory diagnosis".into());
    }
    if any_symptom(INFLAMMATORY_SYMPTOMS) {
        state.inflammation = state.inflammation.max(Grade::Moderate);
        reasoning.inflammation.push("inflammatory symptom pattern".into());
    }
    if facts.lifestyle.alcohol == AlcoholLevel::High {
        state.inflammation = Grade::High;
        reasoning.inflammation.push("high alcohol load".into());
    }

    if facts.has_any_diagnosis(AUTOIMMUNE_DIAGNOSES) {
        state.immune_load = ImmuneLoad::Autoimmune;
        reasoning.immune_load.push("autoimmune diagnosis".into());
    }

    if facts.has_any_diagnosis(GUT_DIAGNOSES) {
        state.gut_tolerance = GutTolerance::Inflamed;
        reasoning.gut_tolerance.push("gastrointestinal diagnosis".into());
    } else if any_symptom(GUT_SYMPTOMS) {
        state.gut_tolerance = GutTolerance::Sensitive;
        reasoning.gut_tolerance.push("digestive symptom pattern".into());
    }

    match facts.bmi {
        Some(bmi) if bmi >= 30.0 => {
            state.metabolic_risk = Grade::High;
            reasoning.metabolic_risk.push("obesity range BMI".into());
        }
        Some(bmi) if bmi >= 25.0 => {
            state.metabolic_risk = Grade::Moderate;
            reasoning.metabolic_risk.push("overweight BMI".into());
        }
        _ => {}
    }

    if any_symptom(STRESS_SYMPTOMS) {
        state.stress_load = Grade::Moderate;
        reasoning.stress_load.push("stress-related symptom pattern".into());
    }
    if PSYCHOTROPIC_MEDICATIONS
        .iter()
        .any(|medication| facts.medications.contains(*medication))
    {
        state.stress_load = Grade::High;
        reasoning.stress_load.push("psychotropic medication use".into());
    }

    ClinicalState {
        health_state: state,
        reasoning,
    }
}
