//! Recommendation bundles.
//!
//! The triage level picks a base bundle; diagnosis, lifestyle, BMI, medication, and diet
//! overlays are layered on top. Emergency triage short-circuits to the urgent bundle only.
//! Every list has set semantics: an entry already present is never added twice.

use serde::{Deserialize, Serialize};

use super::diet::{
    analyze_diet, characterize_diet, DietCharacterization, DietSignals, LOW_FIBER_INTAKE,
    LOW_MICRONUTRIENT_DIVERSITY, LOW_PROTEIN_INTAKE,
};
use super::facts::{AlcoholLevel, HealthFacts, SmokingSeverity, VapingLevel};
use super::triage::{TriageLevel, TriageResult};

const AUTOIMMUNE_DIAGNOSES: &[&str] = &["psoriasis", "hashimoto", "rheumatoid_arthritis", "lupus"];
const GASTRIC_DIAGNOSES: &[&str] = &["peptic_ulcer", "gastritis"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub nutrition: Vec<String>,
    pub supplements: Vec<String>,
    pub lifestyle: Vec<String>,
    pub monitoring: Vec<String>,
}

impl RecommendationSet {
    /// Case-insensitive keyword scan over the lifestyle entries.
    pub fn lifestyle_mentions(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.lifestyle
            .iter()
            .any(|entry| entry.to_lowercase().contains(&keyword))
    }
}

/// Diet signals plus the derived characterization, persisted per individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietAnalysis {
    #[serde(flatten)]
    pub signals: DietSignals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characterization: Option<DietCharacterization>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub risk_summary: Vec<String>,
    pub recommendations: RecommendationSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet_analysis: Option<DietAnalysis>,
}

impl RecommendationBundle {
    fn risk(&mut self, code: &str) {
        push_unique(&mut self.risk_summary, code);
    }

    fn nutrition(&mut self, entry: &str) {
        push_unique(&mut self.recommendations.nutrition, entry);
    }

    fn supplement(&mut self, entry: &str) {
        push_unique(&mut self.recommendations.supplements, entry);
    }

    fn lifestyle(&mut self, entry: &str) {
        push_unique(&mut self.recommendations.lifestyle, entry);
    }

    fn monitoring(&mut self, entry: &str) {
        push_unique(&mut self.recommendations.monitoring, entry);
    }
}

fn push_unique(list: &mut Vec<String>, entry: &str) {
    if !list.iter().any(|existing| existing == entry) {
        list.push(entry.to_string());
    }
}

/// Builds the bundle, analyzing the diet profile on the way.
pub fn recommend(facts: &HealthFacts, triage: &TriageResult) -> RecommendationBundle {
    let signals = analyze_diet(facts.diet.as_ref(), &facts.diagnoses);
    recommend_with_signals(facts, triage, &signals)
}

/// Same as [`recommend`] with diet signals already computed upstream.
pub fn recommend_with_signals(
    facts: &HealthFacts,
    triage: &TriageResult,
    signals: &DietSignals,
) -> RecommendationBundle {
    let mut bundle = RecommendationBundle {
        diet_analysis: facts.diet.as_ref().map(|profile| DietAnalysis {
            signals: signals.clone(),
            characterization: characterize_diet(Some(profile)),
        }),
        ..RecommendationBundle::default()
    };

    if triage.triage_level == TriageLevel::Emergency {
        bundle.monitoring("Immediate medical evaluation required");
        bundle.lifestyle("Stop alcohol and smoking immediately");
        bundle.nutrition("Clear fluids only until assessed");
        return bundle;
    }

    base_bundle(&mut bundle, &triage.triage_level);
    diagnosis_overlays(&mut bundle, facts);
    lifestyle_overlays(&mut bundle, facts);

    if facts.bmi.is_some_and(|bmi| bmi >= 25.0) {
        bundle.risk("METABOLIC_RISK");
        bundle.lifestyle("Increase physical activity to 150 minutes per week");
        bundle.nutrition("Reduce refined carbohydrates and portion sizes");
        bundle.monitoring("Fasting glucose and HbA1c");
    }

    if !facts.medications.is_empty() || !facts.supplements.is_empty() {
        bundle.monitoring("Review medication and supplement interactions with a pharmacist");
    }

    diet_overlays(&mut bundle, signals);
    bundle
}

fn base_bundle(bundle: &mut RecommendationBundle, level: &TriageLevel) {
    match level {
        TriageLevel::HighRisk => {
            bundle.monitoring("Gastroenterologist consultation within 1-2 weeks");
            bundle.lifestyle("Eliminate alcohol");
            bundle.lifestyle("Stop smoking");
            bundle.nutrition("Low-acid, low-fat diet");
            bundle.supplement("Probiotics (short-term)");
            bundle.supplement("Zinc carnosine");
        }
        TriageLevel::Moderate => {
            bundle.monitoring("Baseline blood panel (CBC, ferritin, B12, vitamin D)");
            bundle.lifestyle("Stress reduction");
            bundle.lifestyle("Sleep optimization");
            bundle.nutrition("Anti-inflammatory diet");
            bundle.supplement("Omega-3");
            bundle.supplement("Vitamin D");
            bundle.supplement("Zinc");
        }
        TriageLevel::Low => {
            bundle.lifestyle("Maintain activity level");
            bundle.nutrition("Balanced diet");
            bundle.monitoring("Annual check-up");
        }
        TriageLevel::Emergency | TriageLevel::Other(_) => {}
    }
}

fn diagnosis_overlays(bundle: &mut RecommendationBundle, facts: &HealthFacts) {
    if facts.has_any_diagnosis(AUTOIMMUNE_DIAGNOSES) {
        bundle.risk("AUTOIMMUNE_BACKGROUND");
        bundle.risk("CHRONIC_INFLAMMATION");
        bundle.supplement("Curcumin");
        bundle.supplement("Omega-3");
        bundle.monitoring("CRP, ESR");
        bundle.monitoring("Vitamin D recheck in 3 months");
    }

    if facts.has_any_diagnosis(GASTRIC_DIAGNOSES) {
        bundle.risk("GASTRIC_MUCOSA_DAMAGE");
        bundle.nutrition("Avoid NSAIDs, spicy foods, and late-night meals");
        bundle.nutrition("Limit coffee and carbonated drinks");
    }

    if facts.has_diagnosis("diverticulitis") {
        bundle.risk("DIVERTICULAR_DISEASE");
        bundle.nutrition("Low-residue diet during flares, gradual fiber increase in remission");
        bundle.monitoring("Track abdominal pain and fever; seek care if both worsen");
    }
}

fn lifestyle_overlays(bundle: &mut RecommendationBundle, facts: &HealthFacts) {
    let lifestyle = &facts.lifestyle;

    if lifestyle.smoking {
        match lifestyle.smoking_severity {
            SmokingSeverity::Heavy => {
                bundle.lifestyle("Stop smoking with a structured cessation program");
                bundle.supplement("Nicotine replacement therapy (discuss with physician)");
                bundle.monitoring("Annual lung function check");
            }
            SmokingSeverity::Moderate => {
                bundle.lifestyle("Stop smoking: set a quit date within 2 weeks");
            }
            SmokingSeverity::Light | SmokingSeverity::None => {
                bundle.lifestyle("Reduce and stop smoking");
            }
        }
    }

    match lifestyle.vaping {
        VapingLevel::High => {
            bundle.lifestyle("Stop vaping: taper nicotine strength weekly");
        }
        VapingLevel::Moderate => {
            bundle.lifestyle("Cut vaping frequency in half over the next month");
        }
        VapingLevel::Low => {
            bundle.lifestyle("Avoid relapse into regular vaping");
        }
        VapingLevel::None => {}
    }

    match lifestyle.alcohol {
        AlcoholLevel::High => {
            bundle.risk("ALCOHOL_RELATED_RISK");
            bundle.lifestyle("Eliminate alcohol");
            bundle.monitoring("Liver panel (ALT, AST, GGT)");
        }
        AlcoholLevel::Moderate => {
            bundle.lifestyle("Limit alcohol to under 7 units per week");
        }
        AlcoholLevel::Low => {}
    }
}

fn diet_overlays(bundle: &mut RecommendationBundle, signals: &DietSignals) {
    for code in signals.diet_risks.iter().chain(&signals.diet_warnings) {
        bundle.risk(code);
    }

    for gap in &signals.diet_gaps {
        match gap.as_str() {
            LOW_PROTEIN_INTAKE => bundle.nutrition("Add a protein source to every meal"),
            LOW_FIBER_INTAKE => bundle.nutrition("Vegetables with at least two meals a day"),
            LOW_MICRONUTRIENT_DIVERSITY => bundle.nutrition("Two portions of fruit daily"),
            _ => {}
        }
    }
}
