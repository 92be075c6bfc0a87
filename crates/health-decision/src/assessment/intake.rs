use std::cmp::Reverse;

use super::domain::ProfileSubmission;
use crate::pipeline::facts::{body_mass_index, HealthFacts, Lifestyle};

const DEFAULT_SYMPTOM_WINDOW: usize = 5;

/// Raised when a stored profile cannot be turned into facts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("profile is missing required field '{0}'")]
    MissingProfileField(&'static str),
}

/// Builds immutable [`HealthFacts`] from raw profiles.
#[derive(Debug, Clone)]
pub struct FactsIntake {
    symptom_window: usize,
}

impl Default for FactsIntake {
    fn default() -> Self {
        Self::with_symptom_window(DEFAULT_SYMPTOM_WINDOW)
    }
}

impl FactsIntake {
    pub fn with_symptom_window(symptom_window: usize) -> Self {
        Self { symptom_window }
    }

    pub fn facts_from_submission(
        &self,
        submission: ProfileSubmission,
    ) -> Result<HealthFacts, IntakeError> {
        let smoking = submission
            .smoking
            .ok_or(IntakeError::MissingProfileField("smoking"))?;
        let alcohol = submission
            .alcohol
            .ok_or(IntakeError::MissingProfileField("alcohol"))?;
        let height_cm = submission
            .height_cm
            .ok_or(IntakeError::MissingProfileField("height_cm"))?;
        let weight_kg = submission
            .weight_kg
            .ok_or(IntakeError::MissingProfileField("weight_kg"))?;
        let birth_date = submission
            .birth_date
            .ok_or(IntakeError::MissingProfileField("birth_date"))?;

        let lifestyle = Lifestyle {
            smoking,
            smoking_severity: submission.smoking_severity.unwrap_or_default(),
            smoking_years: submission.smoking_years,
            cigarettes_per_day: submission.cigarettes_per_day,
            smoking_quit_date: submission.smoking_quit_date,
            vaping: submission.vaping.unwrap_or_default(),
            vaping_quit_date: submission.vaping_quit_date,
            alcohol,
            alcohol_units_per_week: submission.alcohol_units_per_week,
            alcohol_frequency: submission.alcohol_frequency,
        };

        // Undated entries sort after dated ones; the sort is stable.
        let mut symptoms = submission.symptoms;
        symptoms.sort_by_key(|entry| Reverse(entry.recorded_at));
        symptoms.truncate(self.symptom_window);

        Ok(HealthFacts {
            diagnoses: submission.diagnoses.into_iter().collect(),
            symptoms,
            lifestyle,
            bmi: body_mass_index(Some(height_cm), Some(weight_kg)),
            birth_date: Some(birth_date),
            medications: submission.medications.into_iter().collect(),
            supplements: submission.supplements.into_iter().collect(),
            nutrients: submission.nutrients,
            diet: submission.diet,
        })
    }
}
