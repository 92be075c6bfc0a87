use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::assessment::domain::{IndividualId, ProfileSubmission};
use crate::assessment::repository::{
    DietAnalysisRepository, ProfileRepository, RepositoryError, ScoreHistoryRepository,
};
use crate::assessment::{assessment_router, HealthAssessmentService};
use crate::pipeline::delta::ScoreHistoryEntry;
use crate::pipeline::facts::{
    AlcoholLevel, DietProfile, Frequency, IntakeLevel, SmokingSeverity, SymptomEntry,
};
use crate::pipeline::recommendations::DietAnalysis;
use crate::pipeline::triage::RuleTable;
use crate::pipeline::HealthPipeline;

pub(super) type MemoryService =
    HealthAssessmentService<MemoryProfiles, MemoryHistory, MemoryDietAnalyses>;

pub(super) fn rule_table() -> RuleTable {
    RuleTable::from_json_str(
        &json!({
            "triage_levels_priority": ["EMERGENCY", "HIGH_RISK", "MODERATE", "LOW"],
            "rules": [
                {
                    "id": "diverticulitis_acute_abdomen",
                    "level": "EMERGENCY",
                    "conditions": {
                        "diagnoses": ["diverticulitis"],
                        "symptoms": { "pain_severity_gte": 8, "fever": true }
                    }
                },
                {
                    "id": "heavy_smoking",
                    "level": "MODERATE",
                    "conditions": { "lifestyle": { "smoking": true, "smoking_severity": "heavy" } }
                }
            ]
        })
        .to_string(),
    )
    .expect("fixture rules compile")
}

pub(super) fn pipeline() -> HealthPipeline {
    HealthPipeline::new(Arc::new(rule_table()))
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn individual() -> IndividualId {
    IndividualId::from("ind-0001")
}

pub(super) fn profile() -> ProfileSubmission {
    ProfileSubmission {
        smoking: Some(false),
        alcohol: Some(AlcoholLevel::Low),
        height_cm: Some(180.0),
        weight_kg: Some(72.9),
        birth_date: NaiveDate::from_ymd_opt(1995, 4, 12),
        ..ProfileSubmission::default()
    }
}

pub(super) fn heavy_smoker_profile() -> ProfileSubmission {
    ProfileSubmission {
        smoking: Some(true),
        smoking_severity: Some(SmokingSeverity::Heavy),
        alcohol: Some(AlcoholLevel::High),
        ..profile()
    }
}

pub(super) fn diet_profile() -> DietProfile {
    DietProfile {
        fast_food_frequency: Some(Frequency::Daily),
        sugar_level: Some(IntakeLevel::High),
        vegetables_frequency: Some(Frequency::Rare),
        ..DietProfile::default()
    }
}

pub(super) fn symptom(name: &str, severity: i32, recorded_at: Option<DateTime<Utc>>) -> SymptomEntry {
    SymptomEntry {
        name: name.to_string(),
        severity,
        recorded_at,
    }
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryProfiles>,
    Arc<MemoryHistory>,
    Arc<MemoryDietAnalyses>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let history = Arc::new(MemoryHistory::default());
    let diets = Arc::new(MemoryDietAnalyses::default());
    let service =
        HealthAssessmentService::new(pipeline(), profiles.clone(), history.clone(), diets.clone());
    (service, profiles, history, diets)
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    records: Arc<Mutex<HashMap<IndividualId, ProfileSubmission>>>,
}

impl ProfileRepository for MemoryProfiles {
    fn get(&self, id: &IndividualId) -> Result<Option<ProfileSubmission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn put(&self, id: &IndividualId, profile: ProfileSubmission) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(id.clone(), profile);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryHistory {
    entries: Arc<Mutex<HashMap<IndividualId, Vec<ScoreHistoryEntry>>>>,
}

impl MemoryHistory {
    pub(super) fn entries(&self, id: &IndividualId) -> Vec<ScoreHistoryEntry> {
        self.entries
            .lock()
            .expect("history mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default()
    }
}

impl ScoreHistoryRepository for MemoryHistory {
    fn latest(&self, id: &IndividualId) -> Result<Option<ScoreHistoryEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("history mutex poisoned");
        Ok(guard.get(id).and_then(|entries| entries.last().cloned()))
    }

    fn append(&self, id: &IndividualId, entry: ScoreHistoryEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("history mutex poisoned");
        guard.entry(id.clone()).or_default().push(entry);
        Ok(())
    }

    fn list(&self, id: &IndividualId) -> Result<Vec<ScoreHistoryEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("history mutex poisoned");
        Ok(guard.get(id).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDietAnalyses {
    records: Arc<Mutex<HashMap<IndividualId, DietAnalysis>>>,
}

impl MemoryDietAnalyses {
    pub(super) fn get(&self, id: &IndividualId) -> Option<DietAnalysis> {
        self.records
            .lock()
            .expect("diet mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl DietAnalysisRepository for MemoryDietAnalyses {
    fn upsert(&self, id: &IndividualId, analysis: DietAnalysis) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("diet mutex poisoned")
            .insert(id.clone(), analysis);
        Ok(())
    }
}

pub(super) struct UnavailableHistory;

impl ScoreHistoryRepository for UnavailableHistory {
    fn latest(&self, _id: &IndividualId) -> Result<Option<ScoreHistoryEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append(&self, _id: &IndividualId, _entry: ScoreHistoryEntry) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _id: &IndividualId) -> Result<Vec<ScoreHistoryEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assessment_router_with_service(service: MemoryService) -> axum::Router {
    assessment_router(Arc::new(service))
}
