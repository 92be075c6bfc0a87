use chrono::NaiveDate;
use health_decision::assessment::{
    DietAnalysisRepository, IndividualId, ProfileRepository, ProfileSubmission, RepositoryError,
    ScoreHistoryRepository,
};
use health_decision::pipeline::delta::ScoreHistoryEntry;
use health_decision::pipeline::recommendations::DietAnalysis;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<IndividualId, ProfileSubmission>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn get(&self, id: &IndividualId) -> Result<Option<ProfileSubmission>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn put(&self, id: &IndividualId, profile: ProfileSubmission) -> Result<(), RepositoryError> {
        lock(&self.records)?.insert(id.clone(), profile);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreHistory {
    entries: Arc<Mutex<HashMap<IndividualId, Vec<ScoreHistoryEntry>>>>,
}

impl ScoreHistoryRepository for InMemoryScoreHistory {
    fn latest(&self, id: &IndividualId) -> Result<Option<ScoreHistoryEntry>, RepositoryError> {
        Ok(lock(&self.entries)?
            .get(id)
            .and_then(|entries| entries.last().cloned()))
    }

    fn append(&self, id: &IndividualId, entry: ScoreHistoryEntry) -> Result<(), RepositoryError> {
        lock(&self.entries)?.entry(id.clone()).or_default().push(entry);
        Ok(())
    }

    fn list(&self, id: &IndividualId) -> Result<Vec<ScoreHistoryEntry>, RepositoryError> {
        Ok(lock(&self.entries)?.get(id).cloned().unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDietAnalyses {
    records: Arc<Mutex<HashMap<IndividualId, DietAnalysis>>>,
}

impl InMemoryDietAnalyses {
    pub(crate) fn get(&self, id: &IndividualId) -> Option<DietAnalysis> {
        lock(&self.records).ok()?.get(id).cloned()
    }
}

impl DietAnalysisRepository for InMemoryDietAnalyses {
    fn upsert(&self, id: &IndividualId, analysis: DietAnalysis) -> Result<(), RepositoryError> {
        lock(&self.records)?.insert(id.clone(), analysis);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
