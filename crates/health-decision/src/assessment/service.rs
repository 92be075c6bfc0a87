use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use super::domain::{IndividualId, ProfileSubmission};
use super::intake::{FactsIntake, IntakeError};
use super::repository::{
    DietAnalysisRepository, ProfileRepository, RepositoryError, ScoreHistoryRepository,
};
use crate::pipeline::delta::ScoreHistoryEntry;
use crate::pipeline::facts::HealthFacts;
use crate::pipeline::{HealthAssessment, HealthPipeline};

/// Service composing the facts intake, the pipeline, and the storage traits.
pub struct HealthAssessmentService<P, H, D> {
    pipeline: HealthPipeline,
    intake: FactsIntake,
    profiles: Arc<P>,
    history: Arc<H>,
    diets: Arc<D>,
    locks: Mutex<HashMap<IndividualId, Arc<Mutex<()>>>>,
}

impl<P, H, D> HealthAssessmentService<P, H, D>
where
    P: ProfileRepository + 'static,
    H: ScoreHistoryRepository + 'static,
    D: DietAnalysisRepository + 'static,
{
    pub fn new(pipeline: HealthPipeline, profiles: Arc<P>, history: Arc<H>, diets: Arc<D>) -> Self {
        Self::with_intake(pipeline, FactsIntake::default(), profiles, history, diets)
    }

    pub fn with_intake(
        pipeline: HealthPipeline,
        intake: FactsIntake,
        profiles: Arc<P>,
        history: Arc<H>,
        diets: Arc<D>,
    ) -> Self {
        Self {
            pipeline,
            intake,
            profiles,
            history,
            diets,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn pipeline(&self) -> &HealthPipeline {
        &self.pipeline
    }

    /// Store or replace the raw profile. Completeness is checked at assessment time.
    pub fn put_profile(
        &self,
        id: &IndividualId,
        profile: ProfileSubmission,
    ) -> Result<(), AssessmentServiceError> {
        self.profiles.put(id, profile)?;
        Ok(())
    }

    pub fn assess(&self, id: &IndividualId) -> Result<HealthAssessment, AssessmentServiceError> {
        self.assess_at(id, Utc::now())
    }

    /// Evaluate the stored profile and persist exactly one history entry stamped `now`.
    ///
    /// Evaluations for the same individual are serialized so each one sees the entry
    /// written by the one before it.
    pub fn assess_at(
        &self,
        id: &IndividualId,
        now: DateTime<Utc>,
    ) -> Result<HealthAssessment, AssessmentServiceError> {
        // Unknown ids are rejected before they can claim a lock slot.
        let profile = self.profiles.get(id)?.ok_or(RepositoryError::NotFound)?;

        let lock = self.lock_for(id);
        let outcome = {
            let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.record_assessment(id, profile, now)
        };
        self.release_lock(id, lock);
        outcome
    }

    fn record_assessment(
        &self,
        id: &IndividualId,
        profile: ProfileSubmission,
        now: DateTime<Utc>,
    ) -> Result<HealthAssessment, AssessmentServiceError> {
        let facts = self.intake.facts_from_submission(profile).map_err(|err| {
            warn!(individual = %id, error = %err, "profile rejected at intake");
            err
        })?;

        let previous = self.history.latest(id)?;
        let assessment = self
            .pipeline
            .evaluate(&facts, previous.as_ref(), now.date_naive());

        self.history.append(id, assessment.history_entry(now))?;
        if let Some(analysis) = assessment.recommendations.diet_analysis.clone() {
            self.diets.upsert(id, analysis)?;
        }

        info!(
            individual = %id,
            score = assessment.health_score.score,
            label = assessment.health_score.label.as_str(),
            triage = %assessment.triage.triage_level,
            "assessment recorded"
        );
        Ok(assessment)
    }

    pub fn score_history(
        &self,
        id: &IndividualId,
    ) -> Result<Vec<ScoreHistoryEntry>, AssessmentServiceError> {
        Ok(self.history.list(id)?)
    }

    /// Stateless evaluation. Nothing is read from or written to storage.
    pub fn evaluate(
        &self,
        facts: &HealthFacts,
        previous: Option<&ScoreHistoryEntry>,
        as_of: NaiveDate,
    ) -> HealthAssessment {
        self.pipeline.evaluate(facts, previous, as_of)
    }

    fn lock_for(&self, id: &IndividualId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(id.clone()).or_default().clone()
    }

    /// Drops the map slot once no other caller holds or waits on it.
    fn release_lock(&self, id: &IndividualId, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference lives in the map, the other is ours. Ours is dropped while the map is
        // still held so a concurrent release always observes an accurate count.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
        drop(lock);
        drop(locks);
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
