use super::domain::{IndividualId, ProfileSubmission};
use crate::pipeline::delta::ScoreHistoryEntry;
use crate::pipeline::recommendations::DietAnalysis;

/// Raw profile storage keyed by individual.
pub trait ProfileRepository: Send + Sync {
    fn get(&self, id: &IndividualId) -> Result<Option<ProfileSubmission>, RepositoryError>;
    fn put(&self, id: &IndividualId, profile: ProfileSubmission) -> Result<(), RepositoryError>;
}

/// Append-only score history. `list` returns entries oldest first.
pub trait ScoreHistoryRepository: Send + Sync {
    fn latest(&self, id: &IndividualId) -> Result<Option<ScoreHistoryEntry>, RepositoryError>;
    fn append(&self, id: &IndividualId, entry: ScoreHistoryEntry) -> Result<(), RepositoryError>;
    fn list(&self, id: &IndividualId) -> Result<Vec<ScoreHistoryEntry>, RepositoryError>;
}

/// Latest diet analysis per individual.
pub trait DietAnalysisRepository: Send + Sync {
    fn upsert(&self, id: &IndividualId, analysis: DietAnalysis) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
