//! Assessment service layer: profile intake, storage seams, and the HTTP router.
//!
//! Storage is expressed as traits so the service can run against in-memory adapters in
//! tests and the demo binary, and against a real database elsewhere.

pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{IndividualId, ProfileSubmission};
pub use intake::{FactsIntake, IntakeError};
pub use repository::{
    DietAnalysisRepository, ProfileRepository, RepositoryError, ScoreHistoryRepository,
};
pub use router::{assessment_router, EvaluateRequest};
pub use service::{AssessmentServiceError, HealthAssessmentService};
