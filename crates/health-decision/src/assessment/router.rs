use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{IndividualId, ProfileSubmission};
use super::repository::{
    DietAnalysisRepository, ProfileRepository, RepositoryError, ScoreHistoryRepository,
};
use super::service::{AssessmentServiceError, HealthAssessmentService};
use crate::pipeline::delta::ScoreHistoryEntry;
use crate::pipeline::facts::HealthFacts;

/// Body of the stateless evaluation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub facts: HealthFacts,
    #[serde(default)]
    pub previous: Option<ScoreHistoryEntry>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Router builder exposing profile storage, assessments, and score history.
pub fn assessment_router<P, H, D>(service: Arc<HealthAssessmentService<P, H, D>>) -> Router
where
    P: ProfileRepository + 'static,
    H: ScoreHistoryRepository + 'static,
    D: DietAnalysisRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/individuals/:individual_id/profile",
            put(profile_handler::<P, H, D>),
        )
        .route(
            "/api/v1/individuals/:individual_id/assessments",
            post(assessment_handler::<P, H, D>),
        )
        .route(
            "/api/v1/individuals/:individual_id/score-history",
            get(history_handler::<P, H, D>),
        )
        .route("/api/v1/assessments/evaluate", post(evaluate_handler::<P, H, D>))
        .with_state(service)
}

pub(crate) async fn profile_handler<P, H, D>(
    State(service): State<Arc<HealthAssessmentService<P, H, D>>>,
    Path(individual_id): Path<String>,
    axum::Json(profile): axum::Json<ProfileSubmission>,
) -> Response
where
    P: ProfileRepository + 'static,
    H: ScoreHistoryRepository + 'static,
    D: DietAnalysisRepository + 'static,
{
    let id = IndividualId(individual_id);
    match service.put_profile(&id, profile) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn assessment_handler<P, H, D>(
    State(service): State<Arc<HealthAssessmentService<P, H, D>>>,
    Path(individual_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    H: ScoreHistoryRepository + 'static,
    D: DietAnalysisRepository + 'static,
{
    let id = IndividualId(individual_id);
    match service.assess(&id) {
        Ok(assessment) => (StatusCode::CREATED, axum::Json(assessment)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn history_handler<P, H, D>(
    State(service): State<Arc<HealthAssessmentService<P, H, D>>>,
    Path(individual_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    H: ScoreHistoryRepository + 'static,
    D: DietAnalysisRepository + 'static,
{
    let id = IndividualId(individual_id);
    match service.score_history(&id) {
        Ok(entries) => {
            let payload = json!({
                "individual_id": id.0,
                "entries": entries,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn evaluate_handler<P, H, D>(
    State(service): State<Arc<HealthAssessmentService<P, H, D>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    H: ScoreHistoryRepository + 'static,
    D: DietAnalysisRepository + 'static,
{
    let as_of = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let assessment = service.evaluate(&request.facts, request.previous.as_ref(), as_of);
    (StatusCode::OK, axum::Json(assessment)).into_response()
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
