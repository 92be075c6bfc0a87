use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use health_decision::assessment::{
    assessment_router, DietAnalysisRepository, HealthAssessmentService, ProfileRepository,
    ScoreHistoryRepository,
};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const PROMETHEUS_TEXT_FORMAT: &str = "text/plain; version=0.0.4";

pub(crate) fn with_assessment_routes<P, H, D>(
    service: Arc<HealthAssessmentService<P, H, D>>,
) -> axum::Router
where
    P: ProfileRepository + 'static,
    H: ScoreHistoryRepository + 'static,
    D: DietAnalysisRepository + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the rule table is loaded and the listener is bound.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let (status, label) = if state.readiness.load(Ordering::Acquire) {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    };
    (status, Json(json!({ "status": label })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let body = state.metrics.render();
    ([(header::CONTENT_TYPE, PROMETHEUS_TEXT_FORMAT)], body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryDietAnalyses, InMemoryProfileRepository, InMemoryScoreHistory};
    use axum::body::Body;
    use axum::http::Request;
    use health_decision::pipeline::triage::RuleTable;
    use health_decision::pipeline::HealthPipeline;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let table = RuleTable::from_json_str(r#"{"triage_levels_priority":["LOW"],"rules":[]}"#)
            .expect("rules compile");
        let service = Arc::new(HealthAssessmentService::new(
            HealthPipeline::new(Arc::new(table)),
            Arc::new(InMemoryProfileRepository::default()),
            Arc::new(InMemoryScoreHistory::default()),
            Arc::new(InMemoryDietAnalyses::default()),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_assessment_routes(service).layer(Extension(state))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        for (ready, expected) in [
            (false, StatusCode::SERVICE_UNAVAILABLE),
            (true, StatusCode::OK),
        ] {
            let response = app(ready)
                .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
                .await
                .expect("route executes");
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn assessment_routes_are_mounted() {
        let response = app(true)
            .oneshot(
                Request::get("/api/v1/individuals/ind-1/score-history")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
