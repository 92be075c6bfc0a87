use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessment::HealthAssessmentService;

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn profile_then_assessment_round_trip() {
    let (service, _, _, _) = build_service();
    let router = assessment_router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/individuals/ind-0001/profile",
            serde_json::to_value(heavy_smoker_profile()).expect("profile serializes"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/individuals/ind-0001/assessments",
            json!({}),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["triage"]["triage_level"], "MODERATE");
    assert_eq!(payload["delta"]["trend"], "BASELINE");
    assert!(payload["health_score"]["score"].is_u64());

    let response = router
        .oneshot(
            Request::get("/api/v1/individuals/ind-0001/score-history")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["individual_id"], "ind-0001");
    assert_eq!(payload["entries"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn assessment_for_unknown_individual_is_not_found() {
    let (service, _, _, _) = build_service();
    let router = assessment_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/individuals/nobody/assessments",
            json!({}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_profile_is_unprocessable() {
    let (service, _, _, _) = build_service();
    let service = Arc::new(service);
    service
        .put_profile(
            &individual(),
            crate::assessment::ProfileSubmission {
                smoking: None,
                ..profile()
            },
        )
        .expect("profile stored");

    let response = crate::assessment::router::assessment_handler::<
        MemoryProfiles,
        MemoryHistory,
        MemoryDietAnalyses,
    >(State(service), Path("ind-0001".to_string()))
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("smoking")));
}

#[tokio::test]
async fn history_outage_is_internal_error() {
    let service = Arc::new(HealthAssessmentService::new(
        pipeline(),
        Arc::new(MemoryProfiles::default()),
        Arc::new(UnavailableHistory),
        Arc::new(MemoryDietAnalyses::default()),
    ));

    let response = crate::assessment::router::history_handler::<
        MemoryProfiles,
        UnavailableHistory,
        MemoryDietAnalyses,
    >(State(service), Path("ind-0001".to_string()))
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn stateless_evaluate_uses_supplied_previous_entry() {
    let (service, _, _, _) = build_service();
    let router = assessment_router_with_service(service);

    let body = json!({
        "facts": {
            "diagnoses": ["diverticulitis"],
            "symptoms": [
                { "name": "abdominal_pain", "severity": 9 },
                { "name": "fever", "severity": 5 }
            ],
            "lifestyle": { "smoking": false, "alcohol": "low" }
        },
        "previous": {
            "score": 72,
            "label": "MODERATE_RISK",
            "breakdown": { "triage": -15, "diet": 0, "lifestyle": -13, "metabolic": 0, "nutrients": 0 },
            "triage_level": "MODERATE",
            "created_at": "2026-09-01T09:30:00Z"
        },
        "as_of": "2026-10-16"
    });

    let response = router
        .oneshot(json_request("POST", "/api/v1/assessments/evaluate", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["triage"]["triage_level"], "EMERGENCY");
    assert_eq!(payload["triage"]["reasons"], json!(["diverticulitis_acute_abdomen"]));
    assert_eq!(payload["health_score"]["score"], 40);
    assert_eq!(payload["delta"]["delta"], -32);
    assert_eq!(payload["delta"]["trend"], "DECLINING");
    assert_eq!(payload["explanation"]["urgency"], "high");
    let codes: Vec<&str> = payload["alerts"]
        .as_array()
        .expect("alerts array")
        .iter()
        .filter_map(|alert| alert["code"].as_str())
        .collect();
    assert_eq!(
        codes,
        vec!["ALERT_HIGH_CLINICAL_RISK", "ALERT_RAPID_DECLINE", "ALERT_LOW_SCORE"]
    );
}
