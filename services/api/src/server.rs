use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDietAnalyses, InMemoryProfileRepository, InMemoryScoreHistory};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use health_decision::assessment::HealthAssessmentService;
use health_decision::config::AppConfig;
use health_decision::error::AppError;
use health_decision::pipeline::triage::RuleTable;
use health_decision::pipeline::HealthPipeline;
use health_decision::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let rules_path = &config.pipeline.triage_rules_path;
    let table = RuleTable::load(rules_path)?;
    info!(
        path = %rules_path.display(),
        rules = table.rules().len(),
        "triage rule table loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(HealthAssessmentService::new(
        HealthPipeline::new(Arc::new(table)),
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryScoreHistory::default()),
        Arc::new(InMemoryDietAnalyses::default()),
    ));

    let app = with_assessment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.as_str(),
        %addr,
        "health decision service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
