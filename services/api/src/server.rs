use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryFeedbackRepository, InMemorySubmissionRepository, UniformClassifier,
};
use crate::routes::with_scorecard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scorecard_ai::config::AppConfig;
use scorecard_ai::error::AppError;
use scorecard_ai::telemetry;
use scorecard_ai::workflows::feedback::PeerFeedbackService;
use scorecard_ai::workflows::recognition::InMemoryNotificationStore;
use scorecard_ai::workflows::scorecard::ScorecardService;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let notifications = Arc::new(InMemoryNotificationStore::default());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        notifications: notifications.clone(),
    };

    let submissions = Arc::new(InMemorySubmissionRepository::default());
    let scorecard_service = Arc::new(ScorecardService::new(submissions));

    let feedback_repository = Arc::new(InMemoryFeedbackRepository::default());
    let classifier = Arc::new(UniformClassifier::default());
    let feedback_service = Arc::new(PeerFeedbackService::new(feedback_repository, classifier));

    let app = with_scorecard_routes(scorecard_service, feedback_service)
        .layer(Extension(app_state))
        .layer(Extension(notifications))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "performance scorecard service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
