use crate::cli::ServeArgs;
use crate::infra::{AppState, LoggingNotifier};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use promotion_desk::config::AppConfig;
use promotion_desk::error::AppError;
use promotion_desk::telemetry;
use promotion_desk::workflows::promotion::{PromotionService, PromotionSettings, Stores};
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

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(PromotionService::new(
        Stores::in_memory(),
        Arc::new(LoggingNotifier::default()),
        PromotionSettings::from(&config.workflow),
    ));

    if let Some(admin) = &config.workflow.bootstrap_admin {
        let account = service.ensure_admin(admin)?;
        info!(user_id = %account.id, email = %account.email, "bootstrap administrator available");
    }

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "promotion service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
