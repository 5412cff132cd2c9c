use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_confirmation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bakery_ops::config::AppConfig;
use bakery_ops::error::AppError;
use bakery_ops::telemetry;
use bakery_ops::workflows::confirmation::ConfirmationScoreEngine;
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
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(ConfirmationScoreEngine::new(config.scoring.clone()));
    let app = with_confirmation_routes(engine, config.history)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        proximity_window_days = config.scoring.proximity_window_days,
        "confirmation score service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
