use crate::cli::ServeArgs;
use crate::infra::{load_positions, AppState};
use crate::routes::with_selection_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_mcdm::config::AppConfig;
use talent_mcdm::error::AppError;
use talent_mcdm::telemetry;
use talent_mcdm::workflows::selection::SelectionService;
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

    let positions = load_positions(config.data.job_positions_csv.as_deref())?;
    let selection_service = Arc::new(SelectionService::new(config.ranking.clone(), positions));

    let app = with_selection_routes(selection_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "candidate ranking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
