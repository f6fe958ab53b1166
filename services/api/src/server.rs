use crate::cli::ServeArgs;
use crate::infra::{self, AppState};
use crate::routes::with_board_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jobport::board::{BoardService, MemoryStore, StoreNotifier};
use jobport::config::AppConfig;
use jobport::error::AppError;
use jobport::telemetry;
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

    let store = Arc::new(MemoryStore::default());
    infra::seed_directory(store.as_ref())?;
    let notifier = Arc::new(StoreNotifier::new(store.clone()));
    let board_service = Arc::new(BoardService::new(store, notifier));

    let app = with_board_routes(board_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job application board ready");

    axum::serve(listener, app).await?;
    Ok(())
}
