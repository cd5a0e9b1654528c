use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use strategy_tracker::catalog::Catalogs;
use strategy_tracker::config::AppConfig;
use strategy_tracker::error::AppError;
use strategy_tracker::repository::MemoryStore;
use strategy_tracker::service::StrategyService;
use strategy_tracker::telemetry;
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

    let catalogs = Catalogs::load(&config.catalog)?;
    info!(
        source = config
            .catalog
            .directory
            .as_deref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        "choice catalogs loaded"
    );

    let store = Arc::new(MemoryStore::default());
    let strategy_service = Arc::new(StrategyService::new(store, Arc::new(catalogs)));

    let app = with_operational_routes(strategy_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "strategy tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
