use crate::cli::ServeArgs;
use crate::infra::{bootstrap, AppState};
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_platform::config::AppConfig;
use job_platform::error::AppError;
use job_platform::telemetry;
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

    // Registration talks to the provider through a blocking client.
    let setup_config = config.clone();
    let platform = tokio::task::spawn_blocking(move || bootstrap(&setup_config)).await??;

    let app = with_platform_routes(Arc::new(platform))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, provider = ?config.provider.kind, %addr, "job platform ready");

    axum::serve(listener, app).await?;
    Ok(())
}
