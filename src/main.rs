use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use perfgraph_core::app_state::build_app_state;
use perfgraph_core::core::config::app_config::{AppConfig, LOG_FILE_PREFIX};
use perfgraph_core::debug::run_debug;
use perfgraph_core::routes::app_router;

/// Stdout plus a daily rolling file; the guard must outlive the server.
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(?e, "failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _guard = init_tracing(&config);

    let state = build_app_state(config.clone())?;

    if config.debug_mode {
        run_debug(&state).await;
        return Ok(());
    }

    let _sweep = state
        .graph_session_service
        .spawn_idle_sweep(config.session_ttl(), config.session_sweep_interval());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("🚀 perfgraph listening on {} (Treeherder: {})", addr, config.treeherder_url);

    axum::serve(listener, app_router().with_state(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
