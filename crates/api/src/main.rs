use std::sync::Arc;

use anyhow::Context;

use callsight_api::app::{build_app, services::build_services};
use callsight_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    callsight_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(build_services(&config));
    let sweeper = services.orchestrator.spawn_sweeper();

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await
        .context("server error")?;

    sweeper.shutdown().await;
    Ok(())
}
