use ajaxgate_api::GateConfig;
use ajaxgate_api::app::{build_app_with, build_services, spawn_dispatch_log};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GateConfig::from_env()?;
    ajaxgate_observability::init(&config.tracing_options());

    if config.nonce_secret_is_default {
        tracing::warn!("NONCE_SECRET not set; using insecure dev default");
    }

    let bind_addr = config.bind_addr;
    let services = build_services(&config);
    spawn_dispatch_log(&services.records)?;
    let app = build_app_with(config, services);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
