use anyhow::Context;

use invoicer_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    invoicer_observability::init(config.log_format);

    let service = invoicer_api::app::services::build_service(&config).await?;
    let app = invoicer_api::app::build_app(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(database = ?config.database, "listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
