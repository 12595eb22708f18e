use anyhow::Context;

use shop_api::app::{self, services::AppServices};
use shop_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shop_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = AppServices::from_config(&config.storage)
        .await
        .context("failed to initialise catalog store")?;

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
