use product_service::config::ProductConfig;
use product_service::Application;
use service_core::observability::{init_metrics, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProductConfig::load()?;

    init_tracing("product-service", &config.common)?;
    init_metrics()?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Startup aborted: {}", e);
        e
    })?;
    application.run_until_stopped().await?;

    shutdown_tracing();
    Ok(())
}
