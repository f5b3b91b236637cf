use dotenvy::dotenv;
use gateway_service::{config::GatewayConfig, Application};
use service_core::observability::{init_metrics, init_tracing, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(
        "gateway-service",
        "info",
        LogFormat::from_env(),
        otlp_endpoint.as_deref(),
    );

    init_metrics().map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;

    let config = GatewayConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}
