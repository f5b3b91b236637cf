//! Cross-service workflow test harness.
//!
//! Starts an ai-service and a gateway-service in-process, each on a random
//! port, with the gateway pointed at the ai-service. Nothing outside the
//! test process is needed.

use ai_service::config::AiConfig;
use anyhow::{anyhow, Result};
use gateway_service::config::GatewayConfig;
use service_core::config as core_config;
use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn local_server() -> core_config::Config {
    core_config::Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Both services running, wired together.
pub struct WorkflowTestContext {
    pub gateway_address: String,
    pub ai_service_address: String,
    client: reqwest::Client,
}

impl WorkflowTestContext {
    /// Starts both services with the ai-service in simulation mode.
    pub async fn start() -> Result<Self> {
        init_tracing();

        let ai_config = AiConfig::from_lookup(local_server(), |_| None)
            .map_err(|e| anyhow!("Failed to build ai-service config: {}", e))?;
        let ai_app = ai_service::Application::build(ai_config).await?;
        let ai_service_address = format!("http://127.0.0.1:{}", ai_app.port());
        tokio::spawn(async move {
            ai_app.run_until_stopped().await.ok();
        });

        let vars = HashMap::from([("AI_SERVICE_URL", ai_service_address.clone())]);
        let gateway_config = GatewayConfig::from_lookup(local_server(), |key| vars.get(key).cloned())
            .map_err(|e| anyhow!("Failed to build gateway config: {}", e))?;
        let gateway_app = gateway_service::Application::build(gateway_config).await?;
        let gateway_address = format!("http://127.0.0.1:{}", gateway_app.port());
        tokio::spawn(async move {
            gateway_app.run_until_stopped().await.ok();
        });

        let context = Self {
            gateway_address,
            ai_service_address,
            client: reqwest::Client::new(),
        };
        context.wait_until_healthy(Duration::from_secs(5)).await?;

        Ok(context)
    }

    /// Polls `/health` on both services until they answer or `timeout` passes.
    pub async fn wait_until_healthy(&self, timeout: Duration) -> Result<()> {
        let health_urls = [
            ("ai-service", format!("{}/health", self.ai_service_address)),
            ("gateway-service", format!("{}/health", self.gateway_address)),
        ];
        let start = std::time::Instant::now();

        loop {
            let mut unhealthy_services = Vec::new();

            for (name, url) in &health_urls {
                match self.client.get(url).timeout(Duration::from_secs(2)).send().await {
                    Ok(resp) if resp.status().is_success() => {}
                    Ok(resp) => {
                        unhealthy_services.push(format!("{} (status: {})", name, resp.status()))
                    }
                    Err(e) => unhealthy_services.push(format!("{} (error: {})", name, e)),
                }
            }

            if unhealthy_services.is_empty() {
                tracing::info!("All services are healthy");
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(anyhow!(
                    "Timeout waiting for services. Unhealthy: {}",
                    unhealthy_services.join(", ")
                ));
            }

            tracing::debug!("Waiting for services: {}", unhealthy_services.join(", "));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    /// Asks a question through the gateway.
    pub async fn ask(&self, store_id: &str, question: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}/api/v1/questions", self.gateway_address))
            .json(&serde_json::json!({ "store_id": store_id, "question": question }))
            .send()
            .await?;
        Ok(response)
    }
}
