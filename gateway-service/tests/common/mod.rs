//! Test helpers for gateway-service integration tests.
//!
//! Each test gets its own gateway bound to a random port, pointed at a
//! wiremock server standing in for the AI service.

#![allow(dead_code)]

use async_trait::async_trait;
use gateway_service::config::GatewayConfig;
use gateway_service::services::{
    AccessCredential, CredentialError, CredentialResolver, PlaceholderCredentialResolver,
};
use gateway_service::Application;
use service_core::config as core_config;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub ai_service: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_credentials(Arc::new(PlaceholderCredentialResolver)).await
    }

    pub async fn spawn_with_credentials(credentials: Arc<dyn CredentialResolver>) -> Self {
        let ai_service = MockServer::start().await;
        let ai_service_url = ai_service.uri();
        Self::spawn_inner(ai_service, &ai_service_url, credentials).await
    }

    /// Gateway pointed at `ai_service_url` instead of the fake AI service.
    pub async fn spawn_with_ai_service_url(ai_service_url: &str) -> Self {
        let ai_service = MockServer::start().await;
        Self::spawn_inner(
            ai_service,
            ai_service_url,
            Arc::new(PlaceholderCredentialResolver),
        )
        .await
    }

    async fn spawn_inner(
        ai_service: MockServer,
        ai_service_url: &str,
        credentials: Arc<dyn CredentialResolver>,
    ) -> Self {
        let config = test_config(ai_service_url);

        let app = Application::build_with_credentials(config, credentials)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            ai_service,
        }
    }

    pub fn questions_url(&self) -> String {
        format!("{}/api/v1/questions", self.address)
    }

    /// Number of calls the fake AI service has seen so far.
    pub async fn ai_calls(&self) -> usize {
        self.ai_service
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

pub fn test_config(ai_service_url: &str) -> GatewayConfig {
    let server = core_config::Config {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let vars: HashMap<&str, String> = HashMap::from([
        ("AI_SERVICE_URL", ai_service_url.to_string()),
        ("AI_SERVICE_TIMEOUT_SECS", "2".to_string()),
    ]);

    GatewayConfig::from_lookup(server, |key| vars.get(key).cloned())
        .expect("Failed to build test config")
}

/// Resolver that knows a fixed set of stores.
pub struct FixedCredentials(pub HashMap<String, String>);

#[async_trait]
impl CredentialResolver for FixedCredentials {
    async fn resolve(&self, store_id: &str) -> Result<AccessCredential, CredentialError> {
        self.0
            .get(store_id)
            .map(AccessCredential::new)
            .ok_or_else(|| CredentialError::SessionNotFound(store_id.to_string()))
    }
}
