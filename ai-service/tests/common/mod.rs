//! Test helpers for ai-service integration tests.

#![allow(dead_code)]

use ai_service::config::AiConfig;
use ai_service::Application;
use serde_json::{json, Value};
use service_core::config as core_config;
use std::collections::HashMap;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Agent without a model key, answering from simulations.
    pub async fn spawn() -> Self {
        Self::spawn_with_env(&[]).await
    }

    pub async fn spawn_with_env(vars: &[(&str, &str)]) -> Self {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let server = core_config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let config = AiConfig::from_lookup(server, |key| vars.get(key).cloned())
            .expect("Failed to build test configuration");

        let app = Application::build(config)
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

        TestApp { address, port }
    }

    pub async fn ask(&self, store_id: &str, question: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/process", self.address))
            .json(&json!({
                "store_id": store_id,
                "question": question,
                "access_token": "shpua_mock_token_12345"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A `generateContent` response whose only candidate says `text`.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
