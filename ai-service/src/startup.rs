use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use service_core::utils::shutdown_signal;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{AiConfig, GeminiSettings};
use crate::handlers;
use crate::services::{AnalyticsAgent, GeminiConfig, GeminiTextProvider, TextProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AiConfig>,
    pub agent: Arc<AnalyticsAgent>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/process", post(handlers::process::process_question))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// The Gemini provider, or `None` when the agent should simulate.
fn provider_from_settings(
    settings: &GeminiSettings,
) -> anyhow::Result<Option<Arc<dyn TextProvider>>> {
    let Some(api_key) = settings.api_key.as_ref().filter(|_| settings.is_live()) else {
        return Ok(None);
    };

    let provider: Arc<dyn TextProvider> = Arc::new(GeminiTextProvider::new(GeminiConfig {
        api_key: api_key.clone(),
        model: settings.model.clone(),
        api_base: settings.api_base.clone(),
        timeout: settings.timeout,
    })?);

    Ok(Some(provider))
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: AiConfig) -> anyhow::Result<Self> {
        let provider = provider_from_settings(&config.gemini)?;
        Self::build_with_provider(config, provider).await
    }

    pub async fn build_with_provider(
        config: AiConfig,
        provider: Option<Arc<dyn TextProvider>>,
    ) -> anyhow::Result<Self> {
        match &provider {
            Some(_) => tracing::info!(
                model = %config.gemini.model,
                "Using Gemini for query generation"
            ),
            None => tracing::warn!("GEMINI_API_KEY not set - query generation is simulated"),
        }

        let address = config.server.addr();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState {
            config: Arc::new(config),
            agent: Arc::new(AnalyticsAgent::new(provider)),
        };
        let router = build_router(state);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        let addr: SocketAddr = self.listener.local_addr()?;
        tracing::info!("Listening on {}", addr);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use secrecy::Secret;
    use serde_json::{json, Value};
    use service_core::config as core_config;
    use tower::ServiceExt;

    fn router() -> Router {
        let server = core_config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let config = AiConfig::from_lookup(server, |_| None).unwrap();
        build_router(AppState {
            config: Arc::new(config),
            agent: Arc::new(AnalyticsAgent::new(None)),
        })
    }

    fn process(body: Value) -> Request<Body> {
        Request::post("/process")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn process_answers_in_simulation_mode() {
        let response = router()
            .oneshot(process(json!({
                "store_id": "acme",
                "question": "Any stock running low?",
                "access_token": "shpua_mock_token_12345"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["confidence"], "medium");
    }

    #[tokio::test]
    async fn blank_access_token_is_unprocessable() {
        let response = router()
            .oneshot(process(json!({
                "store_id": "acme",
                "question": "q",
                "access_token": ""
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    fn settings(api_key: Option<&str>) -> GeminiSettings {
        GeminiSettings {
            api_key: api_key.map(|k| Secret::new(k.to_string())),
            model: "gemini-1.5-flash".to_string(),
            api_base: "http://localhost:1/v1beta".to_string(),
            timeout: std::time::Duration::from_secs(1),
        }
    }

    #[test]
    fn no_provider_without_a_real_key() {
        assert!(provider_from_settings(&settings(None)).unwrap().is_none());
        assert!(provider_from_settings(&settings(Some("mock_key")))
            .unwrap()
            .is_none());
    }

    #[test]
    fn real_key_builds_gemini_provider() {
        assert!(provider_from_settings(&settings(Some("AIza-test")))
            .unwrap()
            .is_some());
    }
}
