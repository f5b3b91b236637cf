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

use crate::config::GatewayConfig;
use crate::handlers;
use crate::services::{AiServiceClient, CredentialResolver, PlaceholderCredentialResolver};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub ai_client: AiServiceClient,
    pub credentials: Arc<dyn CredentialResolver>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        credentials: Arc<dyn CredentialResolver>,
    ) -> anyhow::Result<Self> {
        let ai_client = AiServiceClient::new(&config.ai_service)?;
        Ok(Self {
            config: Arc::new(config),
            ai_client,
            credentials,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/api/v1/questions",
            post(handlers::questions::create_question),
        )
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: GatewayConfig) -> anyhow::Result<Self> {
        Self::build_with_credentials(config, Arc::new(PlaceholderCredentialResolver)).await
    }

    pub async fn build_with_credentials(
        config: GatewayConfig,
        credentials: Arc<dyn CredentialResolver>,
    ) -> anyhow::Result<Self> {
        if !config.shopify.is_configured() {
            tracing::warn!(
                "SHOPIFY_API_KEY / SHOPIFY_API_SECRET not set - store sessions are mocked"
            );
        }

        let address = config.server.addr();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            ai_service_url = %config.ai_service.url,
            timeout_secs = config.ai_service.timeout.as_secs(),
            "Initialized AI service client"
        );

        let state = AppState::new(config, credentials)?;
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
