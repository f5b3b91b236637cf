use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_AI_SERVICE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: core_config::Config,
    pub ai_service: AiServiceConfig,
    pub shopify: ShopifyAppConfig,
}

#[derive(Debug, Clone)]
pub struct AiServiceConfig {
    /// Base URL without a trailing slash.
    pub url: String,
    pub timeout: Duration,
}

/// Identity of the embedded storefront app.
///
/// Built once at startup and only ever read afterwards.
#[derive(Debug, Clone)]
pub struct ShopifyAppConfig {
    pub application_name: String,
    /// Kept for secret rotation; unused.
    pub old_secret: Secret<String>,
    pub api_key: Secret<String>,
    pub secret: Secret<String>,
    /// Comma-separated list of granted access scopes.
    pub scope: String,
    pub embedded_app: bool,
    pub after_authenticate_job: bool,
    pub api_version: String,
    pub shop_session_repository: String,
    pub reauth_on_access_scope_changes: bool,
}

impl ShopifyAppConfig {
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope
            .split(',')
            .map(str::trim)
            .filter(|scope| !scope.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret.expose_secret().is_empty()
    }
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let server = core_config::Config::load(DEFAULT_PORT)?;
        Self::from_lookup(server, |key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(server: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("AI_SERVICE_URL").unwrap_or_else(|| DEFAULT_AI_SERVICE_URL.to_string());
        let url = url.trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&url).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("AI_SERVICE_URL is not a valid URL: {}", e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "AI_SERVICE_URL must be an http(s) URL with a host, got '{}'",
                url
            )));
        }

        let timeout_secs = match lookup("AI_SERVICE_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "AI_SERVICE_TIMEOUT_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?,
            None => DEFAULT_AI_SERVICE_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "AI_SERVICE_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(GatewayConfig {
            server,
            ai_service: AiServiceConfig {
                url,
                timeout: Duration::from_secs(timeout_secs),
            },
            shopify: ShopifyAppConfig {
                application_name: "Shopify AI Analytics".to_string(),
                old_secret: Secret::new(String::new()),
                api_key: Secret::new(lookup("SHOPIFY_API_KEY").unwrap_or_default()),
                secret: Secret::new(lookup("SHOPIFY_API_SECRET").unwrap_or_default()),
                scope: "read_products,read_orders,read_inventory".to_string(),
                embedded_app: true,
                after_authenticate_job: false,
                api_version: "2024-01".to_string(),
                shop_session_repository: "ShopifyApp::InMemorySessionStore".to_string(),
                reauth_on_access_scope_changes: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn server() -> core_config::Config {
        core_config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<GatewayConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(server(), |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.ai_service.url, "http://localhost:8000");
        assert_eq!(config.ai_service.timeout, Duration::from_secs(30));
        assert_eq!(config.shopify.application_name, "Shopify AI Analytics");
        assert_eq!(config.shopify.api_version, "2024-01");
        assert_eq!(
            config.shopify.shop_session_repository,
            "ShopifyApp::InMemorySessionStore"
        );
        assert!(config.shopify.embedded_app);
        assert!(!config.shopify.after_authenticate_job);
        assert!(config.shopify.reauth_on_access_scope_changes);
        assert!(config.shopify.api_key.expose_secret().is_empty());
        assert!(config.shopify.old_secret.expose_secret().is_empty());
        assert!(!config.shopify.is_configured());
    }

    #[test]
    fn ai_service_url_is_overridable_and_trimmed() {
        let config = load_with(&[("AI_SERVICE_URL", "http://ai.internal:9000/")]).unwrap();
        assert_eq!(config.ai_service.url, "http://ai.internal:9000");
    }

    #[test]
    fn invalid_ai_service_url_is_rejected() {
        let result = load_with(&[("AI_SERVICE_URL", "not a url")]);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn ai_service_url_needs_http_scheme_and_host() {
        for bad in ["localhost:8000", "ftp://ai.internal", "file:///tmp/ai"] {
            let result = load_with(&[("AI_SERVICE_URL", bad)]);
            assert!(matches!(result, Err(AppError::ConfigError(_))), "{}", bad);
        }

        let config = load_with(&[("AI_SERVICE_URL", "https://ai.internal")]).unwrap();
        assert_eq!(config.ai_service.url, "https://ai.internal");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = load_with(&[("AI_SERVICE_TIMEOUT_SECS", "0")]);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn timeout_must_be_numeric() {
        let config = load_with(&[("AI_SERVICE_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(config.ai_service.timeout, Duration::from_secs(5));

        let result = load_with(&[("AI_SERVICE_TIMEOUT_SECS", "soon")]);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn shopify_credentials_come_from_environment() {
        let config = load_with(&[
            ("SHOPIFY_API_KEY", "key-123"),
            ("SHOPIFY_API_SECRET", "shh"),
        ])
        .unwrap();

        assert_eq!(config.shopify.api_key.expose_secret(), "key-123");
        assert_eq!(config.shopify.secret.expose_secret(), "shh");
        assert!(config.shopify.is_configured());
    }

    #[test]
    fn scopes_are_split_on_commas() {
        let config = load_with(&[]).unwrap();
        let scopes: Vec<&str> = config.shopify.scopes().collect();
        assert_eq!(scopes, vec!["read_products", "read_orders", "read_inventory"]);
    }
}
