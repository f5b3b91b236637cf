use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Per call. A question makes two calls, and both must fit inside the
/// gateway's default 30 second budget.
pub const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 12;

/// Placeholder key that keeps the agent in simulation mode.
pub const MOCK_GEMINI_KEY: &str = "mock_key";

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub server: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<Secret<String>>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    /// True when a real key is configured and the model should be called.
    pub fn is_live(&self) -> bool {
        match &self.api_key {
            Some(key) => {
                let key = key.expose_secret();
                !key.is_empty() && key != MOCK_GEMINI_KEY
            }
            None => false,
        }
    }
}

impl AiConfig {
    pub fn load() -> Result<Self, AppError> {
        let server = core_config::Config::load(DEFAULT_PORT)?;
        Self::from_lookup(server, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(server: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("GEMINI_API_BASE")
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "GEMINI_TIMEOUT_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?,
            None => DEFAULT_GEMINI_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(AiConfig {
            server,
            gemini: GeminiSettings {
                api_key: lookup("GEMINI_API_KEY").map(Secret::new),
                model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_base,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<AiConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let server = core_config::Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        AiConfig::from_lookup(server, |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_simulation() {
        let config = load_with(&[]).unwrap();

        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.gemini.api_base, DEFAULT_GEMINI_API_BASE);
        assert_eq!(config.gemini.timeout, Duration::from_secs(12));
        assert!(!config.gemini.is_live());
    }

    #[test]
    fn mock_and_empty_keys_are_not_live() {
        let mock = load_with(&[("GEMINI_API_KEY", "mock_key")]).unwrap();
        assert!(!mock.gemini.is_live());
        let empty = load_with(&[("GEMINI_API_KEY", "")]).unwrap();
        assert!(!empty.gemini.is_live());
    }

    #[test]
    fn real_key_enables_model() {
        let config = load_with(&[
            ("GEMINI_API_KEY", "AIza-test"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_API_BASE", "http://localhost:9999/v1beta/"),
        ])
        .unwrap();

        assert!(config.gemini.is_live());
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.api_base, "http://localhost:9999/v1beta");
    }

    #[test]
    fn two_model_calls_fit_the_gateway_default_timeout() {
        let timeout = load_with(&[]).unwrap().gemini.timeout;
        assert!(timeout * 2 < Duration::from_secs(30));
    }

    #[test]
    fn gemini_timeout_must_be_positive_whole_seconds() {
        let config = load_with(&[("GEMINI_TIMEOUT_SECS", "50")]).unwrap();
        assert_eq!(config.gemini.timeout, Duration::from_secs(50));

        assert!(matches!(
            load_with(&[("GEMINI_TIMEOUT_SECS", "0")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            load_with(&[("GEMINI_TIMEOUT_SECS", "soon")]),
            Err(AppError::ConfigError(_))
        ));
    }
}
