pub mod agent;
pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod shopify_client;
pub mod shopifyql;

pub use agent::{AgentError, AnalyticsAgent};
pub use providers::{GeminiConfig, GeminiTextProvider, ProviderError, TextProvider};
