//! The question answering workflow.
//!
//! Each question goes through memory lookup, the response cache, ShopifyQL
//! generation and validation, data retrieval and finally insight synthesis.
//! Without a model provider both generation steps are simulated.

use crate::models::{Confidence, Insight, ProcessRequest};
use crate::services::metrics::{record_answer, AnswerSource};
use crate::services::prompts;
use crate::services::providers::{ProviderError, TextProvider};
use crate::services::shopify_client::ShopifyClient;
use crate::services::shopifyql;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Model returned an invalid insight: {0}")]
    MalformedInsight(#[source] serde_json::Error),
}

pub struct AnalyticsAgent {
    provider: Option<Arc<dyn TextProvider>>,
    cache: RwLock<HashMap<String, Insight>>,
    history: RwLock<HashMap<String, Vec<String>>>,
}

impl AnalyticsAgent {
    /// `None` runs the agent in simulation mode.
    pub fn new(provider: Option<Arc<dyn TextProvider>>) -> Self {
        Self {
            provider,
            cache: RwLock::new(HashMap::new()),
            history: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.provider.is_none()
    }

    pub async fn process(&self, request: &ProcessRequest) -> Result<Insight, AgentError> {
        let context = self.context_for(&request.store_id).await;

        let cache_key = format!("{}:{}", request.store_id, request.question);
        if let Some(cached) = self.cache.read().await.get(&cache_key) {
            tracing::info!(cache_key = %cache_key, "Returning cached answer");
            record_answer(AnswerSource::Cache);
            return Ok(cached.clone());
        }

        tracing::info!(
            question = %request.question,
            context = %context,
            "Interpreting question"
        );

        let query = match &self.provider {
            Some(provider) => provider
                .generate(&prompts::query_prompt(&context, &request.question))
                .await?
                .trim()
                .to_string(),
            None => shopifyql::simulate_query(&request.question).to_string(),
        };

        if let Err(rejection) = shopifyql::validate(&query) {
            tracing::warn!(query = %query, reason = %rejection, "Rejected generated query");
            record_answer(AnswerSource::Rejected);
            return Ok(Insight::new(
                format!("Invalid query: {}", rejection),
                Confidence::Low,
            ));
        }

        let client = ShopifyClient::new(&request.store_id, &request.access_token);
        let data = client.execute_shopify_ql(&query).await;

        let insight = match &self.provider {
            Some(provider) => {
                let prompt = prompts::insight_prompt(&request.question, &data.to_string());
                let reply = provider.generate(&prompt).await?;
                let insight: Insight = serde_json::from_str(strip_code_fence(&reply))
                    .map_err(AgentError::MalformedInsight)?;
                record_answer(AnswerSource::Model);
                insight
            }
            None => {
                record_answer(AnswerSource::Simulated);
                simulate_insight(&request.question, &data)
            }
        };

        self.cache.write().await.insert(cache_key, insight.clone());
        self.history
            .write()
            .await
            .entry(request.store_id.clone())
            .or_default()
            .push(request.question.clone());

        Ok(insight)
    }

    /// Earlier questions asked for `store_id`, oldest first.
    pub async fn history(&self, store_id: &str) -> Vec<String> {
        self.history
            .read()
            .await
            .get(store_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn context_for(&self, store_id: &str) -> String {
        match self.history.read().await.get(store_id).and_then(|h| h.last()) {
            Some(previous) => format!("\nPrevious Question: {}", previous),
            None => String::new(),
        }
    }
}

fn simulate_insight(question: &str, data: &Value) -> Insight {
    let q = question.to_lowercase();

    if q.contains("inventory") || q.contains("reorder") {
        return Insight::new(
            "Based on the last 30 days, you sell around 10 units per day. You should reorder at least 70 units of 'Awesome Hoodie' to avoid stockouts next week.",
            Confidence::Medium,
        );
    }
    if q.contains("top") {
        return Insight::new(
            "Your top selling product last week was 'Cool T-Shirt' with 500 in total sales, followed by 'Awesome Hoodie'.",
            Confidence::High,
        );
    }

    Insight::new(
        format!("I found some interesting data for your question: {}", data),
        Confidence::Medium,
    )
}

/// Models often wrap JSON replies in a markdown fence.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
