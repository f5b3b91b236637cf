//! ShopifyQL generation fallback and read-only validation.

use thiserror::Error;

const FORBIDDEN_KEYWORDS: [&str; 4] = ["DELETE", "DROP", "UPDATE", "INSERT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryRejection {
    #[error("Dangerous keywords detected in query.")]
    DangerousKeyword,

    #[error("Query must start with SHOW for analytical retrieval.")]
    NotAnalytical,
}

/// Accepts only read-only analytical queries.
///
/// Matching is substring based on the uppercased query, so `SHOW` anywhere
/// in the text satisfies the analytical check.
pub fn validate(query: &str) -> Result<(), QueryRejection> {
    let upper = query.to_uppercase();

    if FORBIDDEN_KEYWORDS.iter().any(|word| upper.contains(word)) {
        return Err(QueryRejection::DangerousKeyword);
    }

    if !upper.contains("SHOW") {
        return Err(QueryRejection::NotAnalytical);
    }

    Ok(())
}

/// Keyword-driven stand-in for the model when no API key is configured.
pub fn simulate_query(question: &str) -> &'static str {
    let q = question.to_lowercase();

    if q.contains("top") && q.contains("selling") {
        return "SHOW total_sales BY product_title FROM sales DURING last_week LIMIT 5";
    }
    if q.contains("inventory") || q.contains("stock") {
        return "SHOW quantity_available BY product_title FROM inventory";
    }
    if q.contains("customers") {
        return "SHOW orders_count BY first_name, last_name FROM customers";
    }

    "SHOW total_sales FROM sales DURING last_30_days"
}
