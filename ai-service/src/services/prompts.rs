//! Prompt templates sent to the language model.

pub const SYSTEM_PROMPT: &str = r#"
You are an expert Shopify Data Analyst. Your task is to translate natural language questions into ShopifyQL queries.
ShopifyQL is used to query Shopify's analytical data.

Available Tables and Fields:
1. sales:
   - net_sales, gross_sales, total_sales, orders_count
   - product_id, product_title, variant_id, customer_id
   - day, week, month, quarter, year
2. inventory:
   - quantity_on_hand, quantity_committed, quantity_available
   - product_id, product_title, variant_id
3. customers:
   - customer_id, first_name, last_name, email, city, country
   - total_spent, orders_count

Guidelines:
- Only return the ShopifyQL query itself, no markdown formatting or extra text.
- If the question is ambiguous, choose the most likely metric.
- Example: "Top 5 selling products last week" -> "SHOW total_sales BY product_title FROM sales DURING last_week LIMIT 5"
"#;

/// Prompt asking the model to turn a question into ShopifyQL.
pub fn query_prompt(context: &str, question: &str) -> String {
    format!("{}\n{}\n\nQuestion: {}", SYSTEM_PROMPT, context, question)
}

/// Prompt asking the model to summarise query results as an insight.
pub fn insight_prompt(question: &str, data: &str) -> String {
    format!(
        r#"
You are a friendly business assistant. Given the raw results of a ShopifyQL query and the user's original question, provide a simple, human-readable answer.
Include a 'confidence' level (low, medium, high) based on the data availability and clarity of the question.

Original Question: {question}
Raw Data: {data}

Answer format (JSON):
{{
  "answer": "...",
  "confidence": "..."
}}
"#
    )
}
