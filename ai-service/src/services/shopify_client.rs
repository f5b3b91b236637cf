//! Store data access.
//!
//! Queries are not sent anywhere yet: results are canned rows picked by the
//! table the query reads from.

use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};

pub const ADMIN_API_VERSION: &str = "2024-01";

pub struct ShopifyClient {
    store_id: String,
    access_token: Secret<String>,
    graphql_url: String,
}

impl ShopifyClient {
    pub fn new(store_id: &str, access_token: &str) -> Self {
        Self {
            store_id: store_id.to_string(),
            access_token: Secret::new(access_token.to_string()),
            graphql_url: format!(
                "https://{}/admin/api/{}/graphql.json",
                store_id, ADMIN_API_VERSION
            ),
        }
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    pub fn has_access_token(&self) -> bool {
        !self.access_token.expose_secret().trim().is_empty()
    }

    pub async fn execute_shopify_ql(&self, query: &str) -> Value {
        tracing::info!(
            store_id = %self.store_id,
            token_present = self.has_access_token(),
            query,
            "Simulating ShopifyQL execution"
        );

        let q = query.to_lowercase();

        if q.contains("sales") {
            return json!([
                { "product_title": "Cool T-Shirt", "total_sales": 500 },
                { "product_title": "Awesome Hoodie", "total_sales": 350 },
                { "product_title": "Sleek Cap", "total_sales": 200 },
            ]);
        }
        if q.contains("inventory") {
            return json!([
                { "product_title": "Cool T-Shirt", "quantity_available": 15 },
                { "product_title": "Awesome Hoodie", "quantity_available": 2 },
                { "product_title": "Sleek Cap", "quantity_available": 50 },
            ]);
        }
        if q.contains("customers") {
            return json!([
                { "first_name": "John", "last_name": "Doe", "orders_count": 5 },
                { "first_name": "Jane", "last_name": "Smith", "orders_count": 3 },
            ]);
        }

        json!({ "message": "No data found for this query." })
    }
}
