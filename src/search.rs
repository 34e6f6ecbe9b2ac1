//! Product catalog search.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::api::{read_json, ApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    q: &'a str,
}

#[derive(Clone, Debug)]
pub struct ProductSearch {
    client: Client,
    base_url: String,
}

impl ProductSearch {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /products?q=<query>`. Blank queries return nothing without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_qs::to_string(&SearchParams { q: query })
            .map_err(|e| ApiError::Query(e.to_string()))?;
        let url = format!("{}/products?{params}", self.base_url);

        let products: Vec<Product> = read_json(self.client.get(url).send().await?).await?;
        tracing::debug!(query, count = products.len(), "Product search finished");
        Ok(products)
    }

    pub fn add_to_wishlist(&self, product_id: u64) {
        tracing::info!(product_id, "Added product to wishlist");
    }
}
