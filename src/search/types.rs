//! Product search types and error definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A product as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub title: String,

    /// Outbound link. Rewritten to an affiliate link before it leaves the gateway.
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// A validated, normalized search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Trimmed, non-empty keywords.
    pub keywords: String,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub max_results: u32,
}

/// Errors from the search provider.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Connection, timeout, or body decoding failure.
    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("search provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// A product search backend.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Run one search. Products come back in provider order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError>;
}
