//! HTTP product search client.
//!
//! # Responsibilities
//! - Forward a validated search to the provider endpoint
//! - Map transport and status failures to `SearchError`
//! - Rewrite every returned product link to an affiliate link

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::affiliate::AffiliateLinkRewriter;
use crate::config::SearchConfig;
use crate::observability::logging::truncate_for_log;
use crate::search::types::{Product, ProductSearch, SearchError, SearchQuery};

/// Longest provider error body kept for logs.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRequest<'a> {
    keywords: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_price: Option<f64>,
    item_count: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    items: Vec<Product>,
}

/// Product search backed by a JSON HTTP provider.
#[derive(Clone)]
pub struct HttpProductSearch {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    affiliate: Arc<AffiliateLinkRewriter>,
}

impl HttpProductSearch {
    pub fn new(
        config: &SearchConfig,
        timeout: Duration,
        affiliate: Arc<AffiliateLinkRewriter>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            affiliate,
        })
    }
}

#[async_trait]
impl ProductSearch for HttpProductSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        let body = ProviderRequest {
            keywords: &query.keywords,
            min_price: query.budget_min,
            max_price: query.budget_max,
            item_count: query.max_results,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_for_log(&mut body, MAX_ERROR_BODY);
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ProviderResponse = response.json().await?;
        tracing::debug!(
            keywords = %query.keywords,
            count = payload.items.len(),
            "Search provider responded"
        );

        Ok(payload
            .items
            .into_iter()
            .take(query.max_results as usize)
            .map(|mut product| {
                product.url = self
                    .affiliate
                    .rewrite(Some(&product.url), Some(&product.title));
                product
            })
            .collect())
    }
}
