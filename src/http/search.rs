//! Product search route.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::http::response::{ApiError, SearchFailure};
use crate::http::state::AppState;
use crate::observability::metrics;
use crate::search::{Product, SearchQuery};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub max_results: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
}

impl SearchRequest {
    /// Validate and fill in defaults.
    pub fn normalize(self, config: &SearchConfig) -> Result<SearchQuery, ApiError> {
        let keywords = self.query.as_deref().map(str::trim).unwrap_or_default();
        if keywords.is_empty() {
            return Err(ApiError::Validation("Query is required".to_string()));
        }

        let budget_min = self.budget_min.filter(|b| b.is_finite());
        let budget_max = self.budget_max.filter(|b| b.is_finite());
        if budget_min.is_some_and(|b| b < 0.0) || budget_max.is_some_and(|b| b < 0.0) {
            return Err(ApiError::Validation("Budget cannot be negative".to_string()));
        }
        if let (Some(min), Some(max)) = (budget_min, budget_max) {
            if min > max {
                return Err(ApiError::Validation(
                    "budgetMin cannot exceed budgetMax".to_string(),
                ));
            }
        }

        let cap = config.max_results_cap.max(1);
        let max_results = match self.max_results.filter(|n| n.is_finite()) {
            Some(n) => n.floor().clamp(1.0, cap as f64) as u32,
            None => config.default_max_results.clamp(1, cap),
        };

        Ok(SearchQuery {
            keywords: keywords.to_string(),
            budget_min,
            budget_max,
            max_results,
        })
    }
}

/// `POST /api/amazon/search`
pub async fn search_products(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, SearchFailure> {
    let Json(request) = payload?;
    let query = request.normalize(&state.config.search)?;

    match state.search.search(&query).await {
        Ok(products) => Ok(Json(SearchResponse { products })),
        Err(e) => {
            tracing::error!(keywords = %query.keywords, error = %e, "Amazon search failed");
            metrics::record_downstream_failure("search");
            Err(ApiError::Downstream("Amazon search failed").into())
        }
    }
}
