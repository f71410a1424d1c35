//! Token verification against the hosted auth service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::SupabaseConfig;
use crate::supabase::types::{IdentityError, IdentityProvider, Principal};

/// Verifies access tokens by asking the auth service who they belong to.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: reqwest::Client,
    user_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            user_url: format!("{}/auth/v1/user", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn verify(&self, token: &str) -> Result<Principal, IdentityError> {
        let response = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityError::Rejected(status.as_u16()));
        }
        if !status.is_success() {
            return Err(IdentityError::Unavailable(format!(
                "unexpected status {}",
                status.as_u16()
            )));
        }

        let mut principal: Principal = response.json().await?;
        if principal.id.is_empty() {
            return Err(IdentityError::Unavailable("user payload without id".into()));
        }
        principal.access_token = token.to_string();
        Ok(principal)
    }
}
