//! Profile rows in the hosted database (REST interface).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::SupabaseConfig;
use crate::observability::logging::truncate_for_log;
use crate::supabase::types::{Principal, ProfileChanges, ProfileStore, StoreError};

/// Longest error body kept for logs.
const MAX_ERROR_BODY: usize = 512;

/// Upserts profile rows as the calling user.
#[derive(Clone)]
pub struct SupabaseProfiles {
    client: reqwest::Client,
    table_url: String,
    anon_key: String,
}

impl SupabaseProfiles {
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            table_url: format!(
                "{}/rest/v1/{}?on_conflict=id",
                config.url.trim_end_matches('/'),
                config.profiles_table
            ),
            anon_key: config.anon_key.clone(),
        })
    }
}

/// The row sent to the store. Untouched columns are left out so the merge
/// keeps their current values.
pub fn profile_row(principal: &Principal, changes: &ProfileChanges) -> Value {
    let mut row = Map::new();
    row.insert("id".into(), Value::String(principal.id.clone()));
    if let Some(display_name) = &changes.display_name {
        let value = display_name.clone().map(Value::String).unwrap_or(Value::Null);
        row.insert("display_name".into(), value);
    }
    Value::Object(row)
}

#[async_trait]
impl ProfileStore for SupabaseProfiles {
    async fn upsert(&self, principal: &Principal, changes: &ProfileChanges) -> Result<(), StoreError> {
        let response = self
            .client
            .post(&self.table_url)
            .header("apikey", &self.anon_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .bearer_auth(&principal.access_token)
            .json(&profile_row(principal, changes))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let mut message = response.text().await.unwrap_or_default();
        truncate_for_log(&mut message, MAX_ERROR_BODY);
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn principal() -> Principal {
        Principal {
            id: "user-7".into(),
            email: None,
            access_token: "tok".into(),
        }
    }

    #[test]
    fn test_row_with_cleared_name() {
        let changes = ProfileChanges {
            display_name: Some(None),
        };
        assert_eq!(
            profile_row(&principal(), &changes),
            json!({"id": "user-7", "display_name": null})
        );
    }

    #[test]
    fn test_row_without_changes_leaves_name_out() {
        let row = profile_row(&principal(), &ProfileChanges::default());
        assert_eq!(row, json!({"id": "user-7"}));
    }

    #[test]
    fn test_table_url() {
        let profiles =
            SupabaseProfiles::new(&SupabaseConfig::default(), Duration::from_secs(1)).unwrap();
        assert_eq!(
            profiles.table_url,
            "http://127.0.0.1:54321/rest/v1/profiles?on_conflict=id"
        );
    }
}
