//! Profile update route.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Deserializer};

use crate::http::auth::authenticate;
use crate::http::response::{ApiError, Success};
use crate::http::state::AppState;
use crate::observability::metrics;
use crate::supabase::ProfileChanges;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    /// Outer `None`: field omitted. `Some(None)`: explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub display_name: Option<Option<String>>,
}

/// Deserialize a field that is present in the payload, keeping `null` as
/// `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ProfileUpdateRequest {
    /// Trim the display name; blank or `null` clears it.
    pub fn into_changes(self) -> ProfileChanges {
        let display_name = self.display_name.map(|name| {
            name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
        });
        ProfileChanges { display_name }
    }
}

/// `POST /api/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProfileUpdateRequest>, JsonRejection>,
) -> Result<Json<Success>, ApiError> {
    let principal = authenticate(state.identity.as_ref(), &headers).await?;
    let Json(request) = payload?;
    let changes = request.into_changes();

    match state.profiles.upsert(&principal, &changes).await {
        Ok(()) => {
            tracing::info!(user_id = %principal.id, "Profile updated");
            Ok(Json(Success::new()))
        }
        Err(e) => {
            tracing::error!(user_id = %principal.id, error = %e, "Profile upsert failed");
            metrics::record_downstream_failure("profile_store");
            Err(ApiError::Downstream("Failed to update profile"))
        }
    }
}
