//! Caller authentication for routes that act on behalf of a user.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::supabase::{IdentityError, IdentityProvider, Principal};

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve the caller, or fail with 401.
///
/// Provider outages are logged as errors but still answer 401: without a
/// verified principal nothing may be mutated.
pub async fn authenticate(
    identity: &dyn IdentityProvider,
    headers: &HeaderMap,
) -> Result<Principal, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;

    match identity.verify(token).await {
        Ok(principal) => Ok(principal),
        Err(IdentityError::Rejected(status)) => {
            tracing::debug!(status, "Bearer token rejected");
            Err(ApiError::Unauthorized)
        }
        Err(e) => {
            tracing::error!(error = %e, "Identity verification failed");
            metrics::record_downstream_failure("identity");
            Err(ApiError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer  tok ")), Some("tok"));
        assert_eq!(bearer_token(&headers("Basic dXNlcg==")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
