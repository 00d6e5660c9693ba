//! API key authentication for the webhook and operator read paths.
//!
//! The same shared secret gates both ingest and the privileged lookup.
//! Callers may present it as an `X-API-Key` header or an `api_key`
//! query parameter; the webhook additionally accepts an `api_key` body
//! field, which the ingest handler feeds in as an extra candidate. A
//! receiver with no stored key denies everything.

use axum::{
    extract::{FromRequestParts, Query},
    http::{HeaderMap, request::Parts},
};
use serde::Deserialize;

use crate::db::CredentialRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query/body parameter carrying the API key.
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeyParams {
    pub api_key: Option<String>,
}

/// Check candidate credentials against the stored key.
///
/// Accepts if any candidate is a case-sensitive exact match. Candidates
/// are checked header-first, but any single match suffices.
///
/// # Errors
///
/// `AppError::Unauthorized` when no key is stored or nothing matches;
/// `AppError::Database` if the credential lookup fails.
pub async fn authenticate(
    state: &AppState,
    candidates: &[Option<&str>],
) -> Result<(), AppError> {
    let stored = CredentialRepository::new(state.pool())
        .get()
        .await?
        .ok_or(AppError::Unauthorized)?;

    if candidates
        .iter()
        .flatten()
        .any(|presented| stored.matches(presented))
    {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Extract the API key header value, if present and valid UTF-8.
#[must_use]
pub fn header_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Extractor that requires a valid API key in the header or query string.
///
/// Used on the privileged read paths. The ingest handler calls
/// [`authenticate`] directly instead, because it also has to consider the
/// request body.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     _auth: RequireApiKey,
///     State(state): State<AppState>,
/// ) -> impl IntoResponse {
///     // only reached with a valid key
/// }
/// ```
#[derive(Debug)]
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = header_key(&parts.headers).map(str::to_owned);

        let params = Query::<ApiKeyParams>::from_request_parts(parts, state)
            .await
            .map(|Query(p)| p)
            .unwrap_or_default();

        authenticate(state, &[header.as_deref(), params.api_key.as_deref()]).await?;

        Ok(Self)
    }
}
