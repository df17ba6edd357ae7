use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Query},
    http::{header, request::Parts},
};
use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use super::http_layers::token_preview;

/// Spotify access token supplied by the browser, either as the
/// `access_token` query parameter or as an `Authorization: Bearer` header.
/// The query parameter wins when both are present.
#[derive(Clone, PartialEq)]
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken({})", token_preview(&self.0))
    }
}

#[derive(Deserialize)]
struct AccessTokenQuery {
    access_token: Option<String>,
}

fn extract_token_from_query(parts: &Parts) -> Option<String> {
    Query::<AccessTokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.access_token)
}

fn extract_token_from_headers(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

fn extract_access_token(parts: &Parts) -> Option<AccessToken> {
    let token = extract_token_from_query(parts)
        .filter(|token| !token.is_empty())
        .or_else(|| extract_token_from_headers(parts))
        .filter(|token| !token.is_empty())
        .map(AccessToken);
    match &token {
        Some(token) => debug!("Got access token {:?}", token),
        None => debug!("No access token in query nor headers."),
    }
    token
}

impl<S: Send + Sync> FromRequestParts<S> for AccessToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_access_token(parts)
            .ok_or_else(|| ApiError::MissingInput("Missing access_token".to_string()))
    }
}

impl<S: Send + Sync> OptionalFromRequestParts<S> for AccessToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(extract_access_token(parts))
    }
}
