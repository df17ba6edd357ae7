//! Marks responses as uncacheable. API responses carry per-user data and
//! tokens travel in query strings.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};

pub async fn no_store(request: Request<Body>, next: Next) -> impl IntoResponse {
    let response = next.run(request).await.into_response();

    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    axum::http::Response::from_parts(parts, body)
}
