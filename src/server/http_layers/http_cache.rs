//! HTTP caching middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};

/// Marks successful responses as cacheable for `max_age_sec` seconds.
/// Error pages and a zero max age leave the response untouched.
pub async fn http_cache(
    State(max_age_sec): State<usize>,
    request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let mut response = next.run(request).await.into_response();
    if max_age_sec == 0 || !response.status().is_success() {
        return response;
    }

    if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", max_age_sec)) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}
