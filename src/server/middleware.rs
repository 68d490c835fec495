use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use super::AppState;
use crate::error::AppError;
use crate::metrics::AuthMetrics;

/// Bearer credential middleware.
/// Compares the `Authorization: Bearer <key>` value with `auth.api_key`.
pub async fn bearer_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let expected_key = &state.settings.auth.api_key;

    match extract_bearer_token(&req) {
        Some(key) if key == expected_key => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "Invalid API key provided");
            AuthMetrics::record_failure();
            Err(AppError::Auth("Invalid API key".to_string()))
        }
        None => {
            tracing::warn!(path = %req.uri().path(), "Missing bearer credential");
            AuthMetrics::record_failure();
            Err(AppError::Auth("Not authenticated".to_string()))
        }
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_auth(value: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/prompts");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let req = request_with_auth(Some("Bearer secret-key"));
        assert_eq!(extract_bearer_token(&req), Some("secret-key"));
    }

    #[test]
    fn test_extract_bearer_token_wrong_scheme() {
        let req = request_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_bearer_token(&req), None);
    }

    #[test]
    fn test_extract_bearer_token_missing() {
        let req = request_with_auth(None);
        assert_eq!(extract_bearer_token(&req), None);
    }
}
