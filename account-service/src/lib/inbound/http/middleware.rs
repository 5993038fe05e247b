use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Identity established by the auth gate, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Middleware that validates access tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        tracing::debug!("Request without bearer token");
        ApiError::Unauthorized(INVALID_TOKEN.to_string()).into_response()
    })?;

    let claims = state.token_issuer.verify_access(token).map_err(|e| {
        tracing::warn!(error = %e, "Access token rejected");
        ApiError::Unauthorized(INVALID_TOKEN.to_string()).into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        email: claims.email,
    });

    Ok(next.run(req).await)
}

/// Token carried in the `Authorization` header.
///
/// The `Bearer ` prefix is optional; surrounding whitespace is ignored.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    (!token.is_empty()).then_some(token)
}
