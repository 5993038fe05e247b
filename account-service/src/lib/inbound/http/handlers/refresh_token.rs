use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::ApiError;
use super::INVALID_REFRESH_TOKEN;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;
use crate::session::ports::SessionServicePort;

/// Exchange the refresh token in the `Authorization` header for a new pair.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<RefreshTokenResponse>), ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized(INVALID_REFRESH_TOKEN.to_string()))?;

    let tokens = state.session_service.refresh(token).await?;

    Ok((
        StatusCode::OK,
        Json(RefreshTokenResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            success: "true",
        }),
    ))
}

/// Refresh responses are flat rather than wrapped in `response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponse {
    #[serde(rename = "_accessToken")]
    pub access_token: String,
    #[serde(rename = "_refreshToken")]
    pub refresh_token: String,
    pub success: &'static str,
}
