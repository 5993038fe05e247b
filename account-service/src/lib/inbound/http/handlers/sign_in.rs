use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::sign_up::SessionResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::INVALID_CREDENTIALS;
use crate::account::errors::EmailError;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::models::SignInCommand;
use crate::inbound::http::router::AppState;
use crate::session::ports::SessionServicePort;

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) = payload?;

    let outcome = if body.google_login {
        let id_token = body.id_token.ok_or_else(|| {
            ApiError::UnprocessableEntity("idToken is required for Google sign-in".to_string())
        })?;
        state.session_service.sign_in_federated(&id_token).await?
    } else {
        // Missing fields are a validation error; a malformed email fails
        // like a wrong one.
        let email = EmailAddress::new(body.email).map_err(|e| match e {
            EmailError::Empty => ApiError::UnprocessableEntity(format!("Invalid email: {}", e)),
            EmailError::InvalidFormat(_) => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
        })?;
        let password = Password::new(body.password)
            .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid password: {}", e)))?;

        state
            .session_service
            .sign_in(SignInCommand::new(email, password))
            .await?
    };

    Ok(ApiSuccess::new(StatusCode::OK, (&outcome).into()))
}

/// HTTP request body for sign-in (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    google_login: bool,
    id_token: Option<String>,
}
