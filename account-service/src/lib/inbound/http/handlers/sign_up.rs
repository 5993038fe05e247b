use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::CredentialError;
use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::models::SignUpCommand;
use crate::inbound::http::router::AppState;
use crate::session::models::SessionOutcome;
use crate::session::ports::SessionServicePort;

pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) = payload?;

    let outcome = if body.google_login {
        let id_token = body.id_token.ok_or_else(|| {
            ApiError::UnprocessableEntity("idToken is required for Google sign-up".to_string())
        })?;
        state.session_service.sign_in_federated(&id_token).await?
    } else {
        state.session_service.sign_up(body.try_into_command()?).await?
    };

    Ok(ApiSuccess::new(StatusCode::CREATED, (&outcome).into()))
}

/// HTTP request body for sign-up (raw JSON)
///
/// With `googleLogin` set, `email`, `password` and `fullName` are ignored and
/// the identity comes from `idToken` alone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    full_name: Option<String>,
    #[serde(default)]
    google_login: bool,
    id_token: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseSignUpRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] CredentialError),

    #[error("Invalid name: {0}")]
    DisplayName(#[from] DisplayNameError),
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, ParseSignUpRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let display_name = DisplayName::optional(self.full_name)?;
        Ok(SignUpCommand::new(email, password, display_name))
    }
}

impl From<ParseSignUpRequestError> for ApiError {
    fn from(err: ParseSignUpRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// Account summary and token pair returned by sign-up and sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseData {
    pub email: String,
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl From<&SessionOutcome> for SessionResponseData {
    fn from(outcome: &SessionOutcome) -> Self {
        Self {
            email: outcome.account.email.as_str().to_string(),
            user_id: outcome.account.id.to_string(),
            access_token: outcome.tokens.access_token.clone(),
            refresh_token: outcome.tokens.refresh_token.clone(),
            full_name: outcome
                .account
                .display_name
                .as_ref()
                .map(|name| name.as_str().to_string()),
        }
    }
}
