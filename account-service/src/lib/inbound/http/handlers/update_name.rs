use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::get_me::AccountResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::models::AccountId;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Replace the caller's display name. Only the account owner may do this.
pub async fn update_name(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateNameRequest>, JsonRejection>,
) -> Result<ApiSuccess<AccountResponseData>, ApiError> {
    let Json(body) = payload?;

    let account_id = AccountId::from_string(&user_id)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
    let name = DisplayName::new(body.new_name)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    let email = EmailAddress::new(caller.email)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
    let owner = state.account_service.get_account_by_email(&email).await?;

    if owner.id != account_id {
        tracing::warn!(caller_id = %owner.id, target_id = %account_id, "Rename of another account refused");
        return Err(ApiError::Forbidden(
            "Not allowed to modify this account".to_string(),
        ));
    }

    state
        .account_service
        .update_display_name(&account_id, name)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNameRequest {
    new_name: String,
}
