use async_trait::async_trait;
use auth::FirebaseVerifier;

use crate::account::errors::AccountError;
use crate::account::models::DisplayName;
use crate::account::models::EmailAddress;
use crate::account::models::FederatedIdentity;
use crate::session::ports::IdentityProvider;

/// Identity provider backed by Firebase ID tokens.
pub struct FirebaseIdentityProvider {
    verifier: FirebaseVerifier,
}

impl FirebaseIdentityProvider {
    pub fn new(verifier: FirebaseVerifier) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn verify(&self, id_token: &str) -> Result<FederatedIdentity, AccountError> {
        let claims = self.verifier.verify(id_token).await.map_err(|e| {
            tracing::debug!(error = %e, "Identity token rejected");
            AccountError::from(e)
        })?;

        let email = EmailAddress::new(claims.email)
            .map_err(|e| AccountError::InvalidIdentityToken(format!("email claim: {}", e)))?;

        // Unusable provider names are dropped.
        let display_name = DisplayName::optional(claims.display_name).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Ignoring display name from provider");
            None
        });

        Ok(FederatedIdentity {
            email,
            display_name,
        })
    }
}
