use auth::TokenPair;

use crate::account::models::Account;

/// Result of a successful sign-up or sign-in: the resolved account and a
/// freshly issued token pair.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub account: Account,
    pub tokens: TokenPair,
}

impl SessionOutcome {
    pub fn new(account: Account, tokens: TokenPair) -> Self {
        Self { account, tokens }
    }
}
