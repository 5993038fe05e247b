pub mod errors;
pub mod firebase;

pub use errors::FederatedError;
pub use firebase::FederatedClaims;
pub use firebase::FirebaseSettings;
pub use firebase::FirebaseVerifier;
