pub mod firebase;

pub use firebase::FirebaseIdentityProvider;
