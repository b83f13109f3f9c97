use thiserror::Error;

/// Failures of the identity provider or of an operation that needs a
/// signed-in owner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider refused the credentials.
    #[error("Sign-in rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached or answered garbage.
    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("User must be logged in to add items")]
    NotSignedIn,
}
