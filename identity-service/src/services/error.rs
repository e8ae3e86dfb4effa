use thiserror::Error;

use crate::store::StoreError;
use crate::utils::HashError;

/// Failure taxonomy handed upward. Every operation fails with exactly one
/// stable kind regardless of which internal check fired, so callers branch
/// on kind rather than message text. `InvalidCredentials` and `InvalidToken`
/// are intentionally low-information.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identity already exists")]
    DuplicateIdentity,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            // The store's uniqueness verdict is the source of truth, even
            // when an earlier existence check passed.
            StoreError::Conflict(_) => ServiceError::DuplicateIdentity,
            StoreError::Unavailable(e) => ServiceError::StoreUnavailable(e),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<HashError> for ServiceError {
    fn from(err: HashError) -> Self {
        ServiceError::Internal(anyhow::Error::new(err))
    }
}
