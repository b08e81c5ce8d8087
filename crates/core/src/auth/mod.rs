//! Authentication: password hashing and credential verification.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use remit_shared::{AccountId, AppError};

use crate::account::Account;
use crate::store::{StoreError, TransferStore};

/// Errors surfaced by credential verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown account or wrong password. The two cases are deliberately
    /// indistinguishable to the caller.
    #[error("invalid account id or password")]
    InvalidCredentials,

    /// Store infrastructure failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hash verification failed for a reason other than a mismatch.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Store(StoreError::Unavailable(_)) => Self::Unavailable(err.to_string()),
            AuthError::Store(_) | AuthError::Password(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Verifies account credentials against the store.
///
/// Token issuance stays at the HTTP layer; this only answers whether the
/// caller holds the account's password.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn TransferStore>,
}

impl Authenticator {
    /// Creates an authenticator over a store.
    #[must_use]
    pub fn new(store: Arc<dyn TransferStore>) -> Self {
        Self { store }
    }

    /// Returns the account if the password matches its stored hash.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidCredentials` for an unknown account or a wrong
    /// password, without distinguishing the two.
    pub async fn verify_credentials(
        &self,
        id: AccountId,
        password: &str,
    ) -> Result<Account, AuthError> {
        let hash = match self.store.password_hash(id).await {
            Ok(hash) => hash,
            Err(StoreError::NotFound) => {
                warn!(account = %id, "login attempt for unknown account");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => return Err(err.into()),
        };

        if !verify_password(password, &hash)? {
            warn!(account = %id, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.store.get(id).await?)
    }
}
