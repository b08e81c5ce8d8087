//! JWT claims for authenticated principals.
//!
//! The authenticated principal of this system is an account holder; the
//! token subject is the numeric account id. Downstream code receives the
//! principal as an explicit parameter, never from ambient state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::AccountId;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated account id, as a string per JWT convention.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
}

impl Claims {
    /// Creates claims for an account expiring at the given instant.
    #[must_use]
    pub fn new(account_id: AccountId, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: account_id.to_string(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    /// Returns the authenticated account id.
    ///
    /// Returns `None` when the subject is not a numeric account id, which
    /// means the token was not issued by this service.
    #[must_use]
    pub fn account_id(&self) -> Option<AccountId> {
        self.sub.parse().ok()
    }
}
