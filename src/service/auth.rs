//! Fixed-credential operator login.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ParkingError, ParkingResult};

/// Logged-in front-desk operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    /// Operator login name.
    pub username: String,
    /// When the operator logged in.
    pub logged_in_at: DateTime<Utc>,
}

/// Checks operator credentials against the single configured account.
#[derive(Clone)]
pub struct OperatorAuth {
    username: String,
    password: String,
}

impl std::fmt::Debug for OperatorAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl OperatorAuth {
    /// Creates a checker for one username/password pair.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Verifies a login attempt.
    ///
    /// Usernames are compared after trimming surrounding whitespace;
    /// passwords are compared exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::InvalidCredentials`] if either part does not
    /// match.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> ParkingResult<Operator> {
        let username = username.trim();
        if username != self.username || password != self.password {
            tracing::warn!(username, "operator login rejected");
            return Err(ParkingError::InvalidCredentials);
        }
        tracing::info!(username, "operator logged in");
        Ok(Operator {
            username: username.to_string(),
            logged_in_at: now,
        })
    }
}
