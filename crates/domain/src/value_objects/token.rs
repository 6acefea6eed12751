//! Opaque login credential.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Login token issued by the story API on login or signup.
///
/// The value is opaque to the client. `Debug` output is redacted so tokens
/// never end up in logs; use [`LoginToken::expose`] where the raw value is
/// actually needed (request bodies, durable storage).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginToken(String);

impl LoginToken {
    /// Wrap a raw token.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, DomainError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DomainError::validation("Login token cannot be empty"));
        }
        Ok(Self(token))
    }

    /// Returns the raw token value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LoginToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoginToken(***)")
    }
}

impl TryFrom<String> for LoginToken {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LoginToken> for String {
    fn from(token: LoginToken) -> String {
        token.0
    }
}
