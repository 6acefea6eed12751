//! Account names.
//!
//! Both types trim their input and reject blank or overlong values, so a
//! `Username` or `DisplayName` held anywhere in the client is known good.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MAX_USERNAME_CHARS: usize = 100;
const MAX_DISPLAY_NAME_CHARS: usize = 200;

fn trimmed_within(label: &str, raw: &str, max_chars: usize) -> Result<String, DomainError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{label} cannot be empty")));
    }
    if value.chars().count() > max_chars {
        return Err(DomainError::validation(format!(
            "{label} cannot exceed {max_chars} characters"
        )));
    }
    Ok(value.to_string())
}

/// Unique account handle.
///
/// Sent as a URL path segment, so inner whitespace is rejected too.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = trimmed_within("Username", &name.into(), MAX_USERNAME_CHARS)?;
        if name.contains(char::is_whitespace) {
            return Err(DomainError::validation("Username cannot contain whitespace"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name shown in the navigation bar's welcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within("Display name", &name.into(), MAX_DISPLAY_NAME_CHARS).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_newtype_conversions {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

string_newtype_conversions!(Username);
string_newtype_conversions!(DisplayName);
