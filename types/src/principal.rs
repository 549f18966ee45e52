//! Caller identity.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque, comparable caller identity (e.g. `ST3J2GVMMM2R07ZFBJDWTYEYAR8FZH5WKDTFJ9AHA`).
///
/// The engine never interprets the contents; it only compares principals for
/// equality (creator checks) and uses them as vote-ledger keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from a raw string without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A principal is well-formed when it is non-empty and contains no whitespace.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Principal {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let principal = Self::new(s);
        if principal.is_valid() {
            Ok(principal)
        } else {
            Err(TypesError::InvalidPrincipal(s.to_string()))
        }
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
