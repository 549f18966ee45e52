//! Vote direction.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which way a voter voted. Governance is one identity, one vote; there is no weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDirection {
    For,
    Against,
}

impl VoteDirection {
    pub fn is_for(&self) -> bool {
        matches!(self, Self::For)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::For => "for",
            Self::Against => "against",
        }
    }
}

impl From<bool> for VoteDirection {
    fn from(vote_for: bool) -> Self {
        if vote_for {
            Self::For
        } else {
            Self::Against
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "for" | "true" | "yes" => Ok(Self::For),
            "against" | "false" | "no" => Ok(Self::Against),
            _ => Err(TypesError::InvalidVoteDirection(s.to_string())),
        }
    }
}
