//! Proposal identifiers.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sequentially assigned proposal identifier. The first proposal is `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(u64);

impl ProposalId {
    pub const FIRST: Self = Self(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Position of this proposal in an id-indexed arena.
    ///
    /// Returns `None` on targets where the id does not fit in `usize`.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// The id assigned after this one.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProposalId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypesError::InvalidProposalId(s.to_string()))
    }
}

impl From<u64> for ProposalId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
