//! Block height — the time basis for voting windows.
//!
//! Heights come from the hosting chain and only ever move forward. The
//! governance engine reads them but never advances them.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A block height.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHeight(u64);

impl BlockHeight {
    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The height `blocks` after this one, or `None` on overflow.
    pub fn checked_add(&self, blocks: u64) -> Option<Self> {
        self.0.checked_add(blocks).map(Self)
    }

    /// Blocks remaining until `target` (zero once `target` has been reached).
    pub fn blocks_until(&self, target: BlockHeight) -> u64 {
        target.0.saturating_sub(self.0)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for BlockHeight {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypesError::InvalidBlockHeight(s.to_string()))
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}
