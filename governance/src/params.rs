//! Tunable governance parameters.
//!
//! Loaded from the `[governance]` table of the host configuration; every
//! field falls back to its default when omitted.

use serde::{Deserialize, Serialize};

/// Limits applied when a proposal is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Maximum description length in bytes.
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,

    /// Maximum voting window length in blocks. `None` means unbounded.
    #[serde(default)]
    pub max_voting_duration: Option<u64>,
}

fn default_max_description_len() -> usize {
    500
}

impl GovernanceParams {
    /// A voting duration is acceptable when it is positive and within the configured bound.
    pub fn accepts_duration(&self, voting_duration: u64) -> bool {
        voting_duration > 0
            && self
                .max_voting_duration
                .map_or(true, |max| voting_duration <= max)
    }

    /// A description is acceptable when it has visible content and fits the length bound.
    pub fn accepts_description(&self, description: &str) -> bool {
        !description.trim().is_empty() && description.len() <= self.max_description_len
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            max_description_len: default_max_description_len(),
            max_voting_duration: None,
        }
    }
}
