use crate::proposal::TerminalState;
use proposalnet_store::StoreError;
use proposalnet_types::ProposalId;
use thiserror::Error;

/// Every way a governance call can be rejected.
///
/// A rejected call never mutates engine state.
#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal not found")]
    ProposalNotFound(ProposalId),

    #[error("invalid voting duration")]
    InvalidVotingDuration,

    #[error("invalid description")]
    InvalidDescription,

    #[error("voting closed")]
    VotingClosed,

    #[error("already voted")]
    AlreadyVoted,

    #[error("proposal already {0}")]
    AlreadyFinalized(TerminalState),

    #[error("voting still open")]
    VotingStillOpen,

    #[error("insufficient votes")]
    InsufficientVotes,

    #[error("not authorized")]
    NotAuthorized,

    #[error("snapshot corrupt: {0}")]
    SnapshotCorrupt(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl GovernanceError {
    /// Stable numeric code for hosts that report errors as integers.
    pub fn code(&self) -> u32 {
        match self {
            Self::ProposalNotFound(_) => 100,
            Self::InvalidVotingDuration => 101,
            Self::InvalidDescription => 102,
            Self::VotingClosed => 103,
            Self::AlreadyVoted => 104,
            Self::AlreadyFinalized(_) => 105,
            Self::VotingStillOpen => 106,
            Self::InsufficientVotes => 107,
            Self::NotAuthorized => 108,
            Self::SnapshotCorrupt(_) => 109,
            Self::Store(_) => 110,
        }
    }
}
