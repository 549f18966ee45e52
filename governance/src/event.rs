//! Events emitted by successful governance calls.
//!
//! The engine appends one event per committed mutation; the host drains them
//! (for receipts, indexing, or printing). Rejected calls emit nothing.

use proposalnet_types::{BlockHeight, Principal, ProposalId, VoteDirection};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GovernanceEvent {
    ProposalCreated {
        proposal: ProposalId,
        creator: Principal,
        voting_start: BlockHeight,
        voting_end: BlockHeight,
    },
    VoteCast {
        proposal: ProposalId,
        voter: Principal,
        direction: VoteDirection,
        height: BlockHeight,
    },
    ProposalExecuted {
        proposal: ProposalId,
        executor: Principal,
        votes_for: u64,
        votes_against: u64,
        height: BlockHeight,
    },
    ProposalCancelled {
        proposal: ProposalId,
        height: BlockHeight,
    },
}

impl GovernanceEvent {
    pub fn proposal(&self) -> ProposalId {
        match self {
            Self::ProposalCreated { proposal, .. }
            | Self::VoteCast { proposal, .. }
            | Self::ProposalExecuted { proposal, .. }
            | Self::ProposalCancelled { proposal, .. } => *proposal,
        }
    }
}
