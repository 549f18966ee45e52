//! Voting ledger — who voted on what, and which way.
//!
//! Keyed by (proposal, voter) so the double-vote check is a single lookup
//! no matter how many votes a proposal has collected. Records are never
//! removed or overwritten.

use proposalnet_types::{Principal, ProposalId, VoteDirection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One voter's vote on one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub proposal: ProposalId,
    pub voter: Principal,
    pub direction: VoteDirection,
}

#[derive(Clone, Debug, Default)]
pub struct VotingLedger {
    records: HashMap<(ProposalId, Principal), VoteDirection>,
}

impl VotingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, proposal: ProposalId, voter: &Principal) -> bool {
        self.records.contains_key(&(proposal, voter.clone()))
    }

    pub fn get(&self, proposal: ProposalId, voter: &Principal) -> Option<VoteDirection> {
        self.records.get(&(proposal, voter.clone())).copied()
    }

    /// Insert a record. Returns `false` and leaves the ledger untouched if the
    /// voter already has a record for this proposal.
    pub fn record(
        &mut self,
        proposal: ProposalId,
        voter: Principal,
        direction: VoteDirection,
    ) -> bool {
        use std::collections::hash_map::Entry;
        match self.records.entry((proposal, voter)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(direction);
                true
            }
        }
    }

    /// Every record, ordered by (proposal, voter) so serialized output is deterministic.
    pub fn records(&self) -> Vec<VoteRecord> {
        let mut out: Vec<VoteRecord> = self
            .records
            .iter()
            .map(|((proposal, voter), direction)| VoteRecord {
                proposal: *proposal,
                voter: voter.clone(),
                direction: *direction,
            })
            .collect();
        out.sort_by(|a, b| (a.proposal, &a.voter).cmp(&(b.proposal, &b.voter)));
        out
    }
}
