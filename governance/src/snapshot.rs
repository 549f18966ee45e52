//! Engine snapshots — serialize the whole governance state and restore it
//! into an independent engine.
//!
//! Two forms are supported:
//! - a single bincode blob ([`GovernanceEngine::save_state`] / [`GovernanceEngine::load_state`]),
//! - per-record writes into any [`GovernanceStore`] ([`GovernanceEngine::persist`] /
//!   [`GovernanceEngine::restore`]).
//!
//! Both paths funnel through [`GovernanceSnapshot::into_engine`], which
//! refuses state that violates the lifecycle invariants.

use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::ledger::{VoteRecord, VotingLedger};
use crate::params::GovernanceParams;
use crate::proposal::Proposal;
use proposalnet_store::{GovernanceStore, StoreError, META_NEXT_PROPOSAL_ID, META_PARAMS};
use proposalnet_types::{ProposalId, VoteDirection};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of a governance engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    pub version: u32,
    pub params: GovernanceParams,
    /// Every proposal, in id order.
    pub proposals: Vec<Proposal>,
    /// Every vote record, ordered by (proposal, voter).
    pub votes: Vec<VoteRecord>,
}

impl GovernanceSnapshot {
    pub fn capture(engine: &GovernanceEngine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            params: engine.params().clone(),
            proposals: engine.proposals().to_vec(),
            votes: engine.vote_records(),
        }
    }

    /// Validate and rebuild an engine.
    pub fn into_engine(self) -> Result<GovernanceEngine, GovernanceError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(corrupt(format!("unsupported version {}", self.version)));
        }
        for (index, proposal) in self.proposals.iter().enumerate() {
            if proposal.id.index() != Some(index) {
                return Err(corrupt(format!(
                    "proposal at position {index} has id {}",
                    proposal.id
                )));
            }
            if proposal.voting_end <= proposal.voting_start {
                return Err(corrupt(format!("proposal {} has an empty window", proposal.id)));
            }
            if proposal.executed && proposal.cancelled {
                return Err(corrupt(format!(
                    "proposal {} is both executed and cancelled",
                    proposal.id
                )));
            }
            if proposal.executed && !proposal.has_majority() {
                return Err(corrupt(format!(
                    "proposal {} is executed without a majority ({}/{})",
                    proposal.id, proposal.votes_for, proposal.votes_against
                )));
            }
        }

        // Tallies rebuilt from the vote records, indexed by proposal.
        let mut tallies = vec![(0u64, 0u64); self.proposals.len()];
        let mut ledger = VotingLedger::new();
        for record in self.votes {
            let Some(index) = record.proposal.index().filter(|&i| i < tallies.len()) else {
                return Err(corrupt(format!(
                    "vote by {} references unknown proposal {}",
                    record.voter, record.proposal
                )));
            };
            if !ledger.record(record.proposal, record.voter.clone(), record.direction) {
                return Err(corrupt(format!(
                    "duplicate vote by {} on proposal {}",
                    record.voter, record.proposal
                )));
            }
            let (yea, nay) = &mut tallies[index];
            match record.direction {
                VoteDirection::For => *yea += 1,
                VoteDirection::Against => *nay += 1,
            }
        }

        for (proposal, &(yea, nay)) in self.proposals.iter().zip(&tallies) {
            if (yea, nay) != (proposal.votes_for, proposal.votes_against) {
                return Err(corrupt(format!(
                    "proposal {} tally {}/{} disagrees with {yea}/{nay} vote records",
                    proposal.id, proposal.votes_for, proposal.votes_against
                )));
            }
        }

        Ok(GovernanceEngine::from_parts(self.proposals, ledger, self.params))
    }
}

fn corrupt(msg: String) -> GovernanceError {
    warn!(%msg, "rejecting governance snapshot");
    GovernanceError::SnapshotCorrupt(msg)
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, GovernanceError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()).into())
}

/// Decode with the same layout as `bincode::serialize`, but never read past
/// the input, so a forged length prefix cannot trigger a huge allocation.
fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, GovernanceError> {
    use bincode::Options;
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(bytes.len() as u64)
        .deserialize(bytes)
        .map_err(|e| GovernanceError::SnapshotCorrupt(e.to_string()))
}

impl GovernanceEngine {
    /// Serialize the full engine state to bytes.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        encode(&GovernanceSnapshot::capture(self))
    }

    /// Restore an engine from bytes produced by [`save_state`](Self::save_state).
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: GovernanceSnapshot = decode(data)?;
        let engine = snapshot.into_engine()?;
        debug!(proposals = engine.proposal_count(), "governance state loaded");
        Ok(engine)
    }

    /// Write every proposal, vote record, and the engine metadata into `store`.
    pub fn persist(&self, store: &dyn GovernanceStore) -> Result<(), GovernanceError> {
        for proposal in self.proposals() {
            store.put_proposal(proposal.id, &encode(proposal)?)?;
        }
        let votes = self.vote_records();
        for record in &votes {
            store.put_vote(record.proposal, &record.voter, &encode(&record.direction)?)?;
        }
        store.put_meta(META_NEXT_PROPOSAL_ID, &encode(&self.proposal_count())?)?;
        store.put_meta(META_PARAMS, &encode(self.params())?)?;
        debug!(
            proposals = self.proposal_count(),
            votes = votes.len(),
            "governance state persisted"
        );
        Ok(())
    }

    /// Rebuild an engine from a store written by [`persist`](Self::persist).
    ///
    /// An empty store yields a fresh engine with default parameters.
    pub fn restore(store: &dyn GovernanceStore) -> Result<Self, GovernanceError> {
        let params = match store.get_meta(META_PARAMS)? {
            Some(bytes) => decode(&bytes)?,
            None => GovernanceParams::default(),
        };
        let count: u64 = match store.get_meta(META_NEXT_PROPOSAL_ID)? {
            Some(bytes) => decode(&bytes)?,
            None => 0,
        };

        let beyond = |ids: Vec<ProposalId>| ids.into_iter().find(|id| id.as_u64() >= count);
        if let Some(id) = beyond(store.list_proposals()?) {
            return Err(corrupt(format!("stored proposal {id} is beyond next id {count}")));
        }
        if let Some(id) = beyond(store.list_voted_proposals()?) {
            return Err(corrupt(format!("stored votes on proposal {id} are beyond next id {count}")));
        }

        let mut proposals = Vec::new();
        let mut votes = Vec::new();
        for raw in 0..count {
            let id = ProposalId::new(raw);
            let proposal: Proposal = match store.get_proposal(id) {
                Ok(bytes) => decode(&bytes)?,
                Err(StoreError::NotFound(_)) => {
                    return Err(corrupt(format!("proposal {id} missing from store")))
                }
                Err(e) => return Err(e.into()),
            };
            proposals.push(proposal);
            for (voter, bytes) in store.get_votes(id)? {
                let direction: VoteDirection = decode(&bytes)?;
                votes.push(VoteRecord {
                    proposal: id,
                    voter,
                    direction,
                });
            }
        }

        GovernanceSnapshot {
            version: SNAPSHOT_VERSION,
            params,
            proposals,
            votes,
        }
        .into_engine()
    }
}
