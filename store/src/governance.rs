//! Governance storage trait.

use crate::StoreError;
use proposalnet_types::{Principal, ProposalId};

/// Meta key holding the next proposal id to assign.
pub const META_NEXT_PROPOSAL_ID: &str = "next_proposal_id";

/// Meta key holding the serialized governance parameters.
pub const META_PARAMS: &str = "governance_params";

/// Trait for storing governance state (proposals, vote records, metadata).
///
/// Values are opaque serialized blobs; encoding is owned by the caller.
pub trait GovernanceStore {
    /// Store a proposal, replacing any previous value for the same id.
    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError>;

    /// Get a proposal by id.
    fn get_proposal(&self, id: ProposalId) -> Result<Vec<u8>, StoreError>;

    /// Ids of every stored proposal, ascending.
    fn list_proposals(&self) -> Result<Vec<ProposalId>, StoreError>;

    /// Store a vote record. Vote records are never overwritten: re-storing
    /// identical bytes is a no-op, storing different bytes for an existing
    /// (proposal, voter) pair is a `Duplicate` error.
    fn put_vote(
        &self,
        proposal: ProposalId,
        voter: &Principal,
        data: &[u8],
    ) -> Result<(), StoreError>;

    /// Get a specific voter's vote record on a proposal.
    fn get_vote(&self, proposal: ProposalId, voter: &Principal) -> Result<Vec<u8>, StoreError>;

    /// Get every vote record for a proposal as (voter, data) pairs.
    fn get_votes(&self, proposal: ProposalId) -> Result<Vec<(Principal, Vec<u8>)>, StoreError>;

    /// Ids of every proposal holding at least one vote record, ascending.
    fn list_voted_proposals(&self) -> Result<Vec<ProposalId>, StoreError>;

    /// Store a named metadata blob.
    fn put_meta(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Get a named metadata blob, if present.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}
