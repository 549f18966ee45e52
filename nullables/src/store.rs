//! Nullable store — thread-safe in-memory governance storage for testing.

use proposalnet_store::{GovernanceStore, StoreError};
use proposalnet_types::{Principal, ProposalId};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory [`GovernanceStore`].
#[derive(Default)]
pub struct NullGovernanceStore {
    proposals: Mutex<BTreeMap<ProposalId, Vec<u8>>>,
    votes: Mutex<BTreeMap<(ProposalId, Principal), Vec<u8>>>,
    meta: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl NullGovernanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vote records across all proposals.
    pub fn vote_count(&self) -> usize {
        self.votes.lock().unwrap().len()
    }

    /// Drop a stored proposal, simulating a damaged backend.
    pub fn remove_proposal(&self, id: ProposalId) {
        self.proposals.lock().unwrap().remove(&id);
    }
}

impl GovernanceStore for NullGovernanceStore {
    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.proposals.lock().unwrap().insert(id, data.to_vec());
        Ok(())
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Vec<u8>, StoreError> {
        self.proposals
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    fn list_proposals(&self) -> Result<Vec<ProposalId>, StoreError> {
        Ok(self.proposals.lock().unwrap().keys().copied().collect())
    }

    fn put_vote(
        &self,
        proposal: ProposalId,
        voter: &Principal,
        data: &[u8],
    ) -> Result<(), StoreError> {
        let mut votes = self.votes.lock().unwrap();
        match votes.get(&(proposal, voter.clone())) {
            Some(existing) if existing.as_slice() == data => Ok(()),
            Some(_) => Err(StoreError::Duplicate(format!(
                "vote by {voter} on proposal {proposal}"
            ))),
            None => {
                votes.insert((proposal, voter.clone()), data.to_vec());
                Ok(())
            }
        }
    }

    fn get_vote(&self, proposal: ProposalId, voter: &Principal) -> Result<Vec<u8>, StoreError> {
        self.votes
            .lock()
            .unwrap()
            .get(&(proposal, voter.clone()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("vote by {voter} on proposal {proposal}")))
    }

    fn get_votes(&self, proposal: ProposalId) -> Result<Vec<(Principal, Vec<u8>)>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|((id, _), _)| *id == proposal)
            .map(|((_, voter), data)| (voter.clone(), data.clone()))
            .collect())
    }

    fn list_voted_proposals(&self) -> Result<Vec<ProposalId>, StoreError> {
        let mut ids: Vec<ProposalId> = self.votes.lock().unwrap().keys().map(|(id, _)| *id).collect();
        ids.dedup();
        Ok(ids)
    }

    fn put_meta(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        self.meta.lock().unwrap().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }
}
