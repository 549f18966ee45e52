//! Abstract storage traits for ProposalNet.
//!
//! The governance engine owns its state in memory; a storage backend
//! (LMDB, a file, in-memory for testing) only has to implement
//! [`GovernanceStore`] to persist and restore it.

pub mod error;
pub mod governance;

pub use error::StoreError;
pub use governance::{GovernanceStore, META_NEXT_PROPOSAL_ID, META_PARAMS};
