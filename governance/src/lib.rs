//! Governance engine for ProposalNet.
//!
//! Lifecycle: Active → Executed | Cancelled. Both end states are terminal.
//! Votes are accepted in the half-open window `[voting_start, voting_end)`;
//! execution needs the window closed and a strict majority in favour.
//!
//! Key principle: one identity = one vote (not stake-weighted).
//! Block height and caller identity come from the host on every call.

pub mod context;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod params;
pub mod proposal;
pub mod snapshot;

pub use context::CallContext;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use event::GovernanceEvent;
pub use ledger::{VoteRecord, VotingLedger};
pub use params::GovernanceParams;
pub use proposal::{Proposal, ProposalStatus, ProposalView, TerminalState};
pub use snapshot::{GovernanceSnapshot, SNAPSHOT_VERSION};
