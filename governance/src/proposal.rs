//! Governance proposals and their lifecycle.
//!
//! ```text
//!            vote (open window)
//!              ┌────┐
//!              ▼    │
//!  create ──► Active ──execute──► Executed
//!              │
//!              └──────cancel────► Cancelled
//! ```
//!
//! `Executed` and `Cancelled` are terminal and mutually exclusive.

use proposalnet_types::{BlockHeight, Principal, ProposalId, VoteDirection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which terminal state a finalized proposal reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    Executed,
    Cancelled,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executed => f.write_str("executed"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Lifecycle position of a proposal at a given block height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProposalStatus {
    /// The queried height precedes the voting window.
    Pending,
    /// `voting_start <= height < voting_end`: votes are accepted.
    Open,
    /// The window has closed; awaiting execution or cancellation.
    Closed,
    Executed,
    Cancelled,
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// Who created it. Only the creator may cancel.
    pub creator: Principal,
    pub description: String,
    /// First block at which votes are accepted.
    pub voting_start: BlockHeight,
    /// First block at which votes are no longer accepted.
    pub voting_end: BlockHeight,
    pub votes_for: u64,
    pub votes_against: u64,
    pub executed: bool,
    pub cancelled: bool,
}

impl Proposal {
    pub(crate) fn new(
        id: ProposalId,
        creator: Principal,
        description: String,
        voting_start: BlockHeight,
        voting_end: BlockHeight,
    ) -> Self {
        Self {
            id,
            creator,
            description,
            voting_start,
            voting_end,
            votes_for: 0,
            votes_against: 0,
            executed: false,
            cancelled: false,
        }
    }

    /// The terminal state reached, if any. Executed wins if both flags were
    /// ever set, which the engine never allows.
    pub fn terminal_state(&self) -> Option<TerminalState> {
        if self.executed {
            Some(TerminalState::Executed)
        } else if self.cancelled {
            Some(TerminalState::Cancelled)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.executed || self.cancelled
    }

    /// Whether `height` falls inside the half-open window `[voting_start, voting_end)`.
    pub fn window_contains(&self, height: BlockHeight) -> bool {
        self.voting_start <= height && height < self.voting_end
    }

    /// Whether the voting window has closed at `height`.
    pub fn window_closed(&self, height: BlockHeight) -> bool {
        height >= self.voting_end
    }

    /// Strict majority: ties do not pass.
    pub fn has_majority(&self) -> bool {
        self.votes_for > self.votes_against
    }

    pub fn total_votes(&self) -> u64 {
        self.votes_for.saturating_add(self.votes_against)
    }

    pub fn status(&self, height: BlockHeight) -> ProposalStatus {
        match self.terminal_state() {
            Some(TerminalState::Executed) => ProposalStatus::Executed,
            Some(TerminalState::Cancelled) => ProposalStatus::Cancelled,
            None if height < self.voting_start => ProposalStatus::Pending,
            None if self.window_closed(height) => ProposalStatus::Closed,
            None => ProposalStatus::Open,
        }
    }

    pub(crate) fn tally(&mut self, direction: VoteDirection) {
        match direction {
            VoteDirection::For => self.votes_for = self.votes_for.saturating_add(1),
            VoteDirection::Against => self.votes_against = self.votes_against.saturating_add(1),
        }
    }

    pub fn view(&self) -> ProposalView {
        ProposalView {
            creator: self.creator.clone(),
            description: self.description.clone(),
            voting_start: self.voting_start,
            voting_end: self.voting_end,
            votes_for: self.votes_for,
            votes_against: self.votes_against,
            executed: self.executed,
            cancelled: self.cancelled,
        }
    }
}

/// A read-only snapshot of a proposal, as returned by `get-proposal-details`.
///
/// Carries no id: callers already know which proposal they asked for, and
/// `list-proposals` returns views in id order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalView {
    pub creator: Principal,
    pub description: String,
    pub voting_start: BlockHeight,
    pub voting_end: BlockHeight,
    pub votes_for: u64,
    pub votes_against: u64,
    pub executed: bool,
    pub cancelled: bool,
}
