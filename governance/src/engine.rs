//! Core governance engine — proposal store plus voting ledger.
//!
//! Every mutating call is split in two: a `check_*` pass over `&self` that
//! runs the preconditions in order and returns the first failure, then a
//! commit that cannot fail. A rejected call therefore leaves the engine
//! exactly as it found it.

use crate::context::CallContext;
use crate::error::GovernanceError;
use crate::event::GovernanceEvent;
use crate::ledger::{VoteRecord, VotingLedger};
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalStatus, ProposalView};
use proposalnet_types::{BlockHeight, Principal, ProposalId, VoteDirection};
use tracing::{debug, trace};

/// The governance engine. Owns every proposal and vote record.
///
/// Proposals live in an arena indexed by id; ids are assigned sequentially
/// from zero and never reused.
#[derive(Debug, Default)]
pub struct GovernanceEngine {
    proposals: Vec<Proposal>,
    ledger: VotingLedger,
    params: GovernanceParams,
    events: Vec<GovernanceEvent>,
}

impl GovernanceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: GovernanceParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Rebuild an engine from already-validated parts (see `snapshot`).
    pub(crate) fn from_parts(
        proposals: Vec<Proposal>,
        ledger: VotingLedger,
        params: GovernanceParams,
    ) -> Self {
        Self {
            proposals,
            ledger,
            params,
            events: Vec::new(),
        }
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// Replace the creation limits. Existing proposals are unaffected.
    pub fn set_params(&mut self, params: GovernanceParams) {
        self.params = params;
    }

    pub(crate) fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub(crate) fn vote_records(&self) -> Vec<VoteRecord> {
        self.ledger.records()
    }

    // ── create-proposal ────────────────────────────────────────────────

    /// Create a proposal whose voting window opens at the current height and
    /// stays open for `voting_duration` blocks.
    pub fn create_proposal(
        &mut self,
        ctx: &CallContext,
        description: &str,
        voting_duration: u64,
    ) -> Result<ProposalId, GovernanceError> {
        let voting_end = self
            .check_create(ctx, description, voting_duration)
            .inspect_err(|e| log_rejection("create-proposal", ctx, e))?;

        let id = self.next_id();
        self.proposals.push(Proposal::new(
            id,
            ctx.caller.clone(),
            description.to_string(),
            ctx.block_height,
            voting_end,
        ));
        self.events.push(GovernanceEvent::ProposalCreated {
            proposal: id,
            creator: ctx.caller.clone(),
            voting_start: ctx.block_height,
            voting_end,
        });
        debug!(
            proposal = %id,
            creator = %ctx.caller,
            voting_start = ctx.block_height.as_u64(),
            voting_end = voting_end.as_u64(),
            "proposal created"
        );
        Ok(id)
    }

    fn check_create(
        &self,
        ctx: &CallContext,
        description: &str,
        voting_duration: u64,
    ) -> Result<BlockHeight, GovernanceError> {
        if !self.params.accepts_duration(voting_duration) {
            return Err(GovernanceError::InvalidVotingDuration);
        }
        let voting_end = ctx
            .block_height
            .checked_add(voting_duration)
            .ok_or(GovernanceError::InvalidVotingDuration)?;
        if !self.params.accepts_description(description) {
            return Err(GovernanceError::InvalidDescription);
        }
        Ok(voting_end)
    }

    // ── vote ───────────────────────────────────────────────────────────

    /// Cast the caller's single vote on a proposal.
    pub fn vote(
        &mut self,
        ctx: &CallContext,
        id: ProposalId,
        vote_for: bool,
    ) -> Result<(), GovernanceError> {
        let direction = VoteDirection::from(vote_for);
        let index = self
            .check_vote(ctx, id)
            .inspect_err(|e| log_rejection("vote", ctx, e))?;

        // check_vote established that no record exists, so this insert succeeds.
        if self.ledger.record(id, ctx.caller.clone(), direction) {
            self.proposals[index].tally(direction);
        }
        self.events.push(GovernanceEvent::VoteCast {
            proposal: id,
            voter: ctx.caller.clone(),
            direction,
            height: ctx.block_height,
        });
        debug!(
            proposal = %id,
            voter = %ctx.caller,
            %direction,
            height = ctx.block_height.as_u64(),
            "vote recorded"
        );
        Ok(())
    }

    fn check_vote(&self, ctx: &CallContext, id: ProposalId) -> Result<usize, GovernanceError> {
        let index = self.index_of(id)?;
        let proposal = &self.proposals[index];
        if proposal.is_terminal() {
            return Err(GovernanceError::VotingClosed);
        }
        if !proposal.window_contains(ctx.block_height) {
            return Err(GovernanceError::VotingClosed);
        }
        if self.ledger.has_voted(id, &ctx.caller) {
            return Err(GovernanceError::AlreadyVoted);
        }
        Ok(index)
    }

    // ── execute-proposal ───────────────────────────────────────────────

    /// Execute a proposal whose window has closed with a strict majority in favour.
    ///
    /// Open to any caller.
    pub fn execute_proposal(
        &mut self,
        ctx: &CallContext,
        id: ProposalId,
    ) -> Result<(), GovernanceError> {
        let index = self
            .check_execute(ctx, id)
            .inspect_err(|e| log_rejection("execute-proposal", ctx, e))?;

        let proposal = &mut self.proposals[index];
        proposal.executed = true;
        self.events.push(GovernanceEvent::ProposalExecuted {
            proposal: id,
            executor: ctx.caller.clone(),
            votes_for: proposal.votes_for,
            votes_against: proposal.votes_against,
            height: ctx.block_height,
        });
        debug!(
            proposal = %id,
            executor = %ctx.caller,
            votes_for = proposal.votes_for,
            votes_against = proposal.votes_against,
            "proposal executed"
        );
        Ok(())
    }

    fn check_execute(&self, ctx: &CallContext, id: ProposalId) -> Result<usize, GovernanceError> {
        let index = self.index_of(id)?;
        let proposal = &self.proposals[index];
        if let Some(state) = proposal.terminal_state() {
            return Err(GovernanceError::AlreadyFinalized(state));
        }
        if !proposal.window_closed(ctx.block_height) {
            return Err(GovernanceError::VotingStillOpen);
        }
        if !proposal.has_majority() {
            return Err(GovernanceError::InsufficientVotes);
        }
        Ok(index)
    }

    // ── cancel-proposal ────────────────────────────────────────────────

    /// Cancel a proposal. Only its creator may do so, and only while it is active.
    pub fn cancel_proposal(
        &mut self,
        ctx: &CallContext,
        id: ProposalId,
    ) -> Result<(), GovernanceError> {
        let index = self
            .check_cancel(ctx, id)
            .inspect_err(|e| log_rejection("cancel-proposal", ctx, e))?;

        self.proposals[index].cancelled = true;
        self.events.push(GovernanceEvent::ProposalCancelled {
            proposal: id,
            height: ctx.block_height,
        });
        debug!(proposal = %id, creator = %ctx.caller, "proposal cancelled");
        Ok(())
    }

    fn check_cancel(&self, ctx: &CallContext, id: ProposalId) -> Result<usize, GovernanceError> {
        let index = self.index_of(id)?;
        let proposal = &self.proposals[index];
        if proposal.creator != ctx.caller {
            return Err(GovernanceError::NotAuthorized);
        }
        if let Some(state) = proposal.terminal_state() {
            return Err(GovernanceError::AlreadyFinalized(state));
        }
        Ok(index)
    }

    // ── queries ────────────────────────────────────────────────────────

    /// Read-only snapshot of a proposal as last committed.
    pub fn get_proposal_details(&self, id: ProposalId) -> Result<ProposalView, GovernanceError> {
        self.proposal(id).map(Proposal::view)
    }

    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        let index = self.index_of(id)?;
        Ok(&self.proposals[index])
    }

    /// Number of proposals ever created. Also the id the next proposal will get.
    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn list_proposals(&self) -> Vec<ProposalView> {
        self.proposals.iter().map(Proposal::view).collect()
    }

    /// How `voter` voted on a proposal, if at all.
    pub fn get_vote(
        &self,
        id: ProposalId,
        voter: &Principal,
    ) -> Result<Option<VoteDirection>, GovernanceError> {
        self.index_of(id)?;
        Ok(self.ledger.get(id, voter))
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Principal) -> Result<bool, GovernanceError> {
        self.index_of(id)?;
        Ok(self.ledger.has_voted(id, voter))
    }

    pub fn proposal_status(
        &self,
        id: ProposalId,
        height: BlockHeight,
    ) -> Result<ProposalStatus, GovernanceError> {
        self.proposal(id).map(|p| p.status(height))
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.events)
    }

    // ── helpers ────────────────────────────────────────────────────────

    fn next_id(&self) -> ProposalId {
        ProposalId::new(self.proposals.len() as u64)
    }

    fn index_of(&self, id: ProposalId) -> Result<usize, GovernanceError> {
        id.index()
            .filter(|&i| i < self.proposals.len())
            .ok_or(GovernanceError::ProposalNotFound(id))
    }
}

fn log_rejection(op: &'static str, ctx: &CallContext, err: &GovernanceError) {
    trace!(
        op,
        caller = %ctx.caller,
        height = ctx.block_height.as_u64(),
        reason = %err,
        "governance call rejected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::TerminalState;

    const DESCRIPTION: &str = "Proposal to allocate community funds";

    fn ctx(caller: &str, height: u64) -> CallContext {
        CallContext::new(caller, BlockHeight::new(height))
    }

    /// Engine with proposal 0 created by `STCREATOR` at height 1000, window 100 blocks.
    fn engine_with_proposal() -> GovernanceEngine {
        let mut engine = GovernanceEngine::new();
        let id = engine
            .create_proposal(&ctx("STCREATOR", 1000), DESCRIPTION, 100)
            .unwrap();
        assert_eq!(id, ProposalId::FIRST);
        engine
    }

    fn cast(engine: &mut GovernanceEngine, votes_for: u64, votes_against: u64, height: u64) {
        for i in 0..votes_for {
            engine
                .vote(&ctx(&format!("STYEA{i}"), height), ProposalId::FIRST, true)
                .unwrap();
        }
        for i in 0..votes_against {
            engine
                .vote(&ctx(&format!("STNAY{i}"), height), ProposalId::FIRST, false)
                .unwrap();
        }
    }

    // ── create-proposal ──────────────────────────────────────────────────

    #[test]
    fn create_assigns_window_from_current_height() {
        let engine = engine_with_proposal();
        let view = engine.get_proposal_details(ProposalId::FIRST).unwrap();
        assert_eq!(view.voting_start, BlockHeight::new(1000));
        assert_eq!(view.voting_end, BlockHeight::new(1100));
        assert_eq!(view.creator, Principal::new("STCREATOR"));
        assert_eq!((view.votes_for, view.votes_against), (0, 0));
        assert!(!view.executed && !view.cancelled);
    }

    #[test]
    fn create_ids_are_sequential() {
        let mut engine = GovernanceEngine::new();
        for expected in 0..5 {
            let id = engine.create_proposal(&ctx("STA", 1), DESCRIPTION, 10).unwrap();
            assert_eq!(id.as_u64(), expected);
        }
        assert_eq!(engine.proposal_count(), 5);
    }

    #[test]
    fn zero_duration_consumes_no_id() {
        let mut engine = GovernanceEngine::new();
        let err = engine
            .create_proposal(&ctx("STA", 1000), "Invalid proposal", 0)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidVotingDuration));
        assert_eq!(engine.proposal_count(), 0);
        let id = engine.create_proposal(&ctx("STA", 1000), DESCRIPTION, 1).unwrap();
        assert_eq!(id, ProposalId::FIRST);
    }

    #[test]
    fn overflowing_window_is_invalid_duration() {
        let mut engine = GovernanceEngine::new();
        let err = engine
            .create_proposal(&ctx("STA", u64::MAX - 5), DESCRIPTION, 10)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidVotingDuration));
    }

    #[test]
    fn duration_above_configured_max_is_rejected() {
        let mut engine = GovernanceEngine::with_params(GovernanceParams {
            max_voting_duration: Some(50),
            ..Default::default()
        });
        assert!(matches!(
            engine.create_proposal(&ctx("STA", 0), DESCRIPTION, 51),
            Err(GovernanceError::InvalidVotingDuration)
        ));
        assert!(engine.create_proposal(&ctx("STA", 0), DESCRIPTION, 50).is_ok());
    }

    #[test]
    fn blank_description_is_rejected_after_duration() {
        let mut engine = GovernanceEngine::new();
        assert!(matches!(
            engine.create_proposal(&ctx("STA", 0), "  ", 10),
            Err(GovernanceError::InvalidDescription)
        ));
        // Duration is checked first.
        assert!(matches!(
            engine.create_proposal(&ctx("STA", 0), "", 0),
            Err(GovernanceError::InvalidVotingDuration)
        ));
    }

    // ── vote ─────────────────────────────────────────────────────────────

    #[test]
    fn vote_increments_matching_tally() {
        let mut engine = engine_with_proposal();
        engine.vote(&ctx("STA", 1050), ProposalId::FIRST, true).unwrap();
        engine.vote(&ctx("STB", 1050), ProposalId::FIRST, false).unwrap();
        engine.vote(&ctx("STC", 1099), ProposalId::FIRST, true).unwrap();
        let view = engine.get_proposal_details(ProposalId::FIRST).unwrap();
        assert_eq!((view.votes_for, view.votes_against), (2, 1));
        assert_eq!(
            engine.get_vote(ProposalId::FIRST, &Principal::new("STB")).unwrap(),
            Some(VoteDirection::Against)
        );
    }

    #[test]
    fn second_vote_is_rejected_and_tally_unchanged() {
        let mut engine = engine_with_proposal();
        engine.vote(&ctx("STA", 1050), ProposalId::FIRST, true).unwrap();
        let err = engine.vote(&ctx("STA", 1051), ProposalId::FIRST, false).unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyVoted));
        let view = engine.get_proposal_details(ProposalId::FIRST).unwrap();
        assert_eq!((view.votes_for, view.votes_against), (1, 0));
    }

    #[test]
    fn vote_outside_window_is_closed() {
        let mut engine = engine_with_proposal();
        assert!(matches!(
            engine.vote(&ctx("STA", 999), ProposalId::FIRST, true),
            Err(GovernanceError::VotingClosed)
        ));
        assert!(matches!(
            engine.vote(&ctx("STA", 1100), ProposalId::FIRST, true),
            Err(GovernanceError::VotingClosed)
        ));
        assert!(matches!(
            engine.vote(&ctx("STA", 1150), ProposalId::FIRST, false),
            Err(GovernanceError::VotingClosed)
        ));
        assert!(!engine.has_voted(ProposalId::FIRST, &Principal::new("STA")).unwrap());
    }

    #[test]
    fn vote_on_unknown_proposal() {
        let mut engine = engine_with_proposal();
        assert!(matches!(
            engine.vote(&ctx("STA", 1050), ProposalId::new(7), true),
            Err(GovernanceError::ProposalNotFound(id)) if id == ProposalId::new(7)
        ));
    }

    #[test]
    fn vote_on_cancelled_proposal_is_closed_even_in_window() {
        let mut engine = engine_with_proposal();
        engine.cancel_proposal(&ctx("STCREATOR", 1010), ProposalId::FIRST).unwrap();
        assert!(matches!(
            engine.vote(&ctx("STA", 1050), ProposalId::FIRST, true),
            Err(GovernanceError::VotingClosed)
        ));
    }

    #[test]
    fn terminal_check_precedes_duplicate_check() {
        let mut engine = engine_with_proposal();
        engine.vote(&ctx("STA", 1050), ProposalId::FIRST, true).unwrap();
        engine.cancel_proposal(&ctx("STCREATOR", 1060), ProposalId::FIRST).unwrap();
        assert!(matches!(
            engine.vote(&ctx("STA", 1070), ProposalId::FIRST, true),
            Err(GovernanceError::VotingClosed)
        ));
    }

    // ── execute-proposal ─────────────────────────────────────────────────

    #[test]
    fn execute_with_majority_after_window() {
        let mut engine = engine_with_proposal();
        cast(&mut engine, 10, 2, 1050);
        engine.execute_proposal(&ctx("STANYONE", 1100), ProposalId::FIRST).unwrap();
        let view = engine.get_proposal_details(ProposalId::FIRST).unwrap();
        assert!(view.executed);
        assert!(!view.cancelled);
    }

    #[test]
    fn execute_while_open_is_rejected() {
        let mut engine = engine_with_proposal();
        cast(&mut engine, 3, 0, 1050);
        assert!(matches!(
            engine.execute_proposal(&ctx("STA", 1099), ProposalId::FIRST),
            Err(GovernanceError::VotingStillOpen)
        ));
        assert!(!engine.proposal(ProposalId::FIRST).unwrap().executed);
    }

    #[test]
    fn execute_tie_is_insufficient() {
        let mut engine = engine_with_proposal();
        cast(&mut engine, 2, 2, 1050);
        assert!(matches!(
            engine.execute_proposal(&ctx("STA", 1200), ProposalId::FIRST),
            Err(GovernanceError::InsufficientVotes)
        ));
    }

    #[test]
    fn execute_without_votes_is_insufficient() {
        let mut engine = engine_with_proposal();
        assert!(matches!(
            engine.execute_proposal(&ctx("STA", 1200), ProposalId::FIRST),
            Err(GovernanceError::InsufficientVotes)
        ));
    }

    #[test]
    fn execute_twice_reports_already_executed() {
        let mut engine = engine_with_proposal();
        cast(&mut engine, 1, 0, 1000);
        engine.execute_proposal(&ctx("STA", 1100), ProposalId::FIRST).unwrap();
        let err = engine.execute_proposal(&ctx("STA", 1101), ProposalId::FIRST).unwrap_err();
        assert!(matches!(err, GovernanceError::AlreadyFinalized(TerminalState::Executed)));
        assert_eq!(err.to_string(), "proposal already executed");
    }

    #[test]
    fn execute_cancelled_reports_already_cancelled() {
        let mut engine = engine_with_proposal();
        cast(&mut engine, 5, 0, 1050);
        engine.cancel_proposal(&ctx("STCREATOR", 1060), ProposalId::FIRST).unwrap();
        let err = engine.execute_proposal(&ctx("STA", 1200), ProposalId::FIRST).unwrap_err();
        assert_eq!(err.to_string(), "proposal already cancelled");
    }

    // ── cancel-proposal ──────────────────────────────────────────────────

    #[test]
    fn only_creator_may_cancel() {
        let mut engine = engine_with_proposal();
        assert!(matches!(
            engine.cancel_proposal(&ctx("STINTRUDER", 1010), ProposalId::FIRST),
            Err(GovernanceError::NotAuthorized)
        ));
        engine.cancel_proposal(&ctx("STCREATOR", 1010), ProposalId::FIRST).unwrap();
        assert!(engine.proposal(ProposalId::FIRST).unwrap().cancelled);
    }

    #[test]
    fn cancel_after_execute_reports_already_executed() {
        let mut engine = engine_with_proposal();
        cast(&mut engine, 10, 2, 1050);
        engine.execute_proposal(&ctx("STA", 1100), ProposalId::FIRST).unwrap();
        let err = engine.cancel_proposal(&ctx("STCREATOR", 1101), ProposalId::FIRST).unwrap_err();
        assert_eq!(err.to_string(), "proposal already executed");
        let view = engine.get_proposal_details(ProposalId::FIRST).unwrap();
        assert!(view.executed && !view.cancelled);
    }

    #[test]
    fn authorization_precedes_terminal_check_on_cancel() {
        let mut engine = engine_with_proposal();
        engine.cancel_proposal(&ctx("STCREATOR", 1010), ProposalId::FIRST).unwrap();
        assert!(matches!(
            engine.cancel_proposal(&ctx("STOTHER", 1011), ProposalId::FIRST),
            Err(GovernanceError::NotAuthorized)
        ));
        assert!(matches!(
            engine.cancel_proposal(&ctx("STCREATOR", 1011), ProposalId::FIRST),
            Err(GovernanceError::AlreadyFinalized(TerminalState::Cancelled))
        ));
    }

    #[test]
    fn cancel_allowed_after_window_closes() {
        let mut engine = engine_with_proposal();
        engine.cancel_proposal(&ctx("STCREATOR", 5000), ProposalId::FIRST).unwrap();
        assert_eq!(
            engine.proposal_status(ProposalId::FIRST, BlockHeight::new(5000)).unwrap(),
            ProposalStatus::Cancelled
        );
    }

    // ── queries & events ─────────────────────────────────────────────────

    #[test]
    fn unknown_details_is_not_found() {
        let engine = engine_with_proposal();
        assert!(matches!(
            engine.get_proposal_details(ProposalId::new(999)),
            Err(GovernanceError::ProposalNotFound(_))
        ));
        assert!(engine.get_vote(ProposalId::new(999), &Principal::new("STA")).is_err());
    }

    #[test]
    fn events_only_for_committed_calls() {
        let mut engine = engine_with_proposal();
        engine.vote(&ctx("STA", 1050), ProposalId::FIRST, true).unwrap();
        let _ = engine.vote(&ctx("STA", 1050), ProposalId::FIRST, true);
        let _ = engine.execute_proposal(&ctx("STA", 1050), ProposalId::FIRST);
        engine.execute_proposal(&ctx("STB", 1100), ProposalId::FIRST).unwrap();

        let events = engine.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], GovernanceEvent::ProposalCreated { .. }));
        assert!(matches!(
            events[1],
            GovernanceEvent::VoteCast { direction: VoteDirection::For, .. }
        ));
        assert!(matches!(
            events[2],
            GovernanceEvent::ProposalExecuted { votes_for: 1, votes_against: 0, .. }
        ));
        assert!(engine.drain_events().is_empty());
    }
}
