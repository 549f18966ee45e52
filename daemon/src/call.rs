//! Governance calls accepted by the host and their JSON outcomes.
//!
//! Every call prints exactly one object to stdout: `{"ok": <value>}` on
//! success, `{"error": "<reason>", "code": <n>}` when the engine rejects it.

use clap::Subcommand;
use proposalnet_governance::{CallContext, GovernanceEngine, GovernanceError};
use proposalnet_types::{BlockHeight, Principal, ProposalId, VoteDirection};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Clone, Debug, Subcommand)]
pub enum Call {
    /// Create a proposal whose voting window opens at --height.
    CreateProposal {
        description: String,
        /// Window length in blocks. Must be positive.
        #[arg(allow_negative_numbers = true)]
        voting_duration: i64,
    },
    /// Vote on a proposal ("for"/"against", or "true"/"false").
    Vote {
        proposal: ProposalId,
        direction: VoteDirection,
    },
    /// Execute a proposal after its window closed with a majority in favour.
    ExecuteProposal { proposal: ProposalId },
    /// Cancel a proposal (creator only).
    CancelProposal { proposal: ProposalId },
    /// Show a proposal as last committed.
    GetProposalDetails { proposal: ProposalId },
    /// Number of proposals created so far.
    ProposalCount,
    /// Every proposal in id order.
    ListProposals,
    /// How a voter voted on a proposal (null if they have not).
    GetVote { proposal: ProposalId, voter: Principal },
    /// Whether a voter has voted on a proposal.
    HasVoted { proposal: ProposalId, voter: Principal },
    /// Lifecycle status of a proposal at --height.
    ProposalStatus { proposal: ProposalId },
}

/// A call could not be attempted because the host was not given enough context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("{0} requires --caller")]
    MissingCaller(&'static str),

    #[error("{0} requires --height")]
    MissingHeight(&'static str),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateProposal { .. } => "create-proposal",
            Self::Vote { .. } => "vote",
            Self::ExecuteProposal { .. } => "execute-proposal",
            Self::CancelProposal { .. } => "cancel-proposal",
            Self::GetProposalDetails { .. } => "get-proposal-details",
            Self::ProposalCount => "proposal-count",
            Self::ListProposals => "list-proposals",
            Self::GetVote { .. } => "get-vote",
            Self::HasVoted { .. } => "has-voted",
            Self::ProposalStatus { .. } => "proposal-status",
        }
    }

    /// Whether a successful call changes engine state (and must be saved).
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::CreateProposal { .. }
                | Self::Vote { .. }
                | Self::ExecuteProposal { .. }
                | Self::CancelProposal { .. }
        )
    }

    fn needs_caller(&self) -> bool {
        self.mutates()
    }

    fn needs_height(&self) -> bool {
        self.mutates() || matches!(self, Self::ProposalStatus { .. })
    }
}

/// Apply `call` to `engine`.
///
/// The outer `Result` is a usage problem (nothing was attempted); the inner
/// one is the engine's verdict.
pub fn apply(
    engine: &mut GovernanceEngine,
    call: &Call,
    caller: Option<&Principal>,
    height: Option<BlockHeight>,
) -> Result<Result<Value, GovernanceError>, UsageError> {
    if call.needs_caller() && caller.is_none() {
        return Err(UsageError::MissingCaller(call.name()));
    }
    if call.needs_height() && height.is_none() {
        return Err(UsageError::MissingHeight(call.name()));
    }
    let ctx = match (caller, height) {
        (Some(caller), Some(height)) => Some(CallContext::new(caller.clone(), height)),
        _ => None,
    };
    let height = height.unwrap_or_default();

    let verdict = match (call, ctx.as_ref()) {
        (
            Call::CreateProposal {
                description,
                voting_duration,
            },
            Some(ctx),
        ) => {
            // Negative durations are as invalid as zero.
            let duration = u64::try_from(*voting_duration).unwrap_or(0);
            engine
                .create_proposal(ctx, description, duration)
                .map(|id| json!(id))
        }
        (Call::Vote { proposal, direction }, Some(ctx)) => engine
            .vote(ctx, *proposal, direction.is_for())
            .map(|()| json!(true)),
        (Call::ExecuteProposal { proposal }, Some(ctx)) => engine
            .execute_proposal(ctx, *proposal)
            .map(|()| json!(true)),
        (Call::CancelProposal { proposal }, Some(ctx)) => engine
            .cancel_proposal(ctx, *proposal)
            .map(|()| json!(true)),
        (Call::GetProposalDetails { proposal }, _) => engine
            .get_proposal_details(*proposal)
            .map(|view| json!(view)),
        (Call::ProposalCount, _) => Ok(json!(engine.proposal_count())),
        (Call::ListProposals, _) => Ok(json!(engine.list_proposals())),
        (Call::GetVote { proposal, voter }, _) => engine
            .get_vote(*proposal, voter)
            .map(|vote| json!(vote.map(|d| d.as_str()))),
        (Call::HasVoted { proposal, voter }, _) => engine
            .has_voted(*proposal, voter)
            .map(|voted| json!(voted)),
        (Call::ProposalStatus { proposal }, _) => engine
            .proposal_status(*proposal, height)
            .map(|status| json!(status)),
        // Mutating calls without a context were rejected above.
        (_, None) => return Err(UsageError::MissingCaller(call.name())),
    };
    Ok(verdict)
}

/// Render an engine verdict as the host's JSON outcome.
pub fn outcome(verdict: &Result<Value, GovernanceError>) -> Value {
    match verdict {
        Ok(value) => json!({ "ok": value }),
        Err(e) => json!({ "error": e.to_string(), "code": e.code() }),
    }
}
