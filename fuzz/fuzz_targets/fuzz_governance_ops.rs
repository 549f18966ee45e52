#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use proposalnet_governance::{CallContext, GovernanceEngine};
use proposalnet_types::{BlockHeight, ProposalId};

#[derive(Arbitrary, Debug)]
enum Op {
    Create { caller: u8, duration: u16 },
    Vote { caller: u8, proposal: u8, vote_for: bool },
    Execute { caller: u8, proposal: u8 },
    Cancel { caller: u8, proposal: u8 },
    Advance { blocks: u8 },
}

// Drive the engine with arbitrary call sequences. No call may panic, and the
// terminal-state and tally invariants must hold after every step.
fuzz_target!(|ops: Vec<Op>| {
    let mut engine = GovernanceEngine::new();
    let mut height = 0u64;
    let ctx = |caller: u8, height: u64| {
        CallContext::new(format!("STFUZZ{}", caller % 8), BlockHeight::new(height))
    };

    for op in ops {
        let before = engine.list_proposals();
        let result = match op {
            Op::Create { caller, duration } => engine
                .create_proposal(&ctx(caller, height), "fuzz", u64::from(duration))
                .map(|_| ()),
            Op::Vote { caller, proposal, vote_for } => {
                engine.vote(&ctx(caller, height), ProposalId::new(proposal.into()), vote_for)
            }
            Op::Execute { caller, proposal } => {
                engine.execute_proposal(&ctx(caller, height), ProposalId::new(proposal.into()))
            }
            Op::Cancel { caller, proposal } => {
                engine.cancel_proposal(&ctx(caller, height), ProposalId::new(proposal.into()))
            }
            Op::Advance { blocks } => {
                height += u64::from(blocks);
                Ok(())
            }
        };

        let after = engine.list_proposals();
        if result.is_err() {
            assert_eq!(before, after, "rejected call mutated state");
        }
        for view in &after {
            assert!(!(view.executed && view.cancelled));
            assert!(view.voting_end > view.voting_start);
            if view.executed {
                assert!(view.votes_for > view.votes_against);
            }
        }
        for (old, new) in before.iter().zip(&after) {
            assert!(new.votes_for >= old.votes_for);
            assert!(new.votes_against >= old.votes_against);
            assert!(!old.executed || new.executed);
            assert!(!old.cancelled || new.cancelled);
        }
    }
});
