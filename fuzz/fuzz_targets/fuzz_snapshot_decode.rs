#![no_main]

use libfuzzer_sys::fuzz_target;

use proposalnet_governance::GovernanceEngine;

// Arbitrary bytes must either restore a consistent engine or be rejected;
// decoding must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(engine) = GovernanceEngine::load_state(data) {
        for view in engine.list_proposals() {
            assert!(!(view.executed && view.cancelled));
            if view.executed {
                assert!(view.votes_for > view.votes_against);
            }
            assert!(view.voting_start < view.voting_end);
        }
        let _ = engine.save_state();
    }
});
