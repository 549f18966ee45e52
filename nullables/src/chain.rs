//! Nullable chain — deterministic block height and caller for testing.

use proposalnet_types::{BlockHeight, Principal};
use std::cell::{Cell, RefCell};

/// A deterministic host chain for testing.
///
/// Height only advances when you tell it to, and never moves backwards.
pub struct NullChain {
    height: Cell<u64>,
    caller: RefCell<Principal>,
}

impl NullChain {
    pub fn new(initial_height: u64) -> Self {
        Self {
            height: Cell::new(initial_height),
            caller: RefCell::new(Principal::new("ST0000000000000000000000000000000000DEPLOYER")),
        }
    }

    /// Get the current block height.
    pub fn height(&self) -> BlockHeight {
        BlockHeight::new(self.height.get())
    }

    /// Mine `blocks` blocks.
    pub fn advance(&self, blocks: u64) {
        self.height.set(self.height.get().saturating_add(blocks));
    }

    /// Jump to a specific height.
    ///
    /// # Panics
    /// Panics if `height` is below the current height; chains do not rewind.
    pub fn set_height(&self, height: u64) {
        assert!(
            height >= self.height.get(),
            "block height must not decrease ({} -> {height})",
            self.height.get()
        );
        self.height.set(height);
    }

    /// The identity that will sign the next call.
    pub fn caller(&self) -> Principal {
        self.caller.borrow().clone()
    }

    /// Switch the identity that signs subsequent calls.
    pub fn sign_as(&self, caller: impl Into<Principal>) {
        *self.caller.borrow_mut() = caller.into();
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_set() {
        let chain = NullChain::new(1000);
        chain.advance(50);
        assert_eq!(chain.height(), BlockHeight::new(1050));
        chain.set_height(1100);
        assert_eq!(chain.height(), BlockHeight::new(1100));
    }

    #[test]
    #[should_panic(expected = "must not decrease")]
    fn rewinding_panics() {
        let chain = NullChain::new(1000);
        chain.set_height(999);
    }

    #[test]
    fn sign_as_switches_caller() {
        let chain = NullChain::default();
        chain.sign_as("STVOTERA");
        assert_eq!(chain.caller().as_str(), "STVOTERA");
    }
}
