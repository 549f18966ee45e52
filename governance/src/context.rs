//! Per-call inputs supplied by the hosting chain.

use proposalnet_types::{BlockHeight, Principal};

/// Who is calling, and at what block height the call is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Principal,
    pub block_height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: impl Into<Principal>, block_height: BlockHeight) -> Self {
        Self {
            caller: caller.into(),
            block_height,
        }
    }

    /// Same caller, applied at a different height.
    pub fn at(&self, block_height: BlockHeight) -> Self {
        Self {
            caller: self.caller.clone(),
            block_height,
        }
    }
}
