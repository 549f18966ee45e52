//! Nullable infrastructure for deterministic testing.
//!
//! The governance engine consumes two things from its host chain (current
//! block height and caller identity) plus an optional storage backend. This
//! crate provides test-friendly stand-ins that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod store;

pub use chain::NullChain;
pub use store::NullGovernanceStore;
