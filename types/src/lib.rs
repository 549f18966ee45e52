//! Fundamental types for ProposalNet.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! caller identities, proposal identifiers, block heights, and vote directions.

pub mod error;
pub mod height;
pub mod id;
pub mod principal;
pub mod vote;

pub use error::TypesError;
pub use height::BlockHeight;
pub use id::ProposalId;
pub use principal::Principal;
pub use vote::VoteDirection;
