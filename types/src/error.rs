//! Errors raised while parsing or validating fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid principal: {0:?}")]
    InvalidPrincipal(String),

    #[error("invalid proposal id: {0:?}")]
    InvalidProposalId(String),

    #[error("invalid block height: {0:?}")]
    InvalidBlockHeight(String),

    #[error("invalid vote direction: {0:?} (expected \"for\" or \"against\")")]
    InvalidVoteDirection(String),
}
