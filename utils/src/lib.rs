//! Shared utilities for ProposalNet.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_block_span, format_duration};
