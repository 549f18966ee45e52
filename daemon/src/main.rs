//! ProposalNet host — applies one governance call per invocation.
//!
//! The engine state lives in a snapshot file. Each run loads it, applies the
//! call at the given block height on behalf of the given caller, prints the
//! outcome as JSON, and saves the state back only if a mutation committed.

mod call;
mod config;
mod state;

use anyhow::Context;
use call::{apply, outcome, Call};
use clap::Parser;
use config::DaemonConfig;
use proposalnet_governance::GovernanceEvent;
use proposalnet_types::{BlockHeight, Principal};
use proposalnet_utils::LogFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "proposalnet", about = "ProposalNet governance host")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "PROPOSALNET_CONFIG")]
    config: Option<PathBuf>,

    /// Engine state file.
    #[arg(long, env = "PROPOSALNET_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Identity the call is made on behalf of.
    #[arg(long, env = "PROPOSALNET_CALLER")]
    caller: Option<Principal>,

    /// Current block height of the hosting chain.
    #[arg(long, env = "PROPOSALNET_HEIGHT")]
    height: Option<BlockHeight>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "PROPOSALNET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "PROPOSALNET_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    call: Call,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(state_file) = cli.state_file {
        config.state_file = state_file;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    proposalnet_utils::init_logging(config.log_format, &config.log_level);

    let mut lock = state::StateLock::open(&config.state_file)?;
    let _held = lock.acquire()?;
    let mut engine = state::load_engine(&config.state_file, &config.governance)?;
    let verdict = apply(&mut engine, &cli.call, cli.caller.as_ref(), cli.height)?;

    if verdict.is_ok() && cli.call.mutates() {
        for event in engine.drain_events() {
            log_event(&event, config.block_time_secs);
        }
        state::save_engine(&config.state_file, &engine)?;
    }

    println!("{}", outcome(&verdict));
    Ok(if verdict.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn log_event(event: &GovernanceEvent, block_time_secs: u64) {
    match event {
        GovernanceEvent::ProposalCreated {
            proposal,
            voting_start,
            voting_end,
            ..
        } => tracing::info!(
            %proposal,
            "proposal created, voting open for {}",
            proposalnet_utils::format_block_span(
                voting_start.blocks_until(*voting_end),
                block_time_secs
            )
        ),
        other => tracing::info!(proposal = %other.proposal(), event = ?other, "governance event"),
    }
}
