//! Engine state file: load before a call, write back after a committed mutation.
//!
//! Callers hold a [`StateLock`] from load to save so that overlapping
//! invocations against the same file apply one after the other.

use anyhow::Context;
use fd_lock::{RwLock, RwLockWriteGuard};
use proposalnet_governance::{GovernanceEngine, GovernanceParams};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Advisory lock on a sibling `<state file>.lock`.
pub struct StateLock {
    path: PathBuf,
    lock: RwLock<File>,
}

impl StateLock {
    /// Open (creating if needed) the lock file guarding `state`.
    pub fn open(state: &Path) -> anyhow::Result<Self> {
        let path = lock_path(state);
        ensure_parent(&path)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to open lock {}", path.display()))?;
        Ok(Self {
            path,
            lock: RwLock::new(file),
        })
    }

    /// Block until this process holds the lock exclusively.
    pub fn acquire(&mut self) -> anyhow::Result<RwLockWriteGuard<'_, File>> {
        tracing::trace!("waiting for {}", self.path.display());
        self.lock
            .write()
            .with_context(|| format!("failed to lock {}", self.path.display()))
    }
}

fn lock_path(state: &Path) -> PathBuf {
    let mut name = state.file_name().map(OsString::from).unwrap_or_default();
    name.push(".lock");
    state.with_file_name(name)
}

/// Create the parent directory of `path` and return it.
fn ensure_parent(path: &Path) -> anyhow::Result<&Path> {
    match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            Ok(dir)
        }
        None => Ok(Path::new(".")),
    }
}

/// Load the engine from `path`, or start a fresh one if the file does not exist.
///
/// `params` from the host configuration take precedence over those stored in
/// the snapshot; they only affect proposals created from now on.
pub fn load_engine(path: &Path, params: &GovernanceParams) -> anyhow::Result<GovernanceEngine> {
    if !path.exists() {
        tracing::info!("no state at {}, starting a fresh engine", path.display());
        return Ok(GovernanceEngine::with_params(params.clone()));
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read state {}", path.display()))?;
    let mut engine = GovernanceEngine::load_state(&bytes)
        .with_context(|| format!("failed to load state {}", path.display()))?;
    if engine.params() != params {
        tracing::info!("applying configured governance params over stored ones");
        engine.set_params(params.clone());
    }
    Ok(engine)
}

/// Write the engine to `path` via a uniquely named sibling temp file and
/// rename, so a crash mid-write never leaves a truncated snapshot behind.
pub fn save_engine(path: &Path, engine: &GovernanceEngine) -> anyhow::Result<()> {
    let bytes = engine.save_state().context("failed to serialize engine state")?;
    let dir = ensure_parent(path)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(&bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .with_context(|| format!("failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to move state into {}", path.display()))?;
    tracing::debug!(bytes = bytes.len(), "state saved to {}", path.display());
    Ok(())
}
