//! Shared adapter state: the changed-directory set and lifecycle flags.
//!
//! Everything the worker thread, the report thread, and the caller share
//! lives in one struct behind one mutex. Keeping the `paused`/`stopped`
//! flags in the same guard as the set means no thread can ever observe a
//! partially-consistent combination (e.g. a record racing a concurrent
//! stop), and double-stop resolves under the same lock.
//!
//! The mutex will panic if poisoned; a panic while holding this lock means a
//! bug in this crate, not a recoverable condition.

use std::collections::BTreeSet;
use std::mem;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    /// Directories known to have changed since the last drain, de-duplicated.
    /// BTreeSet keeps drain output deterministic.
    changed: BTreeSet<PathBuf>,
    paused: bool,
    stopped: bool,
}

/// Mutex-guarded change set plus the paused/stopped lifecycle flags.
#[derive(Debug, Default)]
pub struct ChangeState {
    inner: Mutex<Inner>,
}

impl ChangeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a changed directory.
    ///
    /// No-op while paused or stopped, and idempotent for directories already
    /// pending. Pause is enforced here, at record time, so events arriving
    /// during a pause leave no residual entry behind.
    pub fn record(&self, directory: PathBuf) {
        let mut inner = self.inner.lock().unwrap();
        if inner.paused || inner.stopped {
            return;
        }
        inner.changed.insert(directory);
    }

    /// Atomically remove and return all pending directories.
    pub fn drain_all(&self) -> BTreeSet<PathBuf> {
        let mut inner = self.inner.lock().unwrap();
        mem::take(&mut inner.changed)
    }

    /// Take a reportable batch: `None` while paused or when nothing is
    /// pending. While paused, accumulated entries stay in place untouched.
    pub fn take_report_batch(&self) -> Option<BTreeSet<PathBuf>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.paused || inner.changed.is_empty() {
            return None;
        }
        Some(mem::take(&mut inner.changed))
    }

    /// Number of directories currently pending.
    pub fn pending_count(&self) -> usize {
        self.inner.lock().unwrap().changed.len()
    }

    pub fn pause(&self) {
        self.inner.lock().unwrap().paused = true;
    }

    pub fn resume(&self) {
        self.inner.lock().unwrap().paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    /// Check-and-set the stopped flag.
    ///
    /// Returns `true` when this call performed the transition, `false` when
    /// the adapter was already stopped. Teardown must only run for the
    /// caller that got `true`.
    pub fn mark_stopped(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.stopped {
            return false;
        }
        inner.stopped = true;
        true
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.lock().unwrap().stopped
    }
}
