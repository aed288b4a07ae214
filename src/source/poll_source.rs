//! Polling fallback source.
//!
//! For filesystems where kernel notifications are unavailable or unreliable
//! (network mounts, some containers). Scans the watched trees on an
//! interval and synthesizes change events from modification-time diffs.
//! Trades latency for portability.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

use super::{ChangeEventSource, EventSink, HaltHandle};
use crate::error::AdapterError;
use crate::event::{subject_for, ChangeEvent, EventFlags};

/// File path -> last observed modification time.
type Snapshot = HashMap<PathBuf, SystemTime>;

/// Default scan interval. Coarser than the kernel-backed path on purpose;
/// every tick walks the full tree.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Scanning event source for platforms without a usable kernel facility.
pub struct PollSource {
    roots: Vec<PathBuf>,
    sink: EventSink,
    interval: Duration,
    snapshot: Snapshot,
    halt: HaltHandle,
}

impl PollSource {
    /// Build a polling source over `directories` with the default interval.
    ///
    /// # Errors
    /// - `InvalidConfig` when `directories` is empty
    /// - `Construction` when a directory does not exist
    pub fn new(directories: &[PathBuf], sink: EventSink) -> Result<Self, AdapterError> {
        Self::with_interval(directories, sink, DEFAULT_POLL_INTERVAL)
    }

    /// Build a polling source with an explicit scan interval.
    pub fn with_interval(
        directories: &[PathBuf],
        sink: EventSink,
        interval: Duration,
    ) -> Result<Self, AdapterError> {
        if directories.is_empty() {
            return Err(AdapterError::InvalidConfig(
                "at least one directory is required".to_string(),
            ));
        }

        for directory in directories {
            if !directory.is_dir() {
                return Err(AdapterError::Construction {
                    path: directory.display().to_string(),
                    message: "not a directory".to_string(),
                });
            }
        }

        let roots = directories.to_vec();
        let snapshot = scan(&roots);

        Ok(Self {
            roots,
            sink,
            interval,
            snapshot,
            halt: HaltHandle::new(),
        })
    }
}

impl ChangeEventSource for PollSource {
    fn run(&mut self) -> Result<(), AdapterError> {
        while !self.halt.is_halted() {
            thread::sleep(self.interval);
            if self.halt.is_halted() {
                break;
            }

            let next = scan(&self.roots);
            for event in diff(&self.snapshot, &next, &self.roots) {
                self.sink.dispatch(&event);
            }
            self.snapshot = next;
        }
        Ok(())
    }

    fn halt_handle(&self) -> HaltHandle {
        self.halt.clone()
    }
}

/// Walk all roots and capture modification times for regular files.
///
/// Unreadable entries are skipped silently; a file that vanishes mid-walk is
/// simply absent from the snapshot and shows up as removed on the next diff.
fn scan(roots: &[PathBuf]) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for root in roots {
        for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                if let Ok(mtime) = metadata.modified() {
                    snapshot.insert(entry.into_path(), mtime);
                }
            }
        }
    }
    snapshot
}

/// Synthesize change events from two consecutive snapshots.
fn diff(old: &Snapshot, new: &Snapshot, roots: &[PathBuf]) -> Vec<ChangeEvent> {
    let mut events = Vec::new();

    for (path, mtime) in new {
        match old.get(path) {
            None => {
                if let Some(event) = synthetic(path, roots, created_flags()) {
                    events.push(event);
                }
            }
            Some(previous) if previous != mtime => {
                if let Some(event) = synthetic(path, roots, modified_flags()) {
                    events.push(event);
                }
            }
            Some(_) => {}
        }
    }

    for path in old.keys() {
        if !new.contains_key(path) {
            if let Some(event) = synthetic(path, roots, removed_flags()) {
                events.push(event);
            }
        }
    }

    events
}

fn synthetic(path: &Path, roots: &[PathBuf], flags: EventFlags) -> Option<ChangeEvent> {
    let subject = subject_for(path, roots)?;
    Some(ChangeEvent {
        subject,
        absolute_path: path.to_path_buf(),
        flags,
    })
}

fn created_flags() -> EventFlags {
    EventFlags {
        created: true,
        ..Default::default()
    }
}

fn modified_flags() -> EventFlags {
    EventFlags {
        modified: true,
        ..Default::default()
    }
}

fn removed_flags() -> EventFlags {
    EventFlags {
        removed: true,
        ..Default::default()
    }
}
