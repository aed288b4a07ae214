//! Kernel-backed event source using the notify recommended watcher.
//!
//! The recommended watcher delivers events on its own internal thread; the
//! `run` loop here only keeps the registration alive and gives the adapter a
//! thread it can block and halt. Watch registration happens at construction
//! so resource-exhaustion failures surface before any thread is spawned.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::{ChangeEventSource, EventSink, HaltHandle};
use crate::error::AdapterError;
use crate::event;

/// Tick granularity for observing the halt flag.
const HALT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Event source bound to the platform's kernel change-notification facility.
pub struct NotifySource {
    /// Dropping the watcher deregisters every watch, so it lives as long as
    /// the source.
    _watcher: RecommendedWatcher,
    halt: HaltHandle,
}

impl NotifySource {
    /// Register recursive watches for every directory and wire raw events
    /// into `sink`.
    ///
    /// # Errors
    /// - `ResourceExhausted` when the kernel refuses registration because
    ///   the system-wide watch limit is reached
    /// - `Construction` for any other registration failure (e.g. a missing
    ///   directory); no partial source is left behind
    /// - `InvalidConfig` when `directories` is empty
    pub fn new(directories: &[PathBuf], sink: EventSink) -> Result<Self, AdapterError> {
        if directories.is_empty() {
            return Err(AdapterError::InvalidConfig(
                "at least one directory is required".to_string(),
            ));
        }

        let roots: Vec<PathBuf> = directories.to_vec();
        let mut watcher = notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(raw) => {
                    for change in event::from_notify(&raw, &roots) {
                        sink.dispatch(&change);
                    }
                }
                Err(e) => {
                    eprintln!("Watcher error: {:?}", e);
                }
            },
        )
        .map_err(|e| AdapterError::Backend(format!("failed to create watcher: {}", e)))?;

        for directory in directories {
            watcher
                .watch(directory, RecursiveMode::Recursive)
                .map_err(|e| classify_registration_failure(directory, &e))?;
        }

        Ok(Self {
            _watcher: watcher,
            halt: HaltHandle::new(),
        })
    }
}

impl ChangeEventSource for NotifySource {
    fn run(&mut self) -> Result<(), AdapterError> {
        while !self.halt.is_halted() {
            thread::sleep(HALT_POLL_INTERVAL);
        }
        Ok(())
    }

    fn halt_handle(&self) -> HaltHandle {
        self.halt.clone()
    }
}

/// Split watch-limit exhaustion from ordinary registration failures.
///
/// The limit case is the one failure an operator must fix out-of-band, so it
/// gets its own variant instead of riding along as a generic error string.
fn classify_registration_failure(path: &Path, err: &notify::Error) -> AdapterError {
    match err.kind {
        notify::ErrorKind::MaxFilesWatch => AdapterError::ResourceExhausted {
            path: path.display().to_string(),
        },
        _ => AdapterError::Construction {
            path: path.display().to_string(),
            message: err.to_string(),
        },
    }
}
