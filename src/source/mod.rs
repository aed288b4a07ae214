//! Pluggable change event sources.
//!
//! A source binds a fixed set of directories to a change-notification
//! mechanism and dispatches every raw notification through an [`EventSink`].
//! `run` blocks, so the adapter drives a source on a dedicated worker
//! thread; `halt_handle` hands out the flag that stops the loop from
//! another thread.
//!
//! Two bindings are provided: [`NotifySource`] over the platform's kernel
//! facility (inotify, kqueue, ReadDirectoryChangesW via the notify crate)
//! and [`PollSource`], a scanning fallback for filesystems without usable
//! kernel notifications.

pub mod notify_source;
pub mod poll_source;

pub use notify_source::NotifySource;
pub use poll_source::PollSource;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AdapterError;
use crate::event::ChangeEvent;
use crate::filter;
use crate::state::ChangeState;

/// Cooperative halt flag shared between a running source and its controller.
#[derive(Debug, Clone, Default)]
pub struct HaltHandle {
    flag: Arc<AtomicBool>,
}

impl HaltHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running loop to return as soon as possible. No new events are
    /// dispatched after the flag is observed.
    pub fn halt(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_halted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Dispatch boundary between a source and the shared change set.
///
/// Single producer (the kernel callback) feeding a single consumer (the
/// filter). Dispatch never blocks beyond the state mutex, so a source's
/// delivery loop cannot stall here.
#[derive(Clone)]
pub struct EventSink {
    state: Arc<ChangeState>,
}

impl EventSink {
    pub fn new(state: Arc<ChangeState>) -> Self {
        Self { state }
    }

    /// Run one raw event through the filter and record the owning directory
    /// when it survives.
    pub fn dispatch(&self, event: &ChangeEvent) {
        if let Some(directory) = filter::changed_directory(event) {
            self.state.record(directory);
        }
    }
}

/// A binding that pumps change notifications into an [`EventSink`].
pub trait ChangeEventSource: Send + 'static {
    /// Block the current thread dispatching events until the halt handle
    /// fires. Only the worker thread calls this.
    ///
    /// # Errors
    /// Returns `Backend` when the underlying mechanism fails after startup.
    fn run(&mut self) -> Result<(), AdapterError>;

    /// Handle used to stop `run` from another thread.
    fn halt_handle(&self) -> HaltHandle;
}
