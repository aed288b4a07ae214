//! Adapter lifecycle controller.
//!
//! Composes an event source, the shared change state, and the worker/report
//! threads behind the `start`/`stop`/`pause`/`resume` surface. The worker
//! thread is the only thread allowed to block on the source's delivery
//! loop; the report thread wakes on the configured latency interval, drains
//! the change set, and hands the batch to the external callback.
//!
//! # Threading Design
//!
//! All mutation goes through `&self`: the source and thread handles sit in
//! their own mutexes so an `Arc<Adapter<_>>` can be started from one thread
//! and stopped from another (or from several at once — teardown runs
//! exactly once, resolved under the shared state lock).
//!
//! Stopping cannot cancel a blocked source cooperatively in every backend,
//! so `stop` waits a bounded grace period for the worker to observe the
//! halt flag and then detaches the handle. The run loops poll the flag at a
//! much shorter tick, so the detach path only triggers when a backend is
//! wedged; a detached worker can no longer dispatch because the halt flag
//! and the stopped flag are both already set.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::source::{ChangeEventSource, EventSink, HaltHandle};
use crate::state::ChangeState;

/// Callback invoked from the report thread with each non-empty batch of
/// changed directories. Must not block for long: the next batch waits
/// behind it.
pub type ChangeCallback = Arc<dyn Fn(BTreeSet<PathBuf>) + Send + Sync>;

/// How long `stop` waits for the worker to observe the halt flag before
/// detaching it.
const STOP_GRACE_PERIOD: Duration = Duration::from_secs(2);
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Default)]
struct Threads {
    worker: Option<JoinHandle<()>>,
    reporter: Option<JoinHandle<()>>,
}

/// Change-detection adapter over a pluggable event source.
pub struct Adapter<S: ChangeEventSource> {
    state: Arc<ChangeState>,
    config: AdapterConfig,
    callback: ChangeCallback,
    halt: HaltHandle,
    source: Mutex<Option<S>>,
    threads: Mutex<Threads>,
}

impl<S: ChangeEventSource> Adapter<S> {
    /// Construct an adapter over a source built by `make_source`.
    ///
    /// `make_source` receives the sink the source must dispatch raw events
    /// into. Construction failures (including kernel watch-limit
    /// exhaustion) propagate unchanged and leave nothing running.
    ///
    /// # Errors
    /// - `InvalidConfig` when the configuration fails validation
    /// - whatever `make_source` returns
    pub fn with_source<F>(
        config: AdapterConfig,
        callback: ChangeCallback,
        make_source: F,
    ) -> Result<Self, AdapterError>
    where
        F: FnOnce(EventSink) -> Result<S, AdapterError>,
    {
        config.validate()?;

        let state = Arc::new(ChangeState::new());
        let source = make_source(EventSink::new(state.clone()))?;
        let halt = source.halt_handle();

        Ok(Self {
            state,
            config,
            callback,
            halt,
            source: Mutex::new(Some(source)),
            threads: Mutex::new(Threads::default()),
        })
    }

    /// Start the worker thread and, when reporting is enabled, the report
    /// thread. With `blocking` the caller joins the worker until it exits
    /// (another thread must call [`stop`](Self::stop)).
    ///
    /// Calling `start` a second time is a no-op: the source has already
    /// been consumed by the first call.
    pub fn start(&self, blocking: bool) {
        let source = self.source.lock().unwrap().take();
        let Some(mut source) = source else {
            return;
        };

        let worker = thread::spawn(move || {
            if let Err(e) = source.run() {
                eprintln!("Watcher error: {:?}", e);
            }
        });

        if self.config.report_changes {
            let state = self.state.clone();
            let callback = self.callback.clone();
            let interval = self.config.latency();

            let reporter = thread::spawn(move || loop {
                thread::sleep(interval);
                if state.is_stopped() {
                    break;
                }
                if let Some(batch) = state.take_report_batch() {
                    callback(batch);
                }
            });
            self.threads.lock().unwrap().reporter = Some(reporter);
        }

        if blocking {
            let _ = worker.join();
        } else {
            self.threads.lock().unwrap().worker = Some(worker);
        }
    }

    /// Stop the adapter.
    ///
    /// Idempotent and race-safe: the first caller (resolved under the state
    /// mutex) halts the source, joins the report thread, and reclaims the
    /// worker; every later or racing call returns immediately.
    pub fn stop(&self) {
        if !self.state.mark_stopped() {
            return;
        }

        self.halt.halt();

        let (worker, reporter) = {
            let mut threads = self.threads.lock().unwrap();
            (threads.worker.take(), threads.reporter.take())
        };

        // The reporter checks the stopped flag every wake, so this join is
        // bounded by one latency interval.
        if let Some(reporter) = reporter {
            let _ = reporter.join();
        }

        if let Some(worker) = worker {
            let deadline = Instant::now() + STOP_GRACE_PERIOD;
            while !worker.is_finished() && Instant::now() < deadline {
                thread::sleep(STOP_POLL_INTERVAL);
            }
            if worker.is_finished() {
                let _ = worker.join();
            }
            // Otherwise the handle drops here and the thread is detached;
            // the halt and stopped flags keep it from recording anything
            // when it eventually wakes.
        }
    }

    /// Suppress recording and reporting until [`resume`](Self::resume).
    ///
    /// Takes effect on the next event and the next report cycle; entries
    /// accumulated before the pause are neither flushed nor discarded.
    pub fn pause(&self) {
        self.state.pause();
    }

    pub fn resume(&self) {
        self.state.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.state.is_stopped()
    }

    /// Atomically remove and return all pending changed directories.
    ///
    /// For callers running with `report_changes` disabled who drain on
    /// their own schedule.
    pub fn drain_pending(&self) -> BTreeSet<PathBuf> {
        self.state.drain_all()
    }
}

impl<S: ChangeEventSource> Drop for Adapter<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
