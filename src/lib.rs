//! dirwatch: a debounced directory change monitor
//!
//! dirwatch turns noisy kernel filesystem notifications into a calm stream of
//! "this directory changed" reports. Raw events are filtered, collapsed to
//! their owning directory, accumulated in a shared change set, and flushed to
//! a callback on a fixed latency interval.
//!
//! # Architecture
//!
//! Two threads per adapter:
//! - a **worker** thread drives the event source (kernel-backed
//!   [`NotifySource`] or the scanning [`PollSource`] fallback)
//! - a **report** thread wakes every latency interval, drains the change
//!   set, and invokes the callback with each non-empty batch
//!
//! All shared state lives behind one mutex in [`ChangeState`]; pause,
//! resume, and stop are flag flips under that same lock, so there is no
//! ordering to get wrong between them and in-flight events.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use dirwatch::{native_adapter, AdapterConfig, ChangeCallback};
//!
//! let callback: ChangeCallback = Arc::new(|batch| {
//!     for directory in &batch {
//!         println!("CHANGED {}", directory.display());
//!     }
//! });
//!
//! let directories = vec![PathBuf::from("./src")];
//! let adapter = native_adapter(
//!     &directories,
//!     AdapterConfig::default(),
//!     callback,
//! ).unwrap();
//!
//! adapter.start(false);
//! // ... later ...
//! adapter.stop();
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod error_codes;
pub mod event;
pub mod filter;
pub mod output;
pub mod platform;
pub mod source;
pub mod state;
pub mod version;

pub use adapter::{Adapter, ChangeCallback};
pub use config::{AdapterConfig, MAX_LATENCY_MS, MIN_LATENCY_MS};
pub use error::{AdapterError, WATCH_LIMIT_MESSAGE};
pub use event::{subject_for, ChangeEvent, EventFlags};
pub use filter::changed_directory;
pub use output::{
    generate_execution_id, output_json_line, ChangeBatchRecord, ErrorRecord, JsonResponse,
    OutputFormat, DIRWATCH_JSON_SCHEMA_VERSION,
};
pub use platform::{native_adapter, polling_adapter, HAS_NATIVE_WATCHER};
pub use source::{ChangeEventSource, EventSink, HaltHandle, NotifySource, PollSource};
pub use state::ChangeState;
pub use version::version;
