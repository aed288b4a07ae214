//! Adapter configuration.

use std::time::Duration;

use crate::error::AdapterError;

/// Lowest accepted report latency. Anything tighter just burns CPU waking
/// the report thread.
pub const MIN_LATENCY_MS: u64 = 10;

/// Highest accepted report latency; beyond this the tool stops feeling
/// interactive.
pub const MAX_LATENCY_MS: u64 = 5000;

/// Configuration for one change-detection adapter instance.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Whether to run the report thread and forward change batches to the
    /// callback. When false the adapter still accumulates changes for
    /// manual draining.
    pub report_changes: bool,
    /// Report interval (debounce window) in milliseconds.
    pub latency_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            report_changes: true,
            latency_ms: 100,
        }
    }
}

impl AdapterConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when `latency_ms` falls outside
    /// [`MIN_LATENCY_MS`]..=[`MAX_LATENCY_MS`].
    pub fn validate(&self) -> Result<(), AdapterError> {
        if !(MIN_LATENCY_MS..=MAX_LATENCY_MS).contains(&self.latency_ms) {
            return Err(AdapterError::InvalidConfig(format!(
                "latency_ms must be between {} and {}, got {}",
                MIN_LATENCY_MS, MAX_LATENCY_MS, self.latency_ms
            )));
        }
        Ok(())
    }

    /// The report interval as a `Duration`.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
