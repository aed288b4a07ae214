//! Adapter error taxonomy.
//!
//! Construction-time failures propagate synchronously to the caller; the
//! watch-limit case gets its own variant because it is only recoverable by
//! operator action (raising the kernel limit), never by retrying.

use crate::error_codes;

/// Fixed operator-facing message for kernel watch-limit exhaustion.
///
/// Printed once by the CLI before the monitoring attempt is abandoned.
pub const WATCH_LIMIT_MESSAGE: &str = "\
Unable to monitor directories for changes: the kernel inotify watch limit has been reached.
Raise the limit and retry, e.g.:
  sudo sysctl fs.inotify.max_user_watches=524288";

/// Errors surfaced by adapter construction and the event source backends.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AdapterError {
    /// The kernel refused watch registration due to a system-wide resource
    /// limit. Fatal for the adapter instance; not retryable.
    #[error("kernel watch limit reached while registering {path}")]
    ResourceExhausted { path: String },

    /// A watch could not be registered for a reason other than resource
    /// exhaustion (e.g. a missing directory). No partial adapter survives.
    #[error("failed to register watch on {path}: {message}")]
    Construction { path: String, message: String },

    /// Invalid adapter configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The kernel backend failed to initialize or failed at runtime.
    #[error("watch backend error: {0}")]
    Backend(String),
}

impl AdapterError {
    /// Stable error code for CLI and JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            AdapterError::ResourceExhausted { .. } => error_codes::DW_SRC_001_WATCH_LIMIT,
            AdapterError::Construction { .. } => error_codes::DW_SRC_002_REGISTRATION_FAILED,
            AdapterError::Backend(_) => error_codes::DW_SRC_003_BACKEND_FAILURE,
            AdapterError::InvalidConfig(_) => error_codes::DW_CFG_001_INVALID_CONFIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_limit_message_names_facility_and_remedy() {
        assert!(WATCH_LIMIT_MESSAGE.contains("inotify"));
        assert!(WATCH_LIMIT_MESSAGE.contains("max_user_watches"));
    }

    #[test]
    fn test_error_codes_map_per_variant() {
        let exhausted = AdapterError::ResourceExhausted {
            path: "/proj".to_string(),
        };
        assert_eq!(exhausted.code(), "DW-SRC-001");

        let construction = AdapterError::Construction {
            path: "/missing".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(construction.code(), "DW-SRC-002");

        assert_eq!(
            AdapterError::Backend("boom".to_string()).code(),
            "DW-SRC-003"
        );
        assert_eq!(
            AdapterError::InvalidConfig("bad".to_string()).code(),
            "DW-CFG-001"
        );
    }

    #[test]
    fn test_display_includes_path() {
        let err = AdapterError::Construction {
            path: "/missing".to_string(),
            message: "No such file or directory".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("/missing"));
        assert!(text.contains("No such file or directory"));
    }
}
