//! dirwatch-specific error codes
//!
//! Error codes follow the pattern: DW-{CATEGORY}-{3-digit number}
//!
//! Categories (1-3 uppercase letters):
//! - SRC: Event source errors (watch registration, kernel backend)
//! - CFG: Configuration errors (invalid options, missing directories)
//!
//! Each error code is stable and should not be reused.

/// Kernel watch limit reached at registration time
pub const DW_SRC_001_WATCH_LIMIT: &str = "DW-SRC-001";

/// Watch registration failed (missing directory, permissions, etc.)
pub const DW_SRC_002_REGISTRATION_FAILED: &str = "DW-SRC-002";

/// Kernel backend failed to initialize or failed at runtime
pub const DW_SRC_003_BACKEND_FAILURE: &str = "DW-SRC-003";

/// Invalid adapter configuration
pub const DW_CFG_001_INVALID_CONFIG: &str = "DW-CFG-001";
