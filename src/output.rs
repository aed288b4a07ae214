//! JSON output types for the CLI.
//!
//! Schema-versioned response envelope so downstream consumers can parse
//! batch lines without sniffing. Human output stays on plain `println!`
//! lines; this module only covers the `--output json` path.

use serde::{Deserialize, Serialize};

/// Current JSON output schema version
pub const DIRWATCH_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Output format selector for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// JSON output with schema versioning
    Json,
}

impl OutputFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Wrapper for all JSON responses
///
/// Every JSON response includes schema_version and execution_id for
/// parsing stability and traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for parsing stability
    pub schema_version: String,
    /// Unique ID for this process run
    pub execution_id: String,
    /// Tool that produced the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// RFC 3339 timestamp of emission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Response payload
    pub data: T,
}

impl<T> JsonResponse<T> {
    /// Create a new JSON response
    pub fn new(data: T, execution_id: &str) -> Self {
        JsonResponse {
            schema_version: DIRWATCH_JSON_SCHEMA_VERSION.to_string(),
            execution_id: execution_id.to_string(),
            tool: Some("dirwatch".to_string()),
            timestamp: Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            data,
        }
    }
}

/// One reported batch of changed directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeBatchRecord {
    /// Changed directory paths, sorted
    pub changed: Vec<String>,
}

/// Error payload for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Stable error code (see `error_codes`)
    pub code: String,
    /// Human-readable message
    pub message: String,
}

/// Generate a unique execution ID for this run
///
/// Uses timestamp + process ID for uniqueness.
pub fn generate_execution_id() -> String {
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let pid = process::id();

    format!("{:x}-{:x}", timestamp, pid)
}

/// Output one JSON line to stdout
///
/// Single-line on purpose: the watch loop emits a stream of these and
/// consumers read line-by-line.
pub fn output_json_line<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(data)?;
    println!("{}", json);
    Ok(())
}
