// Platform detection and source selection.
//
// The kernel-backed source is preferred everywhere the notify crate has a
// native backend. The polling source exists for filesystems that do not
// deliver kernel events (network mounts, some container overlays) and is
// only used when asked for explicitly.

use std::path::PathBuf;

use crate::adapter::{Adapter, ChangeCallback};
use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::source::{NotifySource, PollSource};

/// True when this build targets a platform with a native notification
/// backend (inotify, FSEvents, kqueue, ReadDirectoryChangesW).
pub const HAS_NATIVE_WATCHER: bool = cfg!(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "windows",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
));

/// Check if native watching is usable on this platform
pub fn native_watch_supported() -> bool {
    if !HAS_NATIVE_WATCHER {
        eprintln!("Warning: no native file watching backend on this platform.");
        eprintln!("         Use --poll for interval-based scanning instead.");
    }
    HAS_NATIVE_WATCHER
}

/// Build an adapter bound to the platform's kernel notification facility.
pub fn native_adapter(
    directories: &[PathBuf],
    config: AdapterConfig,
    callback: ChangeCallback,
) -> Result<Adapter<NotifySource>, AdapterError> {
    let directories = directories.to_vec();
    Adapter::with_source(config, callback, move |sink| {
        NotifySource::new(&directories, sink)
    })
}

/// Build an adapter over the interval-scanning fallback source.
pub fn polling_adapter(
    directories: &[PathBuf],
    config: AdapterConfig,
    callback: ChangeCallback,
) -> Result<Adapter<PollSource>, AdapterError> {
    let directories = directories.to_vec();
    Adapter::with_source(config, callback, move |sink| {
        PollSource::new(&directories, sink)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_native_adapter_construction() {
        let temp = TempDir::new().unwrap();
        let callback: ChangeCallback = Arc::new(|_| {});
        let adapter = native_adapter(
            &[temp.path().to_path_buf()],
            AdapterConfig::default(),
            callback,
        );
        assert!(adapter.is_ok());
    }

    #[test]
    fn test_polling_adapter_construction() {
        let temp = TempDir::new().unwrap();
        let callback: ChangeCallback = Arc::new(|_| {});
        let adapter = polling_adapter(
            &[temp.path().to_path_buf()],
            AdapterConfig::default(),
            callback,
        );
        assert!(adapter.is_ok());
    }

    #[test]
    fn test_native_adapter_missing_directory_fails() {
        let callback: ChangeCallback = Arc::new(|_| {});
        let result = native_adapter(
            &[PathBuf::from("/nonexistent/dirwatch/test/12345")],
            AdapterConfig::default(),
            callback,
        );
        assert!(result.is_err());
    }
}
