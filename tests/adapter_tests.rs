//! End-to-end adapter tests against a real filesystem
//!
//! Exercises the full pipeline: kernel (or polling) source -> filter ->
//! change set -> report thread -> callback. Uses generous latency and
//! timeouts so the tests stay stable on loaded CI machines.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dirwatch::{
    native_adapter, polling_adapter, AdapterConfig, AdapterError, ChangeCallback,
};
use tempfile::TempDir;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn config() -> AdapterConfig {
    AdapterConfig {
        report_changes: true,
        latency_ms: 50,
    }
}

/// Callback that forwards each batch into an mpsc channel.
fn channel_callback() -> (ChangeCallback, mpsc::Receiver<BTreeSet<PathBuf>>) {
    let (tx, rx) = mpsc::channel();
    let callback: ChangeCallback = Arc::new(move |batch| {
        let _ = tx.send(batch);
    });
    (callback, rx)
}

/// Canonicalize so reported paths compare equal on platforms where the
/// temp directory sits behind a symlink (macOS /tmp).
fn canonical_root(temp: &TempDir) -> PathBuf {
    temp.path().canonicalize().unwrap()
}

#[test]
fn test_native_adapter_reports_changed_directory() {
    let temp = TempDir::new().unwrap();
    let root = canonical_root(&temp);
    fs::create_dir(root.join("sub")).unwrap();

    let (callback, rx) = channel_callback();
    let adapter = native_adapter(&[root.clone()], config(), callback).unwrap();
    adapter.start(false);

    // Give the watcher a moment to be fully registered.
    thread::sleep(Duration::from_millis(200));

    fs::write(root.join("sub").join("a.txt"), b"hello").unwrap();

    let mut seen = BTreeSet::new();
    let deadline = std::time::Instant::now() + RECV_TIMEOUT;
    while std::time::Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(batch) => {
                seen.extend(batch);
                if seen.contains(&root.join("sub")) {
                    break;
                }
            }
            Err(_) => continue,
        }
    }

    assert!(
        seen.contains(&root.join("sub")),
        "expected {:?} in reported batches, got {:?}",
        root.join("sub"),
        seen
    );

    adapter.stop();
    assert!(adapter.is_stopped());
}

#[test]
fn test_polling_adapter_reports_changed_directory() {
    let temp = TempDir::new().unwrap();
    let root = canonical_root(&temp);

    let (callback, rx) = channel_callback();
    let adapter = polling_adapter(&[root.clone()], config(), callback).unwrap();
    adapter.start(false);

    // Let the poller take its baseline snapshot before mutating.
    thread::sleep(Duration::from_millis(400));

    fs::write(root.join("b.txt"), b"hello").unwrap();

    let mut seen = BTreeSet::new();
    let deadline = std::time::Instant::now() + RECV_TIMEOUT;
    while std::time::Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(batch) => {
                seen.extend(batch);
                if seen.contains(&root) {
                    break;
                }
            }
            Err(_) => continue,
        }
    }

    assert!(
        seen.contains(&root),
        "expected {:?} in reported batches, got {:?}",
        root,
        seen
    );

    adapter.stop();
}

#[test]
fn test_stop_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let (callback, _rx) = channel_callback();
    let adapter = native_adapter(&[canonical_root(&temp)], config(), callback).unwrap();

    adapter.start(false);
    adapter.stop();
    adapter.stop();
    assert!(adapter.is_stopped());
}

#[test]
fn test_concurrent_stop() {
    let temp = TempDir::new().unwrap();
    let (callback, _rx) = channel_callback();
    let adapter = Arc::new(
        native_adapter(&[canonical_root(&temp)], config(), callback).unwrap(),
    );

    adapter.start(false);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let adapter = adapter.clone();
        handles.push(thread::spawn(move || adapter.stop()));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(adapter.is_stopped());
}

#[test]
fn test_pause_discards_events() {
    let temp = TempDir::new().unwrap();
    let root = canonical_root(&temp);

    let (callback, rx) = channel_callback();
    let adapter = native_adapter(&[root.clone()], config(), callback).unwrap();
    adapter.start(false);
    thread::sleep(Duration::from_millis(200));

    adapter.pause();
    fs::write(root.join("ignored.txt"), b"x").unwrap();

    // Events during pause are dropped at record time, so nothing arrives
    // even after resuming.
    thread::sleep(Duration::from_millis(300));
    adapter.resume();

    assert!(
        rx.recv_timeout(Duration::from_millis(400)).is_err(),
        "no batch expected for events recorded during pause"
    );

    adapter.stop();
}

#[test]
fn test_missing_directory_fails_construction() {
    let (callback, _rx) = channel_callback();
    let result = native_adapter(
        &[PathBuf::from("/nonexistent/dirwatch/test/12345")],
        config(),
        callback,
    );
    assert!(matches!(result, Err(AdapterError::Construction { .. })));
}

#[test]
fn test_invalid_latency_rejected() {
    let temp = TempDir::new().unwrap();
    let (callback, _rx) = channel_callback();
    let result = native_adapter(
        &[canonical_root(&temp)],
        AdapterConfig {
            report_changes: true,
            latency_ms: 0,
        },
        callback,
    );
    assert!(matches!(result, Err(AdapterError::InvalidConfig(_))));
}
