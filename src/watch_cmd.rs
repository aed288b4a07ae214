//! Watch command implementation

use anyhow::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dirwatch::{
    native_adapter, output_json_line, polling_adapter, Adapter, AdapterConfig, AdapterError,
    ChangeBatchRecord, ChangeCallback, ChangeEventSource, JsonResponse, OutputFormat,
    WATCH_LIMIT_MESSAGE,
};

pub fn run_watch(
    directories: Vec<PathBuf>,
    config: AdapterConfig,
    output_format: OutputFormat,
    use_poll: bool,
) -> Result<()> {
    // Create shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    // Register signal handlers for SIGINT and SIGTERM
    #[cfg(unix)]
    {
        use signal_hook::consts::signal;
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([signal::SIGTERM, signal::SIGINT])?;

        std::thread::spawn(move || {
            for _ in &mut signals {
                shutdown_clone.store(true, Ordering::SeqCst);
                break;
            }
        });
    }

    // Fall back to scanning when the platform has no kernel facility.
    let use_poll = use_poll || !dirwatch::platform::native_watch_supported();

    let callback = batch_callback(output_format);

    for directory in &directories {
        println!("Watching: {}", directory.display());
    }

    if use_poll {
        let adapter = build_adapter(polling_adapter(&directories, config, callback.clone()))?;
        run_until_shutdown(&adapter, &shutdown, &callback);
    } else {
        let adapter = build_adapter(native_adapter(&directories, config, callback.clone()))?;
        run_until_shutdown(&adapter, &shutdown, &callback);
    }

    Ok(())
}

/// Surface construction failures with their stable code; the watch-limit
/// case additionally prints the fixed operator remediation text.
fn build_adapter<S: ChangeEventSource>(
    result: Result<Adapter<S>, AdapterError>,
) -> Result<Adapter<S>> {
    match result {
        Ok(adapter) => Ok(adapter),
        Err(e) => {
            if matches!(e, AdapterError::ResourceExhausted { .. }) {
                eprintln!("{}", WATCH_LIMIT_MESSAGE);
            }
            Err(anyhow::anyhow!("[{}] {}", e.code(), e))
        }
    }
}

/// Per-batch output in the selected format.
fn batch_callback(output_format: OutputFormat) -> ChangeCallback {
    match output_format {
        OutputFormat::Human => Arc::new(|batch: BTreeSet<PathBuf>| {
            for directory in &batch {
                println!("CHANGED {}", directory.display());
            }
        }),
        OutputFormat::Json => {
            let execution_id = dirwatch::generate_execution_id();
            Arc::new(move |batch: BTreeSet<PathBuf>| {
                let record = ChangeBatchRecord {
                    changed: batch.iter().map(|d| d.display().to_string()).collect(),
                };
                let response = JsonResponse::new(record, &execution_id);
                if let Err(e) = output_json_line(&response) {
                    eprintln!("ERROR writing batch: {}", e);
                }
            })
        }
    }
}

fn run_until_shutdown<S: ChangeEventSource>(
    adapter: &Adapter<S>,
    shutdown: &AtomicBool,
    callback: &ChangeCallback,
) {
    adapter.start(false);

    loop {
        if shutdown.load(Ordering::SeqCst) {
            println!("SHUTDOWN");
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    adapter.stop();

    // Flush anything still pending, including everything accumulated under
    // --no-report.
    let remaining = adapter.drain_pending();
    if !remaining.is_empty() {
        callback(remaining);
    }
}
