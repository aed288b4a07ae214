//! dirwatch CLI - Debounced directory change monitor
//!
//! Usage: dirwatch <command> [arguments]

mod watch_cmd;

use anyhow::Result;
use dirwatch::{version, AdapterConfig, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!("dirwatch - Debounced directory change monitor");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  dirwatch <command> [arguments]");
    eprintln!("  dirwatch --help");
    eprintln!();
    eprintln!("  dirwatch watch --dir <DIR> [--dir <DIR>]... [--latency-ms <N>] [--poll] [--no-report] [--output <FORMAT>]");
    eprintln!("  dirwatch version");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  watch     Watch directories and report changed directories");
    eprintln!("  version   Show version and build metadata");
    eprintln!();
    eprintln!("Watch arguments:");
    eprintln!("  --dir <DIR>         Directory to watch recursively (repeat for multiple)");
    eprintln!("  --latency-ms <N>    Report interval in milliseconds (default: 100)");
    eprintln!("  --poll              Use interval scanning instead of kernel notifications");
    eprintln!("  --no-report         Accumulate silently; print one batch on shutdown");
    eprintln!("  --output <FORMAT>   Output format: human (default) or json");
}

enum Command {
    Watch {
        directories: Vec<PathBuf>,
        config: AdapterConfig,
        output_format: OutputFormat,
        use_poll: bool,
    },
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        return Err(anyhow::anyhow!("Missing command"));
    }

    let command = &args[1];

    // Handle --help and -h flags
    if command == "--help" || command == "-h" {
        print_usage();
        std::process::exit(0);
    }

    match command.as_str() {
        "watch" => {
            let mut directories: Vec<PathBuf> = Vec::new();
            let mut latency_ms: u64 = 100;
            let mut use_poll = false;
            let mut no_report = false;
            let mut output_format = OutputFormat::Human;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--dir" => {
                        if i + 1 >= args.len() {
                            return Err(anyhow::anyhow!("--dir requires an argument"));
                        }
                        directories.push(PathBuf::from(&args[i + 1]));
                        i += 2;
                    }
                    "--latency-ms" => {
                        if i + 1 >= args.len() {
                            return Err(anyhow::anyhow!("--latency-ms requires an argument"));
                        }
                        latency_ms = args[i + 1].parse()?;
                        i += 2;
                    }
                    "--poll" => {
                        use_poll = true;
                        i += 1;
                    }
                    "--no-report" => {
                        no_report = true;
                        i += 1;
                    }
                    "--output" => {
                        if i + 1 >= args.len() {
                            return Err(anyhow::anyhow!("--output requires an argument"));
                        }
                        output_format = OutputFormat::from_str(&args[i + 1])
                            .ok_or_else(|| anyhow::anyhow!("Invalid output format: {}", args[i + 1]))?;
                        i += 2;
                    }
                    _ => {
                        return Err(anyhow::anyhow!("Unknown argument: {}", args[i]));
                    }
                }
            }

            if directories.is_empty() {
                return Err(anyhow::anyhow!("--dir is required"));
            }

            let config = AdapterConfig {
                report_changes: !no_report,
                latency_ms,
            };

            Ok(Command::Watch {
                directories,
                config,
                output_format,
                use_poll,
            })
        }
        "version" => Ok(Command::Version),
        _ => Err(anyhow::anyhow!("Unknown command: {}", command)),
    }
}

fn main() -> ExitCode {
    match parse_args() {
        Ok(Command::Watch {
            directories,
            config,
            output_format,
            use_poll,
        }) => {
            if let Err(e) = watch_cmd::run_watch(directories, config, output_format, use_poll) {
                eprintln!("Error: {}", e);
                return ExitCode::from(1);
            }
            ExitCode::SUCCESS
        }
        Ok(Command::Version) => {
            println!("{}", version());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            ExitCode::from(2)
        }
    }
}
