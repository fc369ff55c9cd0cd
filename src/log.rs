//! Structured logging for clone-org.
//!
//! Log levels:
//! - ERROR: run-fatal failures (lookup, destination, cancellation)
//! - WARN: recoverable conditions (a skipped listing page, a failed clone)
//! - INFO: high-level progress (pages fetched, run started/finished)
//! - DEBUG: state transitions, individual clone starts
//!
//! Debug mode can be enabled with `--debug` or `CLONE_ORG_DEBUG=1`.
//! `RUST_LOG` takes precedence over both.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::Result;

const LOG_FILE: &str = "clone-org.log";

/// Where log records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// `~/.clone-org/clone-org.log`; used while the TUI owns the terminal.
    File,
    /// Standard error; used in plain-text mode.
    Stderr,
}

/// Whether `CLONE_ORG_DEBUG` asks for debug logging.
pub fn debug_from_env() -> bool {
    std::env::var("CLONE_ORG_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "info,clone_org=debug"
    } else {
        "warn,clone_org=info"
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Install the global subscriber.
///
/// Returns the log file path when logging to a file. Installing twice is a
/// no-op so tests and embedders can call this freely.
pub fn init(target: LogTarget, debug: bool) -> Result<Option<PathBuf>> {
    let debug = debug || debug_from_env();
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(debug))
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .try_init();
            Ok(None)
        }
        LogTarget::File => {
            let dir = Config::app_dir()?;
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(LOG_FILE);
            // Truncate on startup
            let file = File::create(&path)?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter(debug))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
            tracing::info!("clone-org logging initialized at {}", path.display());
            Ok(Some(path))
        }
    }
}
