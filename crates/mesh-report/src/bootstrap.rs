use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// The tracing filter directive for a repeatable `-d` count.
fn filter_directive(debug: u8) -> &'static str {
    match debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// All log output goes to stderr so it never mixes with a report written
/// to stdout.
pub fn setup_logging(debug: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(debug))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Output target ──────────────────────────────────────────────────────────────

/// Open the report destination.
///
/// A file that cannot be created logs a warning and falls back to the
/// console; the run still succeeds.
pub fn open_output(path: Option<&Path>) -> Box<dyn Write> {
    match path {
        None => Box::new(io::stdout()),
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(file),
            Err(e) => {
                warn!(
                    "Can't open file {}; using console output ({})",
                    path.display(),
                    e
                );
                Box::new(io::stdout())
            }
        },
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── filter_directive ──────────────────────────────────────────────────────

    #[test]
    fn test_filter_directive_levels() {
        assert_eq!(filter_directive(0), "warn");
        assert_eq!(filter_directive(1), "info");
        assert_eq!(filter_directive(2), "debug");
        assert_eq!(filter_directive(3), "trace");
        assert_eq!(filter_directive(9), "trace");
    }

    // ── open_output ───────────────────────────────────────────────────────────

    #[test]
    fn test_open_output_writes_to_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("report.txt");

        {
            let mut out = open_output(Some(&path));
            writeln!(out, "hello").expect("write should succeed");
        }

        let content = std::fs::read_to_string(&path).expect("file must exist");
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn test_open_output_unwritable_path_falls_back() {
        // Parent directory does not exist, so File::create fails; the
        // returned writer must still be usable.
        let mut out = open_output(Some(Path::new("/nonexistent-dir/report.txt")));
        writeln!(out, "still works").expect("fallback writer should accept output");
    }
}
