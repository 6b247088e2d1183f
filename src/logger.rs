// src/logger.rs
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt};

// The writer guard has to live as long as the process, otherwise the
// non-blocking worker shuts down and late log lines are dropped.
static LOG: OnceLock<WorkerGuard> = OnceLock::new();

/// Process-wide logging setup. Safe to call from every test and binary
/// entry point; only the first call wins.
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g.
/// `"ember::search=debug,ember=info"`.
pub fn init_logging(path: impl AsRef<Path>, default_filter: &str) {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }

    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    else {
        return;
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    if LOG.set(guard).is_err() {
        return; // someone initialized earlier
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
