use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

// Keeps the non-blocking writer alive for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the tracing subscriber for a binary embedding this crate.
///
/// Filtering comes from `RUST_LOG` (default `info`). When `JM_LOG_DIR` is
/// set, output goes to `<JM_LOG_DIR>/<app>.log` with daily rotation;
/// otherwise it stays on stdout. Calling twice is harmless.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = std::env::var_os("JM_LOG_DIR").map(std::path::PathBuf::from);
    let file_writer = log_dir.and_then(|dir| {
        if let Err(err) = std::fs::create_dir_all(&dir) {
            eprintln!("failed to create JM_LOG_DIR {}: {err}; logging to stdout", dir.display());
            return None;
        }
        let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        Some(writer)
    });

    match file_writer {
        Some(writer) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    }
}
