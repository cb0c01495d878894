use std::path::Path;
use std::sync::Mutex;

/// Install the process-wide subscriber: timestamped, leveled lines appended to `path`.
///
/// The level comes from `RUST_LOG` and defaults to `debug` for this crate and `info`
/// for dependencies. Call once at startup.
pub fn init(path: &Path) -> Result<(), String> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Cannot open log file {}: {}", path.display(), e))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info,wikipub=debug"))
        .map_err(|e| format!("Invalid log filter: {}", e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| format!("Cannot initialize logging: {}", e))
}
