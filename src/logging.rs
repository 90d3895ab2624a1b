use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`warn` when unset)
pub const LOG_ENV: &str = "HRDESK_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr for CLI commands.
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `hrdesk/.hrdesk.log` while the TUI owns the terminal. Nothing is
/// set up unless `HRDESK_LOG` is present.
pub fn init_tui(desk_dir: &Path) {
    if std::env::var_os(LOG_ENV).is_none() {
        return;
    }
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(desk_dir.join(".hrdesk.log"))
    {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
