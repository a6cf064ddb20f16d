//! File logging for an invisible, OS-launched process.
//!
//! Lines go to an append-only file next to the executable. If the file
//! cannot be opened, logging is silently off; it never stops the run.

use std::path::Path;

use jelly_core::AppConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str =
    "jelly_handler=info,jelly_core=info,jelly_parse=info,jelly_players=info";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Install the global subscriber. Returns whether file logging is active.
pub fn init(config: &AppConfig, exe_dir: &Path) -> bool {
    if !config.config.log {
        return false;
    }

    let Some(appender) = open_appender(&config.log_path(exe_dir)) else {
        return false;
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_writer(appender)
        .try_init()
        .is_ok()
}

/// Non-rotating appender writing exactly to `path`.
fn open_appender(path: &Path) -> Option<RollingFileAppender> {
    let dir = path.parent()?;
    let file_name = path.file_name()?.to_string_lossy();
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .ok()
}
