//! Handler pipeline: decode a `jelly-player://` URI and launch the players it names.

pub mod config;
pub mod dispatch;
pub mod error;

pub use config::AppConfig;
pub use dispatch::{DispatchError, DispatchReport, Dispatcher, Launcher, SystemLauncher};
pub use error::JellyError;

use tracing::{info, warn};

/// Decode `raw_uri` and launch one player per request.
///
/// Payload errors abort before anything is launched. Per-request failures
/// are reported in the returned [`DispatchReport`].
pub fn handle_uri<L: Launcher>(
    raw_uri: &str,
    config: &AppConfig,
    launcher: &mut L,
) -> Result<DispatchReport, JellyError> {
    let batch = jelly_parse::parse_uri(raw_uri, &config.config.scheme)?;
    info!(count = batch.len(), "Decoded request batch");

    let players = config.player_database();
    for key in config.unknown_player_keys(&players) {
        warn!(key, "Configured path for unknown player");
    }

    let report = Dispatcher::new(config, &players).dispatch(&batch, launcher);
    info!(
        launched = report.launched().count(),
        failed = report.failures().count(),
        "Batch finished"
    );
    Ok(report)
}
