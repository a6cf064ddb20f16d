#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod cli;
mod install;
mod logging;

use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use jelly_core::{AppConfig, SystemLauncher};
use tracing::{error, info, warn};

use cli::Cli;

fn main() {
    // Started without an argument: nothing to do, and nothing is logged.
    if !cli::has_argument(std::env::args_os()) {
        return;
    }

    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("jelly-handler"));
    let exe_dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();

    let (config, config_error) = match AppConfig::load_for_exe(&exe) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    logging::init(&config, &exe_dir);
    if let Some(e) = config_error {
        warn!("{e}; using built-in defaults");
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            error!("Invalid arguments: {}", e.to_string().trim_end());
            return;
        }
    };

    if cli.install {
        match install::install(&exe, &config.config.scheme) {
            Ok(()) => info!(
                scheme = %config.config.scheme,
                exe = %exe.display(),
                "Protocol registered"
            ),
            Err(e) => error!("Install failed: {e}"),
        }
        return;
    }

    let Some(uri) = cli.uri else {
        return;
    };

    if let Err(e) = jelly_core::handle_uri(&uri, &config, &mut SystemLauncher) {
        error!("{e}");
    }
}
