//! Launching players for a decoded batch.
//!
//! Every request is handled on its own: a bad entry is logged and skipped,
//! and the rest of the batch still launches.

use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use jelly_parse::PlaybackRequest;
use jelly_players::{PlayerCommand, PlayerDatabase};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;

/// Starts external processes. Implementations must not wait for the child.
pub trait Launcher {
    fn launch(&mut self, command: &PlayerCommand) -> io::Result<()>;
}

/// Spawns the player as a detached child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&mut self, command: &PlayerCommand) -> io::Result<()> {
        let child = command.to_command().spawn()?;
        debug!(pid = child.id(), "Player process started");
        Ok(())
    }
}

/// Why a single request was not launched.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown target: {0:?}")]
    UnknownTarget(String),

    #[error("path missing for: {0}")]
    PathMissing(String),

    #[error("empty url")]
    EmptyUrl,

    #[error("url looks like a command-line option: {0}")]
    OptionLikeUrl(String),

    #[error("start error for {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of one request in a batch.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Position in the batch.
    pub index: usize,
    pub target: String,
    pub result: Result<PlayerCommand, DispatchError>,
}

/// Per-request results, in batch order.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    /// Commands that were started successfully.
    pub fn launched(&self) -> impl Iterator<Item = &PlayerCommand> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Requests that were skipped or failed to start.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &DispatchError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.index, e)))
    }
}

/// Maps requests to player commands and launches them in order.
pub struct Dispatcher<'a> {
    config: &'a AppConfig,
    players: &'a PlayerDatabase,
    delay: Duration,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a AppConfig, players: &'a PlayerDatabase) -> Self {
        Self {
            config,
            players,
            delay: config.launch_delay(),
        }
    }

    /// Override the pause taken after each launch attempt.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Launch every request in `batch`, returning one outcome per request.
    pub fn dispatch<L: Launcher>(
        &self,
        batch: &[PlaybackRequest],
        launcher: &mut L,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (index, request) in batch.iter().enumerate() {
            let result = self.dispatch_one(index, request, launcher);
            if let Err(e) = &result {
                warn!(index, player = %request.target, "{e}");
            }
            report.outcomes.push(DispatchOutcome {
                index,
                target: request.target.clone(),
                result,
            });
        }

        report
    }

    fn dispatch_one<L: Launcher>(
        &self,
        index: usize,
        request: &PlaybackRequest,
        launcher: &mut L,
    ) -> Result<PlayerCommand, DispatchError> {
        let command = self.prepare(request)?;

        info!(
            index,
            title = request.title.as_deref().unwrap_or_default(),
            geometry = request.geometry.as_deref().unwrap_or_default(),
            "Launching: {command}"
        );

        let launched = launcher
            .launch(&command)
            .map_err(|source| DispatchError::Launch {
                program: command.program.clone(),
                source,
            });

        // Throttle process creation for large batches.
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        launched.map(|()| command)
    }

    /// Resolve the backend and executable, then build the command.
    fn prepare(&self, request: &PlaybackRequest) -> Result<PlayerCommand, DispatchError> {
        let player = self
            .players
            .find(&request.target)
            .ok_or_else(|| DispatchError::UnknownTarget(request.target.clone()))?;

        let program = self
            .config
            .player_path(&player.id)
            .ok_or_else(|| DispatchError::PathMissing(player.id.clone()))?;

        if request.url.is_empty() {
            return Err(DispatchError::EmptyUrl);
        }
        // The url is passed as a bare argument; a leading '-' would be read as a flag.
        if request.url.starts_with('-') {
            return Err(DispatchError::OptionLikeUrl(request.url.clone()));
        }

        Ok(player.backend.build_command(program, request))
    }
}

/// Records commands instead of starting processes.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingLauncher {
    pub launched: Vec<PlayerCommand>,
    /// Launching this program fails with `NotFound`.
    pub missing_program: Option<PathBuf>,
}

#[cfg(test)]
impl Launcher for RecordingLauncher {
    fn launch(&mut self, command: &PlayerCommand) -> io::Result<()> {
        if self.missing_program.as_ref() == Some(&command.program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not found"));
        }
        self.launched.push(command.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config(toml: &str) -> AppConfig {
        AppConfig::from_toml(toml).unwrap()
    }

    fn request(target: &str, url: &str) -> PlaybackRequest {
        PlaybackRequest {
            target: target.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    fn dispatch(
        config: &AppConfig,
        batch: &[PlaybackRequest],
    ) -> (DispatchReport, RecordingLauncher) {
        let players = config.player_database();
        let mut launcher = RecordingLauncher::default();
        let report = Dispatcher::new(config, &players)
            .with_delay(Duration::ZERO)
            .dispatch(batch, &mut launcher);
        (report, launcher)
    }

    #[test]
    fn test_configured_and_unconfigured() {
        let config = config("[players]\nmpv = '/usr/bin/mpv'\n");
        let batch = [request("potplayer", "http://y"), request("mpv", "http://x")];
        let (report, launcher) = dispatch(&config, &batch);

        assert_eq!(launcher.launched.len(), 1);
        assert_eq!(launcher.launched[0].program, Path::new("/usr/bin/mpv"));
        assert_eq!(launcher.launched[0].args, ["http://x"]);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 0);
        assert!(matches!(failures[0].1, DispatchError::PathMissing(id) if id == "potplayer"));
    }

    #[test]
    fn test_unknown_target_does_not_stop_batch() {
        let config = config("[players]\nmpv = 'mpv'\n");
        let batch = [
            request("mpv", "http://a"),
            request("quicktime", "http://b"),
            request("", "http://c"),
            request("mpv", "http://d"),
        ];
        let (report, launcher) = dispatch(&config, &batch);

        let urls: Vec<_> = launcher
            .launched
            .iter()
            .map(|c| c.args[0].as_str())
            .collect();
        assert_eq!(urls, ["http://a", "http://d"]);

        let failed: Vec<_> = report.failures().map(|(i, _)| i).collect();
        assert_eq!(failed, [1, 2]);
        assert!(report
            .failures()
            .all(|(_, e)| matches!(e, DispatchError::UnknownTarget(_))));
    }

    #[test]
    fn test_launch_error_is_per_item() {
        let config = config("[players]\nmpv = '/missing/mpv'\npotplayer = '/opt/pot'\n");
        let batch = [request("mpv", "http://a"), request("potplayer", "http://b")];
        let players = config.player_database();
        let mut launcher = RecordingLauncher {
            missing_program: Some(PathBuf::from("/missing/mpv")),
            ..Default::default()
        };
        let report = Dispatcher::new(&config, &players)
            .with_delay(Duration::ZERO)
            .dispatch(&batch, &mut launcher);

        assert_eq!(launcher.launched.len(), 1);
        assert_eq!(launcher.launched[0].program, Path::new("/opt/pot"));
        assert!(matches!(
            report.outcomes[0].result,
            Err(DispatchError::Launch { .. })
        ));
        assert_eq!(report.launched().count(), 1);
    }

    #[test]
    fn test_empty_url_rejected() {
        let config = config("[players]\nmpv = 'mpv'\n");
        let (report, launcher) = dispatch(&config, &[request("mpv", "")]);
        assert!(launcher.launched.is_empty());
        assert!(matches!(
            report.outcomes[0].result,
            Err(DispatchError::EmptyUrl)
        ));
    }

    #[test]
    fn test_option_like_url_rejected() {
        let config = config("[players]\nmpv = 'mpv'\n");
        let (report, launcher) = dispatch(&config, &[request("mpv", "--script=/tmp/x.lua")]);
        assert!(launcher.launched.is_empty());
        assert!(matches!(
            report.outcomes[0].result,
            Err(DispatchError::OptionLikeUrl(_))
        ));
    }

    #[test]
    fn test_simple_backend_gets_url_only() {
        let config = config("[players]\npotplayer = 'PotPlayerMini64.exe'\n");
        let batch = [PlaybackRequest {
            title: Some("t".into()),
            geometry: Some("50%x50%+0+0".into()),
            ..request("potplayer", "http://x")
        }];
        let (_, launcher) = dispatch(&config, &batch);
        assert_eq!(launcher.launched[0].args, ["http://x"]);
    }

    #[test]
    fn test_disabled_player_is_unknown() {
        let config = config(
            r#"
            [players]
            vlc = 'vlc'

            [[player]]
            id = "vlc"
            name = "VLC"
            backend = "simple"
            enabled = false
            "#,
        );
        let (report, launcher) = dispatch(&config, &[request("vlc", "http://x")]);
        assert!(launcher.launched.is_empty());
        assert!(matches!(
            report.outcomes[0].result,
            Err(DispatchError::UnknownTarget(_))
        ));
    }

    #[test]
    fn test_empty_batch() {
        let config = config("[players]\nmpv = 'mpv'\n");
        let (report, launcher) = dispatch(&config, &[]);
        assert!(report.outcomes.is_empty());
        assert!(launcher.launched.is_empty());
    }

    #[test]
    fn test_delay_applied_per_launch() {
        let config = config("[players]\nmpv = 'mpv'\n[config]\nlaunch_delay_ms = 20\n");
        let players = config.player_database();
        let mut launcher = RecordingLauncher::default();
        let batch = [request("mpv", "http://a"), request("mpv", "http://b")];

        let start = std::time::Instant::now();
        Dispatcher::new(&config, &players).dispatch(&batch, &mut launcher);
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(launcher.launched.len(), 2);
    }

    #[test]
    fn test_no_delay_after_skipped_requests() {
        let config = config("[players]\nmpv = 'mpv'\n[config]\nlaunch_delay_ms = 2000\n");
        let players = config.player_database();
        let mut launcher = RecordingLauncher::default();
        let batch = [
            request("quicktime", "http://a"),
            request("potplayer", "http://b"),
            request("mpv", ""),
            request("mpv", "-v"),
        ];

        let start = std::time::Instant::now();
        let report = Dispatcher::new(&config, &players).dispatch(&batch, &mut launcher);
        assert!(start.elapsed() < Duration::from_millis(2000));
        assert_eq!(report.failures().count(), 4);
        assert!(launcher.launched.is_empty());
    }
}
