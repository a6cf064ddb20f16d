//! Command-line builders, one per backend kind.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use jelly_parse::PlaybackRequest;
use serde::Deserialize;

/// How a player expects to be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// mpv and anything that accepts its option syntax.
    Mpv,
    /// Players that only take the media address.
    Simple,
}

impl Backend {
    /// Build the external command for a request. The url always comes first.
    pub fn build_command(self, program: &Path, request: &PlaybackRequest) -> PlayerCommand {
        let args = match self {
            Backend::Mpv => mpv_args(request),
            Backend::Simple => vec![request.url.clone()],
        };
        PlayerCommand {
            program: program.to_path_buf(),
            args,
        }
    }
}

fn mpv_args(request: &PlaybackRequest) -> Vec<String> {
    let flags = [
        ("--profile=", &request.profile),
        ("--geometry=", &request.geometry),
        ("--force-media-title=", &request.title),
        ("--sub-file=", &request.subtitle_url),
    ];

    let mut args = vec![request.url.clone()];
    args.extend(
        flags
            .into_iter()
            .filter_map(|(flag, value)| value.as_ref().map(|v| format!("{flag}{v}"))),
    );
    args
}

/// A fully assembled player invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// Convert into a process builder with stdio detached from the handler.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.program.display())?;
        for arg in &self.args {
            write!(f, " \"{arg}\"")?;
        }
        Ok(())
    }
}
