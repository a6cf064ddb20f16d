use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use jelly_players::{PlayerDatabase, PlayerDef};
use serde::Deserialize;
use tracing::debug;

use crate::error::JellyError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Log file name used when `log_file` is not set.
pub const DEFAULT_LOG_FILE: &str = "jelly-handler.log";

/// Top-level handler configuration. Read once at startup, never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Player id -> executable path.
    #[serde(default)]
    pub players: BTreeMap<String, String>,
    #[serde(default)]
    pub config: GeneralConfig,
    /// Extra playback targets merged over the built-in table.
    #[serde(default, rename = "player")]
    pub extra_players: Vec<PlayerDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log: bool,
    pub log_file: Option<String>,
    pub launch_delay_ms: u64,
    pub scheme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log: true,
            log_file: None,
            launch_delay_ms: 50,
            scheme: "jelly-player".to_string(),
        }
    }
}

impl AppConfig {
    /// Load config for the given executable.
    ///
    /// Looks for `<exe stem>.toml` next to the executable, then the per-user
    /// config dir. Falls back to built-in defaults when neither exists.
    pub fn load_for_exe(exe: &Path) -> Result<Self, JellyError> {
        let mut candidates = vec![Self::colocated_path(exe)];
        candidates.extend(Self::user_config_path());
        Self::load_first(&candidates)
    }

    /// Load the first existing file among `candidates`, or defaults.
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self, JellyError> {
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                Self::load_from(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, JellyError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| JellyError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
            .map_err(|e| JellyError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Config file next to the executable: same base name, `.toml` extension.
    pub fn colocated_path(exe: &Path) -> PathBuf {
        exe.with_extension("toml")
    }

    /// Per-user config file (XDG on Linux, AppData on Windows).
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "jelly-player").map(|d| d.config_dir().join("config.toml"))
    }

    /// Executable configured for a player id. Blank entries count as unset.
    pub fn player_path(&self, id: &str) -> Option<&Path> {
        self.players
            .get(id)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(Path::new)
    }

    /// Resolve the log file path; relative paths are taken from `exe_dir`.
    pub fn log_path(&self, exe_dir: &Path) -> PathBuf {
        let file = self
            .config
            .log_file
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_LOG_FILE);
        exe_dir.join(file)
    }

    pub fn launch_delay(&self) -> Duration {
        Duration::from_millis(self.config.launch_delay_ms)
    }

    /// Built-in player table with any `[[player]]` rows from this config merged in.
    pub fn player_database(&self) -> PlayerDatabase {
        let mut db = PlayerDatabase::embedded();
        db.merge_user(&self.extra_players);
        db
    }

    /// `[players]` keys that name no enabled player, most likely typos.
    pub fn unknown_player_keys<'a>(&'a self, db: &PlayerDatabase) -> Vec<&'a str> {
        self.players
            .keys()
            .map(String::as_str)
            .filter(|id| !db.enabled_players().any(|p| p.id == *id))
            .collect()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
