use serde::Deserialize;

use crate::backend::Backend;

/// Embedded player database.
const EMBEDDED_DB: &str = include_str!("../data/players.toml");

/// A playback target and the backend that builds its command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerDef {
    /// Identifier used in requests and in the `[players]` config table.
    pub id: String,
    /// Display name (e.g., "mpv.net", "PotPlayer").
    pub name: String,
    /// How arguments are assembled for this player.
    pub backend: Backend,
    /// Whether requests for this player are accepted.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Wrapper for TOML deserialization.
#[derive(Debug, Deserialize)]
struct PlayerDbFile {
    #[serde(rename = "player", default)]
    players: Vec<PlayerDef>,
}

/// Database of known playback targets.
#[derive(Debug, Clone)]
pub struct PlayerDatabase {
    pub players: Vec<PlayerDef>,
}

impl PlayerDatabase {
    /// Load the embedded player database.
    pub fn embedded() -> Self {
        Self::from_toml(EMBEDDED_DB).expect("embedded players.toml should be valid")
    }

    /// Load a player database from TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let db: PlayerDbFile = toml::from_str(toml_str)?;
        Ok(Self {
            players: db.players,
        })
    }

    /// Merge user-defined players into this one.
    /// Players with matching ids are replaced; new players are appended.
    pub fn merge_user(&mut self, user_players: &[PlayerDef]) {
        for user_player in user_players {
            if let Some(existing) = self.players.iter_mut().find(|p| p.id == user_player.id) {
                tracing::debug!(id = %user_player.id, "Overriding built-in player");
                *existing = user_player.clone();
            } else {
                self.players.push(user_player.clone());
            }
        }
    }

    /// Find an enabled player by id (exact, case-sensitive).
    pub fn find(&self, id: &str) -> Option<&PlayerDef> {
        self.players.iter().find(|p| p.enabled && p.id == id)
    }

    /// Get all enabled players.
    pub fn enabled_players(&self) -> impl Iterator<Item = &PlayerDef> {
        self.players.iter().filter(|p| p.enabled)
    }
}
