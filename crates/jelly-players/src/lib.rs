pub mod backend;
pub mod player_db;

pub use backend::{Backend, PlayerCommand};
pub use player_db::{PlayerDatabase, PlayerDef};
