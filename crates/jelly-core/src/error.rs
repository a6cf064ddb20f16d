use jelly_parse::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JellyError {
    #[error("config error: {0}")]
    Config(String),

    #[error("protocol error: {0}")]
    Parse(#[from] ParseError),
}
