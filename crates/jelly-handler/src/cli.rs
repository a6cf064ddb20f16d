use clap::Parser;

/// Launch external media players from `jelly-player://` links.
#[derive(Parser, Debug)]
#[command(name = "jelly-handler", version)]
pub struct Cli {
    /// Register this executable as the handler for the configured URI scheme
    #[arg(long, conflicts_with = "uri")]
    pub install: bool,

    /// The `<scheme>://<payload>` URI passed by the OS
    pub uri: Option<String>,
}

/// Whether the OS passed anything after the program name.
pub fn has_argument<I>(args: I) -> bool
where
    I: IntoIterator,
{
    args.into_iter().nth(1).is_some()
}
