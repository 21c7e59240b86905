use clap::{ArgAction, Parser};
use irbis_core::store::ThreadId;

/// irbis: chat with your data from the terminal.
/// Starts an interactive session by default, or runs a single turn
/// non-interactively with --turn.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase message verbosity.
    ///
    /// Specify multiple times for more verbose output:
    ///  -v:  INFO level
    ///  -vv: DEBUG level
    ///  -vvv: TRACE level (most verbose)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Model name to use (falls back to MODEL_NAME, then the default).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Resume a persisted conversation thread by id.
    #[arg(long)]
    pub thread: Option<ThreadId>,

    /// Run a single turn non-interactively and exit.
    #[arg(short, long)]
    pub turn: Option<String>,
}
