//! CLI command implementations

mod drift;
mod predict;
#[cfg(feature = "server")]
mod serve;
mod train;


pub use drift::align_to_reference;
pub use predict::json_to_fields;

use crate::cli::{init_tracing, Cli, Command, LogLevel};
use crate::error::Result;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);
    init_tracing(log_level);

    match cli.command {
        Command::Train(args) => train::run_train(args, log_level),
        Command::Predict(args) => predict::run_predict(args, log_level),
        Command::Drift(args) => drift::run_drift(args, log_level),
        #[cfg(feature = "server")]
        Command::Serve(args) => serve::run_serve(args, log_level),
    }
}
