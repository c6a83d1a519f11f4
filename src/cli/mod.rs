//! Command-line interface: `train`, `predict`, `drift` and `serve`.

mod args;
mod commands;
mod logging;

#[cfg(feature = "server")]
pub use args::ServeArgs;
pub use args::{parse_args, Cli, Command, DriftArgs, PredictArgs, TrainArgs};
pub use commands::{align_to_reference, json_to_fields, run_command};
pub use logging::{init_tracing, LogLevel};
