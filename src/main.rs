//! Churnguard CLI
//!
//! # Usage
//!
//! ```bash
//! # Train and write artifacts
//! churnguard train --config config.yaml
//!
//! # Score one customer
//! churnguard predict --artifacts artifacts --input customer.json
//!
//! # Check a processed batch for drift
//! churnguard drift --artifacts artifacts --batch processed_test.csv --bonferroni
//!
//! # Serve over HTTP
//! churnguard serve --artifacts artifacts --address 0.0.0.0:5000
//! ```

use churnguard::cli::{run_command, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}
