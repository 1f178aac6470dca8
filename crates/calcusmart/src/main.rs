//! CalcuSmart CLI: drive the calculator from a terminal
//!
//! ## Usage
//!
//! ```bash
//! calcusmart 1 2 + 3 =                    # 15
//! calcusmart -m scientific 2 ^ 1 0 =      # 1024
//! calcusmart --prefs ~/.calcusmart.json   # read key lines from stdin
//! ```

use calcusmart::cli::{self, Cli};
use calcusmart::logging;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with_config(&cli.logging_config());

    match cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
