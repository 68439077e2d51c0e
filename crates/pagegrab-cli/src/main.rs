use pagegrab_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; a run must not fail over its log file.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("pagegrab error: {:#}", err);
        std::process::exit(1);
    }
}
