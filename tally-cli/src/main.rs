//! Tally command-line calculator
//!
//! Configuration comes from the environment (and `.env`):
//! - HISTORY_FILE_PATH: history CSV file (default `calculation_history.csv`)
//! - PLUGIN_DIR: plugin directory; built-in commands when unset
//! - ENVIRONMENT: deployment label (default `PRODUCTION`)
//! - RUST_LOG: log filter (default `info`), logs go to stderr
//! - LOAD_HISTORY_ON_START: `true` or `1` to load history at startup

use std::io;
use std::process;

use tally::{logging, Repl, Settings};
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let settings = Settings::from_env();
    logging::init(&settings.log_filter);

    info!(
        version = VERSION,
        environment = %settings.environment,
        history = %settings.history_path.display(),
        "Tally started"
    );

    let mut repl = match Repl::from_settings(&settings) {
        Ok(repl) => repl,
        Err(e) => {
            error!(error = %e, "Failed to load plugins");
            eprintln!("Failed to load plugins: {}", e);
            process::exit(1);
        }
    };
    info!(commands = repl.registry().len(), "Commands registered");

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = repl.run(stdin.lock(), stdout.lock()) {
        error!(error = %e, "Terminal I/O failed");
        process::exit(1);
    }

    info!("Tally shutting down");
}
