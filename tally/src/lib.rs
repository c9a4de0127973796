//! Tally - interactive calculator
//!
//! Ties the command registry, the session history and the terminal
//! together. The binary in `tally-cli` is a thin wrapper around [`Repl`].

pub mod config;
pub mod logging;
mod repl;

pub use config::Settings;
pub use repl::{build_registry, open_context, Repl, BANNER, EXIT_COMMAND, GOODBYE, INVALID_UTF8, PROMPT};

// Re-export for convenience
pub use tally_core::{CalcError, Calculation, Number, Operation};
pub use tally_history::{Calculator, HistoryStore};
pub use tally_plugin::{Command, CommandContext, CommandMeta, CommandRegistry};
pub use tally_std::standard_registry;
