//! Read-eval loop
//!
//! Reads one command per line, dispatches it through the registry and
//! writes whatever the command emitted. Nothing a command does ends the
//! loop; only `exit` or end of input does, and history is saved either way.

use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use tally_core::CalcError;
use tally_history::{HistoryStore, SaveOutcome};
use tally_plugin::{CommandContext, CommandRegistry, PluginLoader};
use tracing::{debug, error, info, warn};

use crate::config::Settings;

pub const BANNER: &str = "Type 'Menu' to see the list of available commands or 'Exit' to exit.";
pub const PROMPT: &str = ">>> ";
pub const GOODBYE: &str = "Exiting the calculator. Goodbye!";
pub const EXIT_COMMAND: &str = "exit";
pub const INVALID_UTF8: &str = "input is not valid UTF-8";

/// Registry for a session: the plugin directory when configured,
/// otherwise every built-in command.
pub fn build_registry(settings: &Settings) -> Result<CommandRegistry, CalcError> {
    match &settings.plugin_dir {
        Some(dir) => {
            let registry = CommandRegistry::new();
            PluginLoader::new(dir).load(&tally_std::catalog(), &registry)?;
            Ok(registry)
        }
        None => Ok(tally_std::standard_registry()),
    }
}

/// Fresh session context, rehydrated from disk when asked to
pub fn open_context(settings: &Settings) -> CommandContext {
    let mut history = HistoryStore::new(&settings.history_path);
    if settings.load_history_on_start {
        if let Err(e) = history.load() {
            warn!(error = %e, "Starting with empty history");
        }
    }
    CommandContext::new(history)
}

pub struct Repl {
    registry: CommandRegistry,
    context: CommandContext,
}

impl Repl {
    pub fn new(registry: CommandRegistry, context: CommandContext) -> Self {
        Self { registry, context }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CalcError> {
        Ok(Self::new(build_registry(settings)?, open_context(settings)))
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub fn into_context(self) -> CommandContext {
        self.context
    }

    /// Run until `exit` or end of input, then save history.
    ///
    /// Only I/O failures on `input` or `output` are returned.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let outcome = self.read_eval(&mut input, &mut output);
        let saved = self.save_on_exit(&mut output);
        outcome.and(saved)
    }

    fn read_eval<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<()> {
        writeln!(output, "{}", BANNER)?;

        let mut buf = Vec::new();
        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(output)?;
                writeln!(output, "{}", GOODBYE)?;
                info!("End of input, exiting the calculator");
                return Ok(());
            }

            // A badly encoded line is the user's mistake, not a broken stream
            let Ok(line) = std::str::from_utf8(&buf) else {
                warn!(bytes = buf.len(), "Input line is not valid UTF-8");
                writeln!(output, "Error: {}", INVALID_UTF8)?;
                continue;
            };

            let command = line.trim();
            if command.eq_ignore_ascii_case(EXIT_COMMAND) {
                writeln!(output, "{}", GOODBYE)?;
                info!("Exiting the calculator");
                return Ok(());
            }

            self.eval(command, output)?;
        }
    }

    fn eval<W: Write>(&mut self, command: &str, output: &mut W) -> io::Result<()> {
        let registry = &self.registry;
        let context = &mut self.context;
        let result = panic::catch_unwind(AssertUnwindSafe(|| registry.dispatch(command, context)))
            .unwrap_or_else(|payload| {
                Err(CalcError::Internal(format!("command panicked: {}", panic_message(payload.as_ref()))))
            });

        for line in self.context.take_output() {
            writeln!(output, "{}", line)?;
        }

        match result {
            Ok(value) => {
                debug!(command, ?value, "command completed");
            }
            Err(e) if e.is_user_error() => {
                warn!(code = e.code(), error = %e, "Error executing command");
                writeln!(output, "Error: {}", e)?;
                if let Some(hint) = self.hint(&e) {
                    writeln!(output, "  {}", hint)?;
                }
            }
            Err(e) => {
                error!(code = e.code(), error = %e, "An unexpected error occurred");
                writeln!(output, "An unexpected error occurred: {}", e)?;
            }
        }
        Ok(())
    }

    fn hint(&self, err: &CalcError) -> Option<String> {
        match err {
            CalcError::ArgumentCount { command, .. } => {
                self.registry.describe(command).map(|meta| format!("Usage: {}", meta.usage))
            }
            other => other.suggestion(),
        }
    }

    fn save_on_exit<W: Write>(&mut self, output: &mut W) -> io::Result<()> {
        match self.context.history().save() {
            Ok(SaveOutcome::Written { rows }) => {
                debug!(rows, "History saved on exit");
                Ok(())
            }
            Ok(SaveOutcome::Skipped) => Ok(()),
            Err(e) => {
                error!(error = %e, "Failed to save history on exit");
                writeln!(output, "Failed to save history: {}", e)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
