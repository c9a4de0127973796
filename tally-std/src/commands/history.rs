//! History management commands
//!
//! Each adapts one history store operation. Store failures are reported
//! to the user and never propagate: a failed save must not end the session.

use tally_history::{DeleteOutcome, SaveOutcome};
use tally_plugin::prelude::*;
use tracing::error;

pub struct SaveHistory;
pub struct LoadHistory;
pub struct ClearHistory;
pub struct DeleteHistory;
pub struct PrintHistory;

impl Command for SaveHistory {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            description: "Merge the session history into the history file",
            usage: "savehistory",
        }
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        match ctx.history().save() {
            Ok(SaveOutcome::Written { .. }) => ctx.emit("History saved successfully."),
            Ok(SaveOutcome::Skipped) => ctx.emit("History was cleared; nothing saved."),
            Err(e) => {
                error!(error = %e, "save command failed");
                ctx.emit(format!("Failed to save history: {}", e));
            }
        }
        Ok(None)
    }
}

impl Command for LoadHistory {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            description: "Replace the session history with the history file",
            usage: "loadhistory",
        }
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        match ctx.history_mut().load() {
            Ok(count) => ctx.emit(format!("History loaded successfully ({} records).", count)),
            Err(e) => {
                error!(error = %e, "load command failed");
                ctx.emit(format!("Failed to load history: {}", e));
            }
        }
        Ok(None)
    }
}

impl Command for ClearHistory {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            description: "Clear the session history (the file is kept)",
            usage: "clearhistory",
        }
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        ctx.history_mut().clear();
        ctx.emit("History cleared successfully.");
        Ok(None)
    }
}

impl Command for DeleteHistory {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            description: "Delete the history file and clear the session history",
            usage: "deletehistory",
        }
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        match ctx.history_mut().delete() {
            Ok(DeleteOutcome::Removed) => ctx.emit("History deleted successfully."),
            Ok(DeleteOutcome::NotFound) => ctx.emit("No history file found to delete."),
            Err(e) => {
                error!(error = %e, "delete command failed");
                ctx.emit(format!("Failed to delete history: {}", e));
            }
        }
        Ok(None)
    }
}

impl Command for PrintHistory {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            description: "Show the calculations of this session",
            usage: "printhistory",
        }
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        let lines: Vec<String> = ctx.history()
            .get_all()
            .iter()
            .enumerate()
            .map(|(i, calc)| format!("{}. {}", i + 1, calc.describe()))
            .collect();

        if lines.is_empty() {
            ctx.emit("No history available.");
        }
        for line in lines {
            ctx.emit(line);
        }
        Ok(None)
    }
}

pub fn save() -> Box<dyn Command> {
    Box::new(SaveHistory)
}

pub fn load() -> Box<dyn Command> {
    Box::new(LoadHistory)
}

pub fn clear() -> Box<dyn Command> {
    Box::new(ClearHistory)
}

pub fn delete() -> Box<dyn Command> {
    Box::new(DeleteHistory)
}

pub fn print() -> Box<dyn Command> {
    Box::new(PrintHistory)
}
