//! Plugin traits

use crate::CommandContext;
use tally_core::{CalcError, Number};

/// Metadata for a command plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMeta {
    pub description: &'static str,
    pub usage: &'static str,
}

/// Command plugin (may have side effects on the context)
///
/// `args` are the whitespace-separated tokens after the command name.
/// Commands that compute something return it; the rest return `None`.
pub trait Command: Send + Sync {
    fn meta(&self) -> CommandMeta;
    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError>;
}
