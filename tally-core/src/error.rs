//! Calculator errors
//!
//! One error type crosses every crate boundary. Each variant carries a
//! machine-readable code so the REPL (and tests) can tell conditions apart
//! without matching on message text.

use crate::NumberError;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_OPERAND: &str = "INVALID_OPERAND";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
    pub const EMPTY_INPUT: &str = "EMPTY_INPUT";
    pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";
    pub const PERSISTENCE: &str = "PERSISTENCE";
    pub const PLUGIN: &str = "PLUGIN";
    pub const INTERNAL: &str = "INTERNAL";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Invalid input for decimal conversion: '{0}'")]
    InvalidOperand(String),

    #[error("{command} command requires exactly {expected} arguments, got {got}")]
    ArgumentCount {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("Cannot divide by zero")]
    DivisionByZero,

    #[error("No such command: {name}")]
    UnknownCommand {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("No input provided")]
    EmptyInput,

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("History persistence failed: {0}")]
    Persistence(String),

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalcError {
    pub fn arg_count(command: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::ArgumentCount { command: command.into(), expected, got }
    }

    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into(), suggestions: Vec::new() }
    }

    /// Builder: attach "did you mean" candidates to an unknown command
    pub fn with_suggestions(self, candidates: Vec<String>) -> Self {
        match self {
            Self::UnknownCommand { name, .. } => Self::UnknownCommand { name, suggestions: candidates },
            other => other,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOperand(_) => codes::INVALID_OPERAND,
            Self::ArgumentCount { .. } => codes::ARG_COUNT,
            Self::DivisionByZero => codes::DIV_ZERO,
            Self::UnknownCommand { .. } => codes::UNKNOWN_COMMAND,
            Self::EmptyInput => codes::EMPTY_INPUT,
            Self::UnknownOperation(_) => codes::UNKNOWN_OPERATION,
            Self::Persistence(_) => codes::PERSISTENCE,
            Self::Plugin(_) => codes::PLUGIN,
            Self::Internal(_) => codes::INTERNAL,
        }
    }

    /// Errors caused by what the user typed, as opposed to broken state
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOperand(_)
                | Self::ArgumentCount { .. }
                | Self::DivisionByZero
                | Self::UnknownCommand { .. }
                | Self::EmptyInput
                | Self::UnknownOperation(_)
        )
    }

    /// Hint shown under the error message, if any
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnknownCommand { suggestions, .. } if !suggestions.is_empty() => {
                Some(format!("Similar: {}. Type 'Menu' for the full list.", suggestions.join(", ")))
            }
            Self::UnknownCommand { .. } | Self::EmptyInput => {
                Some("Type 'Menu' to see the list of available commands".to_string())
            }
            Self::DivisionByZero => Some("Ensure divisor is not zero".to_string()),
            _ => None,
        }
    }
}

impl From<NumberError> for CalcError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::InvalidOperand(s),
            NumberError::DivisionByZero => Self::DivisionByZero,
        }
    }
}
