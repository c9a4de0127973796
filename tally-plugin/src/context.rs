//! Command Context

use tally_history::{Calculator, HistoryStore};

/// Execution context passed to commands
///
/// Owns the session's calculator (and through it the history store) plus
/// the lines commands want shown to the user.
#[derive(Debug)]
pub struct CommandContext {
    calculator: Calculator,
    output: Vec<String>,
}

impl CommandContext {
    pub fn new(history: HistoryStore) -> Self {
        Self::with_calculator(Calculator::new(history))
    }

    pub fn with_calculator(calculator: Calculator) -> Self {
        Self {
            calculator,
            output: Vec::new(),
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut Calculator {
        &mut self.calculator
    }

    pub fn history(&self) -> &HistoryStore {
        self.calculator.history()
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        self.calculator.history_mut()
    }

    /// Queue a line of user-facing output
    pub fn emit(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Drain queued output
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn into_history(self) -> HistoryStore {
        self.calculator.into_history()
    }
}
