//! Calculator facade: the only arithmetic write path into history

use crate::HistoryStore;
use tally_core::{CalcError, Calculation, Number, Operation};

#[derive(Debug)]
pub struct Calculator {
    history: HistoryStore,
}

impl Calculator {
    pub fn new(history: HistoryStore) -> Self {
        Self { history }
    }

    /// Compute `operation(a, b)` and record it.
    ///
    /// The history grows by exactly one record per successful call; a
    /// failing computation records nothing.
    pub fn perform_operation(&mut self, a: Number, b: Number, operation: Operation) -> Result<Number, CalcError> {
        let calculation = Calculation::create(a, b, operation);
        let result = calculation.perform()?;
        self.history.add(calculation);
        Ok(result)
    }

    pub fn add(&mut self, a: Number, b: Number) -> Result<Number, CalcError> {
        self.perform_operation(a, b, Operation::Add)
    }

    pub fn subtract(&mut self, a: Number, b: Number) -> Result<Number, CalcError> {
        self.perform_operation(a, b, Operation::Subtract)
    }

    pub fn multiply(&mut self, a: Number, b: Number) -> Result<Number, CalcError> {
        self.perform_operation(a, b, Operation::Multiply)
    }

    pub fn divide(&mut self, a: Number, b: Number) -> Result<Number, CalcError> {
        self.perform_operation(a, b, Operation::Divide)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn into_history(self) -> HistoryStore {
        self.history
    }
}
