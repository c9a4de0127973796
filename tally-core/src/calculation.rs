//! Calculation records

use crate::{Number, NumberError, Operation};
use std::fmt;

/// Immutable record of two operands and an operation.
///
/// The result is never stored; `perform()` recomputes it on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    a: Number,
    b: Number,
    operation: Operation,
}

impl Calculation {
    pub fn new(a: Number, b: Number, operation: Operation) -> Self {
        Self { a, b, operation }
    }

    /// Alias of `new`, reads better at call sites that build from parsed input
    pub fn create(a: Number, b: Number, operation: Operation) -> Self {
        Self::new(a, b, operation)
    }

    pub fn a(&self) -> &Number {
        &self.a
    }

    pub fn b(&self) -> &Number {
        &self.b
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn perform(&self) -> Result<Number, NumberError> {
        self.operation.apply(&self.a, &self.b)
    }

    /// Human-readable form: "10 + 5 = 15"
    pub fn describe(&self) -> String {
        match self.perform() {
            Ok(result) => format!("{} {} {} = {}", self.a, self.operation.symbol(), self.b, result),
            Err(e) => format!("{} {} {} = <{}>", self.a, self.operation.symbol(), self.b, e),
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calculation({}, {}, {})", self.a, self.b, self.operation)
    }
}
