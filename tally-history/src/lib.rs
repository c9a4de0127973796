//! Tally History
//!
//! Ordered calculation history with explicit CSV persistence, and the
//! `Calculator` facade that feeds it.

mod error;
mod store;
mod calculator;

pub use error::HistoryError;
pub use store::{HistoryStore, SaveOutcome, DeleteOutcome, HEADER};
pub use calculator::Calculator;

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{CalcError, Number, Operation};

    fn calculator() -> (tempfile::TempDir, Calculator) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));
        (dir, Calculator::new(store))
    }

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    #[test]
    fn test_perform_operation_records_once() {
        let (_dir, mut calc) = calculator();
        let result = calc.perform_operation(num("2"), num("3"), Operation::Add).unwrap();
        assert_eq!(result, num("5"));
        assert_eq!(calc.history().len(), 1);

        let latest = calc.history().latest().unwrap();
        assert_eq!(latest.perform().unwrap(), result);
    }

    #[test]
    fn test_convenience_operations() {
        let (_dir, mut calc) = calculator();
        assert_eq!(calc.add(num("1.1"), num("2.2")).unwrap(), num("3.3"));
        assert_eq!(calc.subtract(num("5"), num("7")).unwrap(), num("-2"));
        assert_eq!(calc.multiply(num("1.5"), num("4")).unwrap(), num("6"));
        assert_eq!(calc.divide(num("1"), num("8")).unwrap(), num("0.125"));
        assert_eq!(calc.history().len(), 4);
    }

    #[test]
    fn test_failed_division_records_nothing() {
        let (_dir, mut calc) = calculator();
        assert_eq!(calc.divide(num("8"), num("0")), Err(CalcError::DivisionByZero));
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_perform_unsets_cleared_flag() {
        let (_dir, mut calc) = calculator();
        calc.history_mut().clear();
        calc.add(num("1"), num("1")).unwrap();
        assert!(!calc.history().is_cleared());
    }

    #[test]
    fn test_history_error_maps_to_persistence() {
        let err = HistoryError::Row { line: 3, reason: "bad".into() };
        let calc_err: CalcError = err.into();
        assert_eq!(calc_err, CalcError::Persistence("line 3: bad".into()));
    }
}
