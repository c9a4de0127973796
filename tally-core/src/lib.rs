//! Tally Core - Fundamental types
//!
//! This crate provides the core types used throughout Tally:
//! - `Number`: Exact decimal numbers
//! - `Operation`: The four arithmetic operations
//! - `Calculation`: An immutable operand/operation record
//! - `CalcError`: The error taxonomy shared by every layer

mod number;
mod operation;
mod calculation;
mod error;

pub use number::{Number, NumberError, MAX_EXPONENT};
pub use operation::Operation;
pub use calculation::Calculation;
pub use error::{CalcError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, Operation, Calculation, CalcError};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    mod number_tests {
        use super::*;

        #[test]
        fn test_from_i64() {
            let n = Number::from_i64(42);
            assert_eq!(n.to_i64(), Some(42));
        }

        #[test]
        fn test_from_str_decimal() {
            let n = num("3.14");
            assert!(!n.is_integer());
            assert_eq!(n.to_string(), "3.14");
        }

        #[test]
        fn test_from_str_trims_whitespace() {
            assert_eq!(num("  7 "), Number::from_i64(7));
        }

        #[test]
        fn test_from_str_scientific() {
            assert_eq!(num("1.5e2").to_i64(), Some(150));
            assert_eq!(num("602214076e15").to_string(), "602214076000000000000000");
        }

        #[test]
        fn test_rejects_non_numeric() {
            for bad in ["", "abc", "inf", "NaN", "1/3", "12a", "--", "."] {
                assert!(
                    matches!(Number::from_str(bad), Err(NumberError::ParseError(_))),
                    "'{}' should not parse", bad
                );
            }
        }

        #[test]
        fn test_exact_decimal_addition() {
            // 0.1 + 0.2 is exactly 0.3, unlike f64
            assert_eq!(num("0.1").add(&num("0.2")), num("0.3"));
        }

        #[test]
        fn test_plain_string_rendering() {
            assert_eq!(num("-0.025").to_string(), "-0.025");
            assert_eq!(num("2.50").to_string(), "2.5");
            assert_eq!(num("0").to_string(), "0");
            assert_eq!(num("10").to_string(), "10");
            assert_eq!(num("-1200").to_string(), "-1200");
        }

        #[test]
        fn test_rendering_round_trips() {
            for s in ["123.456", "-0.0001", "1e-7", "98765432109876543210"] {
                let n = num(s);
                assert_eq!(num(&n.to_string()), n, "round trip of {}", s);
            }
        }

        #[test]
        fn test_exponent_is_bounded() {
            assert_eq!(num("1e4096").to_string().len(), 4097);
            assert_eq!(num("-1e-4096").to_string().len(), 4099);
            for bad in ["1e20000000000", "1e4097", "1.5e20000000000", "7e-9999", "1e99999999999999999999"] {
                assert!(
                    matches!(Number::from_str(bad), Err(NumberError::ParseError(_))),
                    "'{}' should not parse", bad
                );
            }
            assert!(num("0e99999").is_zero());
        }

        #[test]
        fn test_serde_uses_decimal_string() {
            let n = num("2.50");
            assert_eq!(serde_json::to_string(&n).unwrap(), "\"2.5\"");
            assert_eq!(serde_json::from_str::<Number>("\"-0.025\"").unwrap(), num("-0.025"));
            assert!(serde_json::from_str::<Number>("\"abc\"").is_err());
        }

        #[test]
        fn test_checked_div() {
            assert_eq!(num("10").checked_div(&num("4")).unwrap().to_string(), "2.5");
            assert_eq!(num("1").checked_div(&num("0")), Err(NumberError::DivisionByZero));
        }

        #[test]
        fn test_predicates() {
            assert!(num("0.0").is_zero());
            assert!(num("-3").is_negative());
            assert!(num("4.000").is_integer());
        }
    }

    mod operation_tests {
        use super::*;

        #[test]
        fn test_apply() {
            assert_eq!(Operation::Add.apply(&num("2"), &num("3")).unwrap(), num("5"));
            assert_eq!(Operation::Subtract.apply(&num("2"), &num("3")).unwrap(), num("-1"));
            assert_eq!(Operation::Multiply.apply(&num("3"), &num("4")).unwrap(), num("12"));
            assert_eq!(Operation::Divide.apply(&num("8"), &num("2")).unwrap(), num("4"));
        }

        #[test]
        fn test_divide_by_zero() {
            let err = Operation::Divide.apply(&num("8"), &num("0")).unwrap_err();
            assert_eq!(CalcError::from(err), CalcError::DivisionByZero);
        }

        #[test]
        fn test_name_mapping_is_total() {
            for op in Operation::ALL {
                assert_eq!(op.name().parse::<Operation>().unwrap(), op);
            }
            assert_eq!("  DIVIDE ".parse::<Operation>().unwrap(), Operation::Divide);
        }

        #[test]
        fn test_unknown_name() {
            let err = "modulo".parse::<Operation>().unwrap_err();
            assert_eq!(err, CalcError::UnknownOperation("modulo".to_string()));
            assert_eq!(err.code(), codes::UNKNOWN_OPERATION);
        }
    }

    mod calculation_tests {
        use super::*;

        #[test]
        fn test_perform_is_repeatable() {
            let calc = Calculation::create(num("10"), num("5"), Operation::Subtract);
            assert_eq!(calc.perform().unwrap(), num("5"));
            assert_eq!(calc.perform().unwrap(), num("5"));
        }

        #[test]
        fn test_display() {
            let calc = Calculation::new(num("10"), num("5"), Operation::Add);
            assert_eq!(calc.to_string(), "Calculation(10, 5, add)");
        }

        #[test]
        fn test_describe() {
            let calc = Calculation::new(num("1.5"), num("2"), Operation::Multiply);
            assert_eq!(calc.describe(), "1.5 * 2 = 3");

            let broken = Calculation::new(num("1"), num("0"), Operation::Divide);
            assert!(broken.describe().contains("Division by zero"));
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_number_error_mapping() {
            let parse = CalcError::from(NumberError::ParseError("x".into()));
            assert_eq!(parse.code(), codes::INVALID_OPERAND);
            let div = CalcError::from(NumberError::DivisionByZero);
            assert_eq!(div.code(), codes::DIV_ZERO);
            assert_ne!(parse.code(), div.code());
        }

        #[test]
        fn test_messages() {
            assert_eq!(CalcError::DivisionByZero.to_string(), "Cannot divide by zero");
            assert_eq!(
                CalcError::arg_count("Subtract", 2, 1).to_string(),
                "Subtract command requires exactly 2 arguments, got 1"
            );
            assert_eq!(CalcError::unknown_command("Bogus").to_string(), "No such command: Bogus");
        }

        #[test]
        fn test_suggestions() {
            let err = CalcError::unknown_command("ad").with_suggestions(vec!["add".into()]);
            assert!(err.suggestion().unwrap().contains("add"));
            assert!(CalcError::Persistence("disk".into()).suggestion().is_none());
        }

        #[test]
        fn test_user_error_classification() {
            assert!(CalcError::EmptyInput.is_user_error());
            assert!(CalcError::DivisionByZero.is_user_error());
            assert!(!CalcError::Internal("lock".into()).is_user_error());
            assert!(!CalcError::Plugin("bad".into()).is_user_error());
        }
    }
}
