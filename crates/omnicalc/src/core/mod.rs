//! Calculator core: operators, evaluation, history and the input reducer
//!
//! Nothing in here fails. Numeric problems such as division by zero surface
//! as the display string `"Error"` and input keeps working afterwards.

pub mod evaluator;
pub mod history;
mod operations;
pub mod reducer;

pub use evaluator::{evaluate, format_result, parse_number, ERROR};
pub use history::{History, HistoryItem};
pub use operations::Operator;
pub use reducer::{CalculatorState, Event};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_work_together() {
        let mut state = CalculatorState::new();
        for key in ["9", "/", "4", "="] {
            state.dispatch(Event::from_key(key).unwrap());
        }
        assert_eq!(state.current_value(), "2.25");
        assert_eq!(
            format_result(evaluate(9.0, 4.0, Some(Operator::Divide))),
            "2.25"
        );
    }

    #[test]
    fn test_error_constant() {
        assert_eq!(ERROR, "Error");
        assert!(parse_number(ERROR).is_nan());
    }
}
