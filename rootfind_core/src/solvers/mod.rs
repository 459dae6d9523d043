//! # Root-Finding Solvers
//!
//! Newton-Raphson and Secant iteration over an [`Expression`](crate::expression::Expression).
//!
//! Both solvers follow the same contract:
//!
//! - Inputs are plain serializable structs with a `validate()` method.
//!   Bad parameters and bad function text are returned as `Err` before any
//!   iteration runs.
//! - Once the loop has started every outcome is `Ok(RootResult)`. A run
//!   that stops without a root (singular update, evaluation failure,
//!   exhausted budget, cancellation) reports `converged = false`, the
//!   error in `failure`, and the full partial history.
//! - Each call owns all of its state; nothing is shared between runs.
//!
//! ## Available Methods
//!
//! - [`newton`] - Newton-Raphson, one guess, derivative per step
//! - [`secant`] - Secant, two guesses, no derivative

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{SolveResult, SolverError};
use crate::expression::Expression;

pub mod config;
pub mod newton;
pub mod observe;
pub mod result;
pub mod secant;

pub use config::{SolverConfig, StoppingRule, SINGULARITY_THRESHOLD};
pub use newton::NewtonInput;
pub use observe::{Control, Observer, Step};
pub use result::{convergence_rate, Iteration, RootResult};
pub use secant::SecantInput;

/// Root-finding method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    NewtonRaphson,
    Secant,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::NewtonRaphson, Method::Secant];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Method::NewtonRaphson => "Newton-Raphson",
            Method::Secant => "Secant",
        }
    }

    /// Records a run may hold beyond `max_iterations`.
    ///
    /// Secant seeds two points before its first comparable error exists.
    pub fn bootstrap_offset(self) -> usize {
        match self {
            Method::NewtonRaphson => 0,
            Method::Secant => 1,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse and validate function text for a solver run.
pub(crate) fn parse_expression(source: &str) -> SolveResult<Expression> {
    Expression::new(source).map_err(|err| SolverError::invalid_expression(source, err.to_string()))
}

/// Reject a starting guess that is not a finite number.
pub(crate) fn validate_guess(field: &str, value: f64) -> SolveResult<()> {
    if !value.is_finite() {
        return Err(SolverError::invalid_parameters(
            field,
            value.to_string(),
            "Initial guess must be a finite number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(Method::NewtonRaphson.to_string(), "Newton-Raphson");
        assert_eq!(
            serde_json::to_string(&Method::NewtonRaphson).unwrap(),
            "\"newton_raphson\""
        );
    }

    #[test]
    fn test_parse_expression_maps_to_invalid_expression() {
        let err = parse_expression("x + y").unwrap_err();
        assert!(matches!(err, SolverError::InvalidExpression { ref expression, .. } if expression == "x + y"));
    }

    #[test]
    fn test_deeply_nested_text_is_an_invalid_expression() {
        let text = format!("{}x{}", "(".repeat(5_000), ")".repeat(5_000));
        let err = newton::solve(&NewtonInput::new(text, 1.0)).unwrap_err();
        assert!(matches!(err, SolverError::InvalidExpression { .. }));
    }
}
