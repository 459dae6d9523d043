//! # Error Types
//!
//! Structured error types for rootfind_core. Every failure a solver can
//! report is a variant of [`SolverError`], so a front end can react to the
//! exact cause (a singular update rule is not the same problem as an
//! exhausted iteration budget) and show the matching advice.
//!
//! ## Example
//!
//! ```rust
//! use rootfind_core::errors::{SolverError, SolveResult};
//!
//! fn validate_tolerance(tolerance: f64) -> SolveResult<()> {
//!     if !(tolerance > 0.0) {
//!         return Err(SolverError::invalid_parameters(
//!             "tolerance",
//!             tolerance.to_string(),
//!             "Tolerance must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_tolerance(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expression::EvaluationError;

/// Result type alias for rootfind_core operations
pub type SolveResult<T> = Result<T, SolverError>;

/// Structured error type for solver operations.
///
/// `InvalidExpression` and `InvalidParameters` are raised before any
/// iteration runs. The remaining variants end a run that already started;
/// solvers attach them to the returned [`RootResult`](crate::solvers::RootResult)
/// together with the partial iteration history.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SolverError {
    /// The function text failed to parse or could not be evaluated at any sample point
    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// A solver parameter is out of range
    #[error("Invalid parameter '{field}': {value} - {reason}")]
    InvalidParameters {
        field: String,
        value: String,
        reason: String,
    },

    /// The function could not be evaluated at an iterate
    #[error("Evaluation failed at x = {x}: {reason}")]
    Evaluation { x: f64, reason: String },

    /// Newton-Raphson hit a point where |f'(x)| is below the singularity threshold
    #[error("Derivative too close to zero at x = {x} (f'(x) = {derivative:e})")]
    DerivativeNearZero { x: f64, derivative: f64 },

    /// Secant hit two iterates whose function values are nearly equal
    #[error("Near-zero denominator between x = {x_prev} and x = {x_curr} (difference {difference:e})")]
    NearZeroDenominator {
        x_prev: f64,
        x_curr: f64,
        difference: f64,
    },

    /// The iteration budget ran out before the tolerance was met
    #[error("Failed to converge within {max_iterations} iterations")]
    MaxIterationsReached { max_iterations: usize },

    /// A caller-supplied observer asked the solver to stop
    #[error("Cancelled by caller at iteration {iteration}")]
    Cancelled { iteration: usize },
}

/// Flat tag for a [`SolverError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidExpression,
    InvalidParameters,
    Evaluation,
    DerivativeNearZero,
    NearZeroDenominator,
    MaxIterationsReached,
    Cancelled,
}

impl SolverError {
    /// Create an InvalidExpression error
    pub fn invalid_expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        SolverError::InvalidExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidParameters error
    pub fn invalid_parameters(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SolverError::InvalidParameters {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an Evaluation error
    pub fn evaluation(x: f64, reason: impl Into<String>) -> Self {
        SolverError::Evaluation {
            x,
            reason: reason.into(),
        }
    }

    /// Get the payload-free tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolverError::InvalidExpression { .. } => ErrorKind::InvalidExpression,
            SolverError::InvalidParameters { .. } => ErrorKind::InvalidParameters,
            SolverError::Evaluation { .. } => ErrorKind::Evaluation,
            SolverError::DerivativeNearZero { .. } => ErrorKind::DerivativeNearZero,
            SolverError::NearZeroDenominator { .. } => ErrorKind::NearZeroDenominator,
            SolverError::MaxIterationsReached { .. } => ErrorKind::MaxIterationsReached,
            SolverError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Check if the update rule itself broke down (zero derivative or denominator)
    pub fn is_singularity(&self) -> bool {
        matches!(
            self,
            SolverError::DerivativeNearZero { .. } | SolverError::NearZeroDenominator { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SolverError::InvalidExpression { .. } => "INVALID_EXPRESSION",
            SolverError::InvalidParameters { .. } => "INVALID_PARAMETERS",
            SolverError::Evaluation { .. } => "EVALUATION_ERROR",
            SolverError::DerivativeNearZero { .. } => "DERIVATIVE_NEAR_ZERO",
            SolverError::NearZeroDenominator { .. } => "NEAR_ZERO_DENOMINATOR",
            SolverError::MaxIterationsReached { .. } => "MAX_ITERATIONS_REACHED",
            SolverError::Cancelled { .. } => "CANCELLED",
        }
    }

    /// Get a one-line suggestion a presentation layer can show next to the error
    pub fn guidance(&self) -> &'static str {
        match self {
            SolverError::InvalidExpression { .. } => {
                "Check the function syntax; only x, pi, e and the built-in functions are allowed"
            }
            SolverError::InvalidParameters { .. } => {
                "Use a positive tolerance, a positive iteration limit and two distinct guesses"
            }
            SolverError::Evaluation { .. } => {
                "The function is undefined near the iterates; try a different initial guess"
            }
            SolverError::DerivativeNearZero { .. } | SolverError::NearZeroDenominator { .. } => {
                "The update rule became singular; try a different initial guess"
            }
            SolverError::MaxIterationsReached { .. } => {
                "Raise the iteration limit or loosen the tolerance"
            }
            SolverError::Cancelled { .. } => "The run was stopped before it finished",
        }
    }
}

impl From<EvaluationError> for SolverError {
    fn from(err: EvaluationError) -> Self {
        SolverError::evaluation(err.x(), err.to_string())
    }
}
