use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning function text into a syntax tree, or while
/// validating the tree at the sample points.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ExpressionError {
    /// The function text is empty or whitespace only
    #[error("Function cannot be empty")]
    Empty,

    /// A character outside the grammar
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// A numeric literal that does not parse as f64
    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    /// A token that cannot appear where it was found
    #[error("Unexpected '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },

    /// The text ended in the middle of an expression
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// An identifier that is neither `x` nor a known constant
    #[error("Unknown identifier '{name}' at position {position}")]
    UnknownIdentifier { name: String, position: usize },

    /// A call to a function outside the built-in set
    #[error("Unknown function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },

    /// A built-in function called with the wrong number of arguments
    #[error("Function '{function}' expects {expected} argument(s), got {found}")]
    WrongArity {
        function: String,
        expected: usize,
        found: usize,
    },

    /// Parentheses, calls, signs or operator chains nested past the limit
    #[error("Expression nests deeper than {limit} levels (at position {position})")]
    TooDeep { limit: usize, position: usize },

    /// The expression parsed but failed at every validation sample
    #[error("Function is undefined at every sample point: {0}")]
    Undefined(EvaluationError),
}

/// Errors raised while evaluating a parsed expression at a given `x`.
///
/// Every variant carries the `x` that was being evaluated, so a solver can
/// report exactly which iterate left the function's domain.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum EvaluationError {
    /// Division by an exact zero
    #[error("division by zero at x = {x}")]
    DivisionByZero { x: f64 },

    /// A function argument outside its real domain, e.g. `log` of a negative number
    #[error("{function}({argument}) is undefined (x = {x})")]
    Domain {
        function: String,
        argument: f64,
        x: f64,
    },

    /// An intermediate or final value overflowed or became NaN
    #[error("result is not a finite number at x = {x}")]
    NonFinite { x: f64 },
}

impl EvaluationError {
    /// The `x` at which evaluation failed.
    pub fn x(&self) -> f64 {
        match self {
            EvaluationError::DivisionByZero { x }
            | EvaluationError::Domain { x, .. }
            | EvaluationError::NonFinite { x } => *x,
        }
    }
}
