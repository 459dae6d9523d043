//! # Expression Engine
//!
//! Parses, validates and evaluates a single-variable function of `x`.
//!
//! Function text is tokenized and parsed by a small recursive-descent parser
//! into a syntax tree ([`ast::Node`]), which a tree-walking interpreter
//! evaluates. The grammar is closed: the operators `+ - * / ^`, unary minus,
//! the functions `sin cos tan asin acos atan sinh cosh tanh sqrt log exp abs`,
//! the constants `pi` and `e`, and the variable `x`. Anything else is a
//! parse error.
//!
//! An [`Expression`] is immutable once built and holds no interior state,
//! so it can be shared freely between threads.
//!
//! ## Example
//!
//! ```rust
//! use rootfind_core::expression::Expression;
//!
//! let f = Expression::new("x^2 - 4").unwrap();
//! assert_eq!(f.evaluate(3.0).unwrap(), 5.0);
//!
//! let slope = f.derivative(3.0).unwrap();
//! assert!((slope - 6.0).abs() < 1e-6);
//! ```

pub mod ast;
pub mod derivative;
mod error;
pub mod lexer;
pub mod parser;
pub mod sampling;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use ast::Node;
pub use derivative::{DerivativeOptions, Differentiation, DEFAULT_STEP};
pub use error::{EvaluationError, ExpressionError};
pub use sampling::{plot_range, sample, SamplePoint};

/// Values of `x` tried by [`Expression::validate`].
pub const SAMPLE_POINTS: [f64; 3] = [-1.0, 0.0, 1.0];

/// A parsed function of `x`.
///
/// Serializes as its source text; deserializing re-parses and validates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Expression {
    source: String,
    ast: Node,
    /// Exact derivative tree, when the shortcut table recognises the function.
    shortcut: Option<Node>,
}

impl Expression {
    /// Parse function text without sampling it.
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let ast = parser::parse(source)?;
        let shortcut = derivative::shortcut(&ast);
        Ok(Expression {
            source: source.trim().to_string(),
            ast,
            shortcut,
        })
    }

    /// Parse and validate function text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rootfind_core::expression::{Expression, ExpressionError};
    ///
    /// assert!(Expression::new("sin(x) + cos(x)").is_ok());
    /// assert!(matches!(
    ///     Expression::new("x + y"),
    ///     Err(ExpressionError::UnknownIdentifier { .. })
    /// ));
    /// ```
    pub fn new(source: &str) -> Result<Self, ExpressionError> {
        let expression = Self::parse(source)?;
        expression.validate()?;
        Ok(expression)
    }

    /// Evaluate at each of [`SAMPLE_POINTS`].
    ///
    /// Succeeds if at least one sample evaluates to a finite number, so
    /// functions with a restricted domain such as `log(x)` or `1/x` are
    /// accepted. Passing says nothing about the function being defined at
    /// the eventual root.
    pub fn validate(&self) -> Result<(), ExpressionError> {
        let mut first_failure = None;
        for x in SAMPLE_POINTS {
            match self.ast.eval(x) {
                Ok(_) => return Ok(()),
                Err(err) => {
                    first_failure.get_or_insert(err);
                }
            }
        }
        match first_failure {
            Some(err) => Err(ExpressionError::Undefined(err)),
            None => Ok(()),
        }
    }

    /// Evaluate `f(x)`.
    pub fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        self.ast.eval(x)
    }

    /// Central-difference derivative with the default step.
    pub fn derivative(&self, x: f64) -> Result<f64, EvaluationError> {
        derivative::central_difference(&self.ast, x, DEFAULT_STEP)
    }

    /// Derivative using the given method and step.
    ///
    /// With [`Differentiation::Shortcut`] an exact derivative is used when
    /// the function matches the shortcut table and evaluates cleanly at `x`;
    /// otherwise the central difference is used.
    pub fn derivative_with(&self, x: f64, options: &DerivativeOptions) -> Result<f64, EvaluationError> {
        if options.method == Differentiation::Shortcut {
            if let Some(Ok(slope)) = self.shortcut.as_ref().map(|d| d.eval(x)) {
                return Ok(slope);
            }
        }
        derivative::central_difference(&self.ast, x, options.step)
    }

    /// The function text, trimmed.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }

    /// Whether [`Differentiation::Shortcut`] can differentiate this function exactly.
    pub fn has_exact_derivative(&self) -> bool {
        self.shortcut.is_some()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl TryFrom<String> for Expression {
    type Error = ExpressionError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Expression::new(&source)
    }
}

impl From<Expression> for String {
    fn from(expression: Expression) -> Self {
        expression.source
    }
}

/// Parse and validate function text. Shorthand for [`Expression::new`].
pub fn validate(source: &str) -> Result<Expression, ExpressionError> {
    Expression::new(source)
}

/// Evaluate `expression` at `x`.
pub fn evaluate(expression: &Expression, x: f64) -> Result<f64, EvaluationError> {
    expression.evaluate(x)
}

/// Central-difference derivative of `expression` at `x` with step `h`.
pub fn derivative(expression: &Expression, x: f64, h: f64) -> Result<f64, EvaluationError> {
    derivative::central_difference(expression.ast(), x, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_restricted_domain() {
        assert!(Expression::new("log(x)").is_ok());
        assert!(Expression::new("1/x").is_ok());
        assert!(Expression::new("sqrt(x - 1)").is_ok());
    }

    #[test]
    fn test_validate_rejects_nowhere_defined() {
        let err = Expression::new("log(x - 5)").unwrap_err();
        assert!(matches!(
            err,
            ExpressionError::Undefined(EvaluationError::Domain { .. })
        ));
    }

    #[test]
    fn test_evaluate_is_pure() {
        let f = Expression::new("sin(x) * exp(-x^2) + atan(x)").unwrap();
        let a = f.evaluate(0.731).unwrap();
        let b = f.evaluate(0.731).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_shortcut_falls_back_to_central_difference() {
        let f = Expression::new("sqrt(x) - 2").unwrap();
        assert!(!f.has_exact_derivative());
        let slope = f.derivative_with(4.0, &DerivativeOptions::shortcut()).unwrap();
        assert!((slope - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_shortcut_used_when_recognised() {
        let f = Expression::new("x^3 - 2*x + 2").unwrap();
        assert!(f.has_exact_derivative());
        let slope = f.derivative_with(2.0, &DerivativeOptions::shortcut()).unwrap();
        assert_eq!(slope, 10.0);
    }

    #[test]
    fn test_serializes_as_source_text() {
        let f = Expression::new("  x^2 - 4 ").unwrap();
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(json, "\"x^2 - 4\"");
        let back: Expression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert!(serde_json::from_str::<Expression>("\"x +\"").is_err());
    }

    #[test]
    fn test_expression_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression>();
    }
}
