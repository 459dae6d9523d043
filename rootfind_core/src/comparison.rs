//! # Method Comparison
//!
//! Pure aggregation of two finished [`RootResult`]s into a
//! [`ComparisonResult`], plus [`compare_methods`], which runs Newton-Raphson
//! and Secant on the same function and compares them.
//!
//! Judgments:
//!
//! - Neither run converged: every verdict is [`Verdict::Neither`].
//! - Exactly one converged: it wins every verdict except the convergence
//!   rate, which needs two converged runs.
//! - Both converged: fewer `total_iterations` wins on iterations, smaller
//!   `|f(root)|` wins on accuracy, a higher order estimate wins on rate.
//!   Equal values are a [`Verdict::Tie`]. The overall winner is decided by
//!   iterations, then by accuracy.
//!
//! ## Example
//!
//! ```rust
//! use rootfind_core::comparison::{compare_methods, ComparisonInput, Verdict};
//!
//! let input = ComparisonInput::new("x^2 - 4", 3.0, 2.5);
//! let comparison = compare_methods(&input).unwrap();
//!
//! assert!(comparison.first.result.converged);
//! assert!(comparison.second.result.converged);
//! assert_ne!(comparison.winner, Verdict::Neither);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::SolveResult;
use crate::expression::DerivativeOptions;
use crate::solvers::{self, newton, secant, NewtonInput, RootResult, SecantInput, SolverConfig};

/// A result with the label it is compared under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedResult {
    pub name: String,
    pub result: RootResult,
}

impl NamedResult {
    pub fn new(name: impl Into<String>, result: RootResult) -> Self {
        NamedResult {
            name: name.into(),
            result,
        }
    }
}

impl From<RootResult> for NamedResult {
    /// Label the result with its method name.
    fn from(result: RootResult) -> Self {
        NamedResult::new(result.method.name(), result)
    }
}

/// Which side of a comparison won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    First,
    Second,
    Tie,
    /// No side qualifies
    Neither,
}

impl Verdict {
    /// Smaller value wins.
    fn lower_wins(a: f64, b: f64) -> Verdict {
        match a.partial_cmp(&b) {
            Some(Ordering::Less) => Verdict::First,
            Some(Ordering::Greater) => Verdict::Second,
            _ => Verdict::Tie,
        }
    }
}

/// Two results side by side with derived judgments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub first: NamedResult,
    pub second: NamedResult,
    pub winner: Verdict,
    pub winner_by_iterations: Verdict,
    pub winner_by_accuracy: Verdict,
    pub winner_by_convergence_rate: Verdict,
    /// `|total_iterations_first - total_iterations_second|`
    pub iteration_delta: usize,
    /// `|execution_time_first - execution_time_second|` in milliseconds
    pub execution_time_delta_ms: f64,
}

impl ComparisonResult {
    /// Name of the overall winner, if there is a single one.
    pub fn winner_name(&self) -> Option<&str> {
        self.name_of(self.winner)
    }

    /// Name of the side a verdict points at.
    pub fn name_of(&self, verdict: Verdict) -> Option<&str> {
        match verdict {
            Verdict::First => Some(&self.first.name),
            Verdict::Second => Some(&self.second.name),
            Verdict::Tie | Verdict::Neither => None,
        }
    }

    /// Did both runs find the same root within `tolerance`?
    pub fn roots_agree(&self, tolerance: f64) -> Option<bool> {
        let a = self.first.result.root?;
        let b = self.second.result.root?;
        Some((a - b).abs() < tolerance)
    }
}

/// Compare two finished results.
pub fn compare(first: &NamedResult, second: &NamedResult) -> ComparisonResult {
    let winner_by_iterations = winner_by_iterations(&first.result, &second.result);
    let winner_by_accuracy = winner_by_accuracy(&first.result, &second.result);
    let winner = match winner_by_iterations {
        Verdict::Tie => winner_by_accuracy,
        verdict => verdict,
    };

    ComparisonResult {
        first: first.clone(),
        second: second.clone(),
        winner,
        winner_by_iterations,
        winner_by_accuracy,
        winner_by_convergence_rate: winner_by_rate(&first.result, &second.result),
        iteration_delta: first.result.total_iterations.abs_diff(second.result.total_iterations),
        execution_time_delta_ms: (first.result.execution_time_ms - second.result.execution_time_ms).abs(),
    }
}

/// Verdict when at most one side converged, `None` when both did.
fn by_convergence(a: &RootResult, b: &RootResult) -> Option<Verdict> {
    match (a.converged, b.converged) {
        (true, true) => None,
        (true, false) => Some(Verdict::First),
        (false, true) => Some(Verdict::Second),
        (false, false) => Some(Verdict::Neither),
    }
}

/// Strictly fewer `total_iterations` wins; equal counts tie.
pub fn winner_by_iterations(a: &RootResult, b: &RootResult) -> Verdict {
    by_convergence(a, b).unwrap_or_else(|| match a.total_iterations.cmp(&b.total_iterations) {
        Ordering::Less => Verdict::First,
        Ordering::Greater => Verdict::Second,
        Ordering::Equal => Verdict::Tie,
    })
}

/// Strictly smaller `|f(root)|` wins; equal residuals fall back to the final
/// recorded error.
pub fn winner_by_accuracy(a: &RootResult, b: &RootResult) -> Verdict {
    if let Some(verdict) = by_convergence(a, b) {
        return verdict;
    }
    let by_residual = match (a.accuracy(), b.accuracy()) {
        (Some(ra), Some(rb)) => Verdict::lower_wins(ra, rb),
        _ => Verdict::Tie,
    };
    if by_residual != Verdict::Tie {
        return by_residual;
    }
    match (a.final_error(), b.final_error()) {
        (Some(ea), Some(eb)) => Verdict::lower_wins(ea, eb),
        _ => Verdict::Tie,
    }
}

/// Higher estimated order wins; needs two converged runs with estimates.
pub fn winner_by_rate(a: &RootResult, b: &RootResult) -> Verdict {
    if !(a.converged && b.converged) {
        return Verdict::Neither;
    }
    match (a.convergence_rate, b.convergence_rate) {
        (Some(ra), Some(rb)) => Verdict::lower_wins(rb, ra),
        _ => Verdict::Neither,
    }
}

/// Run both methods on the same function.
///
/// ## JSON Example
///
/// ```json
/// { "expression": "e^x - x - 2", "x0": 1.0, "x1": 2.0, "config": { "tolerance": 1e-6 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub expression: String,
    /// Newton's guess and Secant's first guess
    pub x0: f64,
    /// Secant's second guess
    pub x1: f64,
    #[serde(default)]
    pub config: SolverConfig,
    #[serde(default)]
    pub derivative: DerivativeOptions,
}

impl ComparisonInput {
    pub fn new(expression: impl Into<String>, x0: f64, x1: f64) -> Self {
        ComparisonInput {
            expression: expression.into(),
            x0,
            x1,
            config: SolverConfig::default(),
            derivative: DerivativeOptions::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_derivative(mut self, derivative: DerivativeOptions) -> Self {
        self.derivative = derivative;
        self
    }

    pub fn newton_input(&self) -> NewtonInput {
        NewtonInput::new(self.expression.clone(), self.x0)
            .with_config(self.config)
            .with_derivative(self.derivative)
    }

    pub fn secant_input(&self) -> SecantInput {
        SecantInput::new(self.expression.clone(), self.x0, self.x1).with_config(self.config)
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SolveResult<()> {
        self.newton_input().validate()?;
        self.secant_input().validate()
    }
}

/// Run Newton-Raphson and Secant concurrently and compare them.
///
/// The function text is parsed once and shared read-only by both runs.
pub fn compare_methods(input: &ComparisonInput) -> SolveResult<ComparisonResult> {
    input.validate()?;
    let expression = solvers::parse_expression(&input.expression)?;
    let newton_input = input.newton_input();
    let secant_input = input.secant_input();

    let (newton_result, secant_result) = rayon::join(
        || newton::run(&expression, &newton_input, &mut ()),
        || secant::run(&expression, &secant_input, &mut ()),
    );

    let comparison = compare(&newton_result.into(), &secant_result.into());
    debug!(
        expression = %expression,
        winner = ?comparison.winner,
        iteration_delta = comparison.iteration_delta,
        "comparison finished"
    );
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::Method;

    fn converged(method: Method, total_iterations: usize, residual: f64) -> RootResult {
        RootResult {
            method,
            expression: "x^2 - 4".to_string(),
            converged: true,
            root: Some(2.0),
            function_value: Some(residual),
            iterations: Vec::new(),
            total_iterations,
            execution_time_ms: 0.5,
            error_kind: None,
            failure: None,
            convergence_rate: None,
            tolerance: 1e-4,
            max_iterations: 50,
        }
    }

    fn failed(method: Method) -> RootResult {
        RootResult {
            converged: false,
            root: None,
            function_value: None,
            ..converged(method, 50, 0.0)
        }
    }

    #[test]
    fn test_fewer_iterations_wins() {
        let a = NamedResult::from(converged(Method::NewtonRaphson, 5, 1e-6));
        let b = NamedResult::from(converged(Method::Secant, 8, 1e-9));
        let comparison = compare(&a, &b);
        assert_eq!(comparison.winner_by_iterations, Verdict::First);
        assert_eq!(comparison.iteration_delta, 3);
        assert_eq!(comparison.winner_by_accuracy, Verdict::Second);
        assert_eq!(comparison.winner, Verdict::First);
        assert_eq!(comparison.winner_name(), Some("Newton-Raphson"));
    }

    #[test]
    fn test_equal_iterations_tie_then_accuracy_decides() {
        let a = NamedResult::from(converged(Method::NewtonRaphson, 6, 1e-6));
        let b = NamedResult::from(converged(Method::Secant, 6, -1e-9));
        let comparison = compare(&a, &b);
        assert_eq!(comparison.winner_by_iterations, Verdict::Tie);
        assert_eq!(comparison.winner_by_accuracy, Verdict::Second);
        assert_eq!(comparison.winner, Verdict::Second);
    }

    #[test]
    fn test_full_tie() {
        let a = NamedResult::from(converged(Method::NewtonRaphson, 6, 1e-6));
        let b = NamedResult::from(converged(Method::Secant, 6, 1e-6));
        let comparison = compare(&a, &b);
        assert_eq!(comparison.winner, Verdict::Tie);
        assert_eq!(comparison.winner_name(), None);
    }

    #[test]
    fn test_only_converged_side_wins() {
        let a = NamedResult::from(failed(Method::NewtonRaphson));
        let b = NamedResult::from(converged(Method::Secant, 30, 1e-3));
        let comparison = compare(&a, &b);
        assert_eq!(comparison.winner, Verdict::Second);
        assert_eq!(comparison.winner_by_iterations, Verdict::Second);
        assert_eq!(comparison.winner_by_accuracy, Verdict::Second);
        assert_eq!(comparison.winner_by_convergence_rate, Verdict::Neither);
    }

    #[test]
    fn test_neither_converged() {
        let a = NamedResult::from(failed(Method::NewtonRaphson));
        let b = NamedResult::from(failed(Method::Secant));
        let comparison = compare(&a, &b);
        assert_eq!(comparison.winner, Verdict::Neither);
        assert_eq!(comparison.winner_by_accuracy, Verdict::Neither);
        assert_eq!(comparison.roots_agree(1e-6), None);
    }

    #[test]
    fn test_higher_rate_wins() {
        let mut a = converged(Method::NewtonRaphson, 5, 1e-6);
        let mut b = converged(Method::Secant, 6, 1e-6);
        a.convergence_rate = Some(2.0);
        b.convergence_rate = Some(1.6);
        assert_eq!(winner_by_rate(&a, &b), Verdict::First);
        b.convergence_rate = None;
        assert_eq!(winner_by_rate(&a, &b), Verdict::Neither);
    }

    #[test]
    fn test_compare_does_not_touch_inputs() {
        let a = NamedResult::from(converged(Method::NewtonRaphson, 5, 1e-6));
        let b = NamedResult::from(converged(Method::Secant, 8, 1e-9));
        let (a_before, b_before) = (a.clone(), b.clone());
        let comparison = compare(&a, &b);
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
        assert_eq!(comparison.first, a);
    }

    #[test]
    fn test_compare_methods_runs_both() {
        let comparison = compare_methods(&ComparisonInput::new("x^2 - 4", 3.0, 2.5)).unwrap();
        assert_eq!(comparison.first.result.method, Method::NewtonRaphson);
        assert_eq!(comparison.second.result.method, Method::Secant);
        assert_eq!(comparison.roots_agree(1e-4), Some(true));
    }

    #[test]
    fn test_compare_methods_validates_first() {
        assert!(compare_methods(&ComparisonInput::new("x^2 - 4", 3.0, 3.0)).is_err());
        assert!(compare_methods(&ComparisonInput::new("x^^2", 3.0, 2.0)).is_err());
    }
}
