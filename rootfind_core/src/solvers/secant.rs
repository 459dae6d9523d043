//! # Secant
//!
//! `x_{n+1} = x_n - f(x_n) (x_n - x_{n-1}) / (f(x_n) - f(x_{n-1}))`,
//! starting from two distinct guesses.
//!
//! The run seeds two records before the first update: index 0 for `x0`
//! (no error) and index 1 for `x1` (error `|x1 - x0|`). The seed counts as
//! the first iteration, so a run makes at most `max_iterations - 1` updates
//! and holds at most `max_iterations + 1` records. A difference of function
//! values below [`SINGULARITY_THRESHOLD`] ends the run with
//! `NearZeroDenominator`.
//!
//! Each update is recorded before `f(next_x)` is needed, so an update that
//! leaves the function's domain is kept in the history (and converges under
//! the step-size rule when it is small enough).
//!
//! ## Example
//!
//! ```rust
//! use rootfind_core::solvers::secant::{solve, SecantInput};
//!
//! let input = SecantInput::new("x^2 - 4", 3.0, 2.5);
//! let result = solve(&input).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.root.unwrap() - 2.0).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::config::{SolverConfig, SINGULARITY_THRESHOLD};
use super::observe::{Control, Observer, Step};
use super::result::{Iteration, Recorder, RootResult};
use super::{parse_expression, validate_guess, Method};
use crate::errors::{SolveResult, SolverError};
use crate::expression::Expression;

/// Input parameters for a Secant run.
///
/// ## JSON Example
///
/// ```json
/// { "expression": "sin(x)", "x0": 3.0, "x1": 3.5, "config": { "tolerance": 1e-6 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecantInput {
    /// Function text, e.g. `"x^2 - 4"`
    pub expression: String,

    /// First guess
    pub x0: f64,

    /// Second guess; must differ from `x0`
    pub x1: f64,

    /// `max_iterations` counts the seed records as the first iteration, so a
    /// budget of 1 only evaluates the guesses and never takes an update.
    #[serde(default)]
    pub config: SolverConfig,
}

impl SecantInput {
    /// Input with default configuration.
    pub fn new(expression: impl Into<String>, x0: f64, x1: f64) -> Self {
        SecantInput {
            expression: expression.into(),
            x0,
            x1,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SolveResult<()> {
        validate_guess("x0", self.x0)?;
        validate_guess("x1", self.x1)?;
        if self.x0 == self.x1 {
            return Err(SolverError::invalid_parameters(
                "x1",
                self.x1.to_string(),
                "Second guess must differ from the first",
            ));
        }
        self.config.validate()
    }
}

/// Run the Secant method.
///
/// # Errors
///
/// `InvalidParameters` (including `x0 == x1`) or `InvalidExpression`
/// before the loop starts. Every other outcome is returned inside the
/// [`RootResult`].
pub fn solve(input: &SecantInput) -> SolveResult<RootResult> {
    solve_observed(input, ())
}

/// Run the Secant method, consulting `observer` before every update.
pub fn solve_observed<O: Observer>(input: &SecantInput, mut observer: O) -> SolveResult<RootResult> {
    input.validate()?;
    let expression = parse_expression(&input.expression)?;
    Ok(run(&expression, input, &mut observer))
}

/// The iteration loop over an already validated input and expression.
pub fn run<O: Observer + ?Sized>(
    expression: &Expression,
    input: &SecantInput,
    observer: &mut O,
) -> RootResult {
    let config = &input.config;
    let mut recorder = Recorder::start(Method::Secant, expression, config);

    let (mut x_prev, mut x_curr) = (input.x0, input.x1);
    let mut f_prev = match expression.evaluate(x_prev) {
        Ok(value) => value,
        Err(err) => return recorder.failed(err.into(), 0),
    };
    recorder.push(Iteration {
        index: 0,
        x: x_prev,
        fx: f_prev,
        derivative: None,
        next_x: None,
        error: None,
    });

    let mut f_curr = match expression.evaluate(x_curr) {
        Ok(value) => value,
        Err(err) => return recorder.failed(err.into(), 0),
    };
    recorder.push(Iteration {
        index: 1,
        x: x_curr,
        fx: f_curr,
        derivative: None,
        next_x: None,
        error: config.stopping_rule.error(x_prev, x_curr, Some(f_curr)),
    });

    for i in 1..config.max_iterations {
        let step = Step {
            method: Method::Secant,
            iteration: i,
            x: x_curr,
            fx: f_curr,
        };
        if let Some(Control::Stop) = observer.observe(&step) {
            return recorder.failed(SolverError::Cancelled { iteration: i }, i);
        }

        let denominator = f_curr - f_prev;
        if denominator.abs() < SINGULARITY_THRESHOLD {
            warn!(x_prev, x_curr, difference = denominator, iteration = i, "near-zero secant denominator");
            return recorder.failed(
                SolverError::NearZeroDenominator {
                    x_prev,
                    x_curr,
                    difference: denominator,
                },
                i,
            );
        }

        let next_x = x_curr - f_curr * (x_curr - x_prev) / denominator;
        if !next_x.is_finite() {
            return recorder.failed(SolverError::evaluation(x_curr, "update produced a non-finite iterate"), i);
        }
        let f_next = expression.evaluate(next_x);
        let error = config.stopping_rule.error(x_curr, next_x, f_next.as_ref().ok().copied());

        trace!(iteration = i, x = x_curr, fx = f_curr, next_x, error, "secant step");
        recorder.push(Iteration {
            index: i + 1,
            x: x_curr,
            fx: f_curr,
            derivative: None,
            next_x: Some(next_x),
            error,
        });

        if error.is_some_and(|e| config.is_converged(e)) {
            return recorder.converged(next_x, f_next.ok(), i + 1);
        }

        let f_next = match f_next {
            Ok(value) => value,
            Err(err) => return recorder.failed(err.into(), i + 1),
        };

        x_prev = x_curr;
        f_prev = f_curr;
        x_curr = next_x;
        f_curr = f_next;
    }

    recorder.failed(
        SolverError::MaxIterationsReached {
            max_iterations: config.max_iterations,
        },
        config.max_iterations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::solvers::config::StoppingRule;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_converges() {
        let result = solve(&SecantInput::new("x^2 - 4", 3.0, 2.5)).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.root.unwrap(), 2.0, epsilon = 1e-4);
        assert!(result.total_iterations <= 12);
        assert_eq!(result.iterations.len(), result.total_iterations + 1);
    }

    #[test]
    fn test_seed_records() {
        let result = solve(&SecantInput::new("x^2 - 4", 3.0, 2.5)).unwrap();
        let seed0 = result.iterations[0];
        let seed1 = result.iterations[1];
        assert_eq!((seed0.index, seed0.x, seed0.fx, seed0.error), (0, 3.0, 5.0, None));
        assert_eq!((seed1.index, seed1.x, seed1.error), (1, 2.5, Some(0.5)));
        assert!(result.iterations.iter().all(|it| it.derivative.is_none()));
    }

    #[test]
    fn test_indices_are_sequential() {
        let result = solve(&SecantInput::new("cos(x) - x", 0.0, 1.0)).unwrap();
        for (i, it) in result.iterations.iter().enumerate() {
            assert_eq!(it.index, i);
        }
    }

    #[test]
    fn test_guess_on_root_converges_immediately() {
        let result = solve(&SecantInput::new("x^2 - 4", 3.0, 2.0)).unwrap();
        assert!(result.converged);
        assert_eq!(result.root, Some(2.0));
        assert_eq!(result.total_iterations, 2);
    }

    #[test]
    fn test_equal_guesses_rejected() {
        let err = solve(&SecantInput::new("x^2 - 4", 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, SolverError::InvalidParameters { ref field, .. } if field == "x1"));
    }

    #[test]
    fn test_near_zero_denominator() {
        // Symmetric guesses give f(x0) == f(x1).
        let result = solve(&SecantInput::new("x^2 - 4", -1.0, 1.0)).unwrap();
        assert!(!result.converged);
        assert_eq!(result.error_kind, Some(ErrorKind::NearZeroDenominator));
        assert!(result.is_singular());
        assert_eq!(result.iterations.len(), 2);
    }

    #[test]
    fn test_max_iterations_bound() {
        // Steps from (1, 2) on x^2 - 2 are 0.67, 0.067, 0.015: three updates,
        // none under the tolerance.
        let input = SecantInput::new("x^2 - 2", 1.0, 2.0).with_config(SolverConfig::new(1e-12, 4));
        let result = solve(&input).unwrap();
        assert!(!result.converged);
        assert_eq!(result.error_kind, Some(ErrorKind::MaxIterationsReached));
        assert_eq!(result.iterations.len(), 4 + 1);
        assert_eq!(result.total_iterations, 4);
        assert_relative_eq!(result.iterations[2].next_x.unwrap(), 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(result.iterations[3].next_x.unwrap(), 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_single_iteration_budget_only_seeds() {
        let input = SecantInput::new("x^2 - 4", 3.0, 2.5).with_config(SolverConfig::new(1e-4, 1));
        let result = solve(&input).unwrap();
        assert_eq!(result.error_kind, Some(ErrorKind::MaxIterationsReached));
        assert_eq!(result.iterations.len(), 2);
    }

    #[test]
    fn test_evaluation_failure_at_seed() {
        let result = solve(&SecantInput::new("log(x)", -1.0, 2.0)).unwrap();
        assert!(!result.converged);
        assert!(result.iterations.is_empty());
        assert!(matches!(result.failure, Some(SolverError::Evaluation { x, .. }) if x == -1.0));
    }

    #[test]
    fn test_evaluation_failure_carries_x() {
        // The first update from (3, 2.5) on log(x) lands just below zero.
        let result = solve(&SecantInput::new("log(x)", 3.0, 2.5)).unwrap();
        assert!(!result.converged);
        assert_eq!(result.error_kind, Some(ErrorKind::Evaluation));
        let x = match result.failure {
            Some(SolverError::Evaluation { x, .. }) => x,
            ref other => panic!("expected evaluation failure, got {other:?}"),
        };
        assert!(x < 0.0);

        // Both seeds and the update that left the domain are kept.
        assert_eq!(result.iterations.len(), 3);
        assert_eq!(result.total_iterations, 2);
        let step = result.iterations[2];
        assert_eq!((step.index, step.x), (2, 2.5));
        assert_eq!(step.next_x, Some(x));
        assert_eq!(step.error, Some(2.5 - x));
    }

    #[test]
    fn test_small_step_out_of_domain_converges() {
        // The secant through (4e-6, 2e-3) and (1e-6, 1e-3) crosses zero at
        // -2e-6, a step of 3e-6 to where sqrt is undefined.
        let result = solve(&SecantInput::new("sqrt(x)", 4e-6, 1e-6)).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.root.unwrap(), -2e-6, epsilon = 1e-15);
        assert_eq!(result.function_value, None);
        assert_eq!(result.iterations.len(), 3);
    }

    #[test]
    fn test_residual_rule() {
        let input = SecantInput::new("x^2 - 4", 3.0, 2.5)
            .with_config(SolverConfig::new(1e-9, 50).with_stopping_rule(StoppingRule::Residual));
        let result = solve(&input).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations[1].error, Some(result.iterations[1].fx.abs()));
        assert!(result.accuracy().unwrap() < 1e-9);
    }

    #[test]
    fn test_cancelled_keeps_seed() {
        let result = solve_observed(&SecantInput::new("x^2 - 4", 3.0, 2.5), |_: &Step| {
            Some(Control::Stop)
        })
        .unwrap();
        assert_eq!(result.failure, Some(SolverError::Cancelled { iteration: 1 }));
        assert_eq!(result.iterations.len(), 2);
    }
}
