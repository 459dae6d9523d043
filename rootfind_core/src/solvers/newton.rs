//! # Newton-Raphson
//!
//! `x_{n+1} = x_n - f(x_n) / f'(x_n)`, starting from a single guess.
//!
//! Each step evaluates the derivative at the current iterate (central
//! difference by default, see [`DerivativeOptions`]). A derivative with
//! magnitude below [`SINGULARITY_THRESHOLD`] ends the run with
//! `DerivativeNearZero`. The run produces at most `max_iterations` records.
//!
//! A step is recorded before `f(next_x)` is needed: under the step-size
//! rule a step that lands outside the function's domain still converges
//! when it is small enough, and otherwise ends the run with `Evaluation`
//! after the step is in the history.
//!
//! ## Example
//!
//! ```rust
//! use rootfind_core::solvers::newton::{solve, NewtonInput};
//!
//! let input = NewtonInput::new("x^2 - 4", 3.0);
//! let result = solve(&input).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.root.unwrap() - 2.0).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::config::{SolverConfig, SINGULARITY_THRESHOLD};
use super::observe::{Control, Observer, Step};
use super::result::{Iteration, Recorder, RootResult};
use super::{parse_expression, validate_guess, Method};
use crate::errors::{SolveResult, SolverError};
use crate::expression::{DerivativeOptions, Expression};

/// Input parameters for a Newton-Raphson run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "expression": "x^3 - 2*x + 2",
///   "x0": 1.0,
///   "config": { "tolerance": 1e-6, "max_iterations": 100 },
///   "derivative": { "method": "shortcut" },
///   "record_final_point": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewtonInput {
    /// Function text, e.g. `"x^2 - 4"`
    pub expression: String,

    /// Initial guess
    pub x0: f64,

    #[serde(default)]
    pub config: SolverConfig,

    #[serde(default)]
    pub derivative: DerivativeOptions,

    /// Append `(root, f(root), f'(root))` after convergence, budget permitting
    #[serde(default)]
    pub record_final_point: bool,
}

impl NewtonInput {
    /// Input with default configuration.
    pub fn new(expression: impl Into<String>, x0: f64) -> Self {
        NewtonInput {
            expression: expression.into(),
            x0,
            config: SolverConfig::default(),
            derivative: DerivativeOptions::default(),
            record_final_point: false,
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

    pub fn with_final_point(mut self) -> Self {
        self.record_final_point = true;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SolveResult<()> {
        validate_guess("x0", self.x0)?;
        self.config.validate()?;
        self.derivative.validate()
    }
}

/// Run Newton-Raphson.
///
/// # Errors
///
/// `InvalidParameters` or `InvalidExpression` before the loop starts.
/// Every other outcome is returned inside the [`RootResult`].
pub fn solve(input: &NewtonInput) -> SolveResult<RootResult> {
    solve_observed(input, ())
}

/// Run Newton-Raphson, consulting `observer` before every step.
pub fn solve_observed<O: Observer>(input: &NewtonInput, mut observer: O) -> SolveResult<RootResult> {
    input.validate()?;
    let expression = parse_expression(&input.expression)?;
    Ok(run(&expression, input, &mut observer))
}

/// The iteration loop over an already validated input and expression.
pub fn run<O: Observer + ?Sized>(
    expression: &Expression,
    input: &NewtonInput,
    observer: &mut O,
) -> RootResult {
    let config = &input.config;
    let mut recorder = Recorder::start(Method::NewtonRaphson, expression, config);

    let mut x = input.x0;
    let mut fx = match expression.evaluate(x) {
        Ok(fx) => fx,
        Err(err) => return recorder.failed(err.into(), 0),
    };

    for i in 0..config.max_iterations {
        let step = Step {
            method: Method::NewtonRaphson,
            iteration: i,
            x,
            fx,
        };
        if let Some(Control::Stop) = observer.observe(&step) {
            return recorder.failed(SolverError::Cancelled { iteration: i }, i);
        }

        let dfx = match expression.derivative_with(x, &input.derivative) {
            Ok(dfx) => dfx,
            Err(err) => return recorder.failed(err.into(), i),
        };
        if dfx.abs() < SINGULARITY_THRESHOLD {
            warn!(x, derivative = dfx, iteration = i, "derivative too close to zero");
            return recorder.failed(SolverError::DerivativeNearZero { x, derivative: dfx }, i);
        }

        let next_x = x - fx / dfx;
        if !next_x.is_finite() {
            return recorder.failed(SolverError::evaluation(x, "update produced a non-finite iterate"), i);
        }
        let f_next = expression.evaluate(next_x);
        let error = config.stopping_rule.error(x, next_x, f_next.as_ref().ok().copied());

        trace!(iteration = i, x, fx, derivative = dfx, next_x, error, "newton step");
        recorder.push(Iteration {
            index: i,
            x,
            fx,
            derivative: Some(dfx),
            next_x: Some(next_x),
            error,
        });

        if error.is_some_and(|e| config.is_converged(e)) {
            let function_value = f_next.ok();
            if input.record_final_point && recorder.len() < config.max_iterations {
                push_final_point(expression, input, &mut recorder, i + 1, next_x, function_value);
            }
            return recorder.converged(next_x, function_value, i + 1);
        }

        fx = match f_next {
            Ok(value) => value,
            Err(err) => return recorder.failed(err.into(), i + 1),
        };
        x = next_x;
    }

    recorder.failed(
        SolverError::MaxIterationsReached {
            max_iterations: config.max_iterations,
        },
        config.max_iterations,
    )
}

/// Append the `(root, f(root), f'(root))` record, when both values exist.
fn push_final_point(
    expression: &Expression,
    input: &NewtonInput,
    recorder: &mut Recorder<'_>,
    index: usize,
    root: f64,
    function_value: Option<f64>,
) {
    let Some(fx) = function_value else {
        debug!(root, "final point omitted, function is undefined at the root");
        return;
    };
    match expression.derivative_with(root, &input.derivative) {
        Ok(d_root) => recorder.push(Iteration {
            index,
            x: root,
            fx,
            derivative: Some(d_root),
            next_x: None,
            error: None,
        }),
        Err(err) => debug!(root, error = %err, "final point omitted, derivative is undefined at the root"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::solvers::config::StoppingRule;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_converges() {
        let result = solve(&NewtonInput::new("x^2 - 4", 3.0)).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.root.unwrap(), 2.0, epsilon = 1e-4);
        assert!(result.total_iterations <= 10);
        assert_eq!(result.iterations.len(), result.total_iterations);
        assert_eq!(result.error_kind, None);
        assert!(result.function_value.unwrap().abs() < 1e-4);
    }

    #[test]
    fn test_records_carry_derivative() {
        let result = solve(&NewtonInput::new("x^2 - 4", 3.0)).unwrap();
        let first = result.iterations[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.x, 3.0);
        assert_eq!(first.fx, 5.0);
        assert_relative_eq!(first.derivative.unwrap(), 6.0, epsilon = 1e-6);
        assert!(result.iterations.iter().all(|it| it.derivative.is_some()));
    }

    #[test]
    fn test_records_chain() {
        let result = solve(&NewtonInput::new("cos(x) - x", 1.0)).unwrap();
        for pair in result.iterations.windows(2) {
            assert_eq!(pair[0].next_x, Some(pair[1].x));
        }
    }

    #[test]
    fn test_derivative_near_zero_keeps_history() {
        // f'(0) = 0 exactly for the central difference of a symmetric function.
        let result = solve(&NewtonInput::new("x^2 + 1", 0.0)).unwrap();
        assert!(!result.converged);
        assert_eq!(result.root, None);
        assert_eq!(result.error_kind, Some(ErrorKind::DerivativeNearZero));
        assert!(result.is_singular());
        assert!(result.iterations.is_empty());
    }

    #[test]
    fn test_no_real_root_never_converges() {
        // Every step of x^2 + 1 has size (x^2 + 1) / |2x| >= 1.
        let input = NewtonInput::new("x^2 + 1", 2.0).with_config(SolverConfig::new(1e-12, 40));
        let result = solve(&input).unwrap();
        assert!(!result.converged);
        assert!(!result.iterations.is_empty());
        for it in &result.iterations {
            assert!(it.x.is_finite() && it.fx.is_finite());
        }
    }

    #[test]
    fn test_max_iterations_reached() {
        // Newton cycles 0 -> 1 -> 0 on this cubic.
        let input = NewtonInput::new("x^3 - 2*x + 2", 0.0).with_config(SolverConfig::new(1e-6, 7));
        let result = solve(&input).unwrap();
        assert!(!result.converged);
        assert_eq!(result.error_kind, Some(ErrorKind::MaxIterationsReached));
        assert_eq!(result.iterations.len(), 7);
        assert_eq!(result.total_iterations, 7);
    }

    #[test]
    fn test_evaluation_failure_carries_x() {
        // From x0 = 3 the first step lands at 3 - 3 ln 3 < 0.
        let result = solve(&NewtonInput::new("log(x)", 3.0)).unwrap();
        assert!(!result.converged);
        assert_eq!(result.error_kind, Some(ErrorKind::Evaluation));
        let x = match result.failure {
            Some(SolverError::Evaluation { x, .. }) => x,
            ref other => panic!("expected evaluation failure, got {other:?}"),
        };
        assert_relative_eq!(x, 3.0 - 3.0 * 3.0_f64.ln(), epsilon = 1e-6);

        // The step that left the domain stays in the history.
        assert_eq!(result.iterations.len(), 1);
        assert_eq!(result.total_iterations, 1);
        let step = result.iterations[0];
        assert_eq!((step.index, step.x), (0, 3.0));
        assert_eq!(step.next_x, Some(x));
        assert_relative_eq!(step.error.unwrap(), 3.0 - x, epsilon = 1e-12);
    }

    #[test]
    fn test_evaluation_failure_mid_run_keeps_history() {
        // Newton on atan from 1.5 oscillates with growing amplitude:
        // 1.5, -1.69, 2.32, -5.11, 32.3. The sqrt term is zero inside
        // |x| <= 10 and undefined outside, so the fourth step fails.
        let result = solve(&NewtonInput::new("atan(x) + 0*sqrt(10 - abs(x))", 1.5)).unwrap();
        assert!(!result.converged);
        assert_eq!(result.error_kind, Some(ErrorKind::Evaluation));
        let x = match result.failure {
            Some(SolverError::Evaluation { x, .. }) => x,
            ref other => panic!("expected evaluation failure, got {other:?}"),
        };
        assert!(x > 10.0);

        assert_eq!(result.iterations.len(), 4);
        assert_eq!(result.total_iterations, 4);
        for pair in result.iterations.windows(2) {
            assert_eq!(pair[0].next_x, Some(pair[1].x));
        }
        assert_eq!(result.iterations.last().unwrap().next_x, Some(x));
    }

    #[test]
    fn test_small_step_out_of_domain_converges() {
        // sqrt(x) from 1e-5: the update is x -> -x, a step of 2e-5.
        let input = NewtonInput::new("sqrt(x)", 1e-5).with_final_point();
        let result = solve(&input).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.root.unwrap(), -1e-5, epsilon = 1e-8);
        assert_eq!(result.function_value, None);
        assert_eq!(result.total_iterations, 1);
        // No final point without f(root).
        assert_eq!(result.iterations.len(), 1);
    }

    #[test]
    fn test_residual_rule_out_of_domain_fails_with_step_recorded() {
        let input = NewtonInput::new("sqrt(x)", 1e-5)
            .with_config(SolverConfig::new(1e-4, 50).with_stopping_rule(StoppingRule::Residual));
        let result = solve(&input).unwrap();
        assert!(!result.converged);
        assert_eq!(result.error_kind, Some(ErrorKind::Evaluation));
        assert_eq!(result.iterations.len(), 1);
        assert_eq!(result.iterations[0].error, None);
    }

    #[test]
    fn test_invalid_parameters_run_nothing() {
        let input = NewtonInput::new("x^2 - 4", 3.0).with_config(SolverConfig::new(0.0, 10));
        assert!(matches!(
            solve(&input),
            Err(SolverError::InvalidParameters { .. })
        ));
        let input = NewtonInput::new("x^2 - 4", 3.0).with_config(SolverConfig::new(1e-4, 0));
        assert!(matches!(
            solve(&input),
            Err(SolverError::InvalidParameters { .. })
        ));
        assert!(matches!(
            solve(&NewtonInput::new("x^2 - 4", f64::NAN)),
            Err(SolverError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_invalid_expression() {
        assert!(matches!(
            solve(&NewtonInput::new("x^2 - ", 3.0)),
            Err(SolverError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_trailing_record() {
        let input = NewtonInput::new("x^2 - 4", 3.0).with_final_point();
        let result = solve(&input).unwrap();
        let last = result.iterations.last().unwrap();
        assert_eq!(result.iterations.len(), result.total_iterations + 1);
        assert_eq!(Some(last.x), result.root);
        assert_eq!(last.error, None);
        assert_eq!(last.next_x, None);
        assert!(last.derivative.is_some());
    }

    #[test]
    fn test_trailing_record_respects_budget() {
        let plain = solve(&NewtonInput::new("x^2 - 4", 3.0)).unwrap();
        let budget = plain.total_iterations;
        let input = NewtonInput::new("x^2 - 4", 3.0)
            .with_config(SolverConfig::new(1e-4, budget))
            .with_final_point();
        let result = solve(&input).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations.len(), budget);
    }

    #[test]
    fn test_residual_rule() {
        let input = NewtonInput::new("x^2 - 4", 3.0)
            .with_config(SolverConfig::new(1e-8, 50).with_stopping_rule(StoppingRule::Residual));
        let result = solve(&input).unwrap();
        assert!(result.converged);
        let last = result.iterations.last().unwrap();
        assert_eq!(last.error, result.accuracy());
        assert!(result.accuracy().unwrap() < 1e-8);
    }

    #[test]
    fn test_shortcut_derivative_matches_numeric_root() {
        let numeric = solve(&NewtonInput::new("x^3 - 2*x - 5", 2.0)).unwrap();
        let exact = solve(
            &NewtonInput::new("x^3 - 2*x - 5", 2.0).with_derivative(DerivativeOptions::shortcut()),
        )
        .unwrap();
        assert_relative_eq!(numeric.root.unwrap(), exact.root.unwrap(), epsilon = 1e-6);
        assert_eq!(exact.iterations[0].derivative, Some(10.0));
    }

    #[test]
    fn test_cancelled_by_observer() {
        let mut calls = 0;
        let result = solve_observed(&NewtonInput::new("cos(x) - x", 10.0), |step: &Step| {
            calls += 1;
            (step.iteration == 1).then_some(Control::Stop)
        })
        .unwrap();
        assert_eq!(calls, 2);
        assert_eq!(result.failure, Some(SolverError::Cancelled { iteration: 1 }));
        assert_eq!(result.iterations.len(), 1);
    }
}
