//! Iteration records and finished solver results.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::SolverConfig;
use super::Method;
use crate::errors::{ErrorKind, SolverError};
use crate::expression::Expression;

/// Snapshot of one solver step.
///
/// `derivative` is only ever set by Newton-Raphson. `error` is absent for
/// the Secant seed at index 0 and for the optional trailing Newton record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Iteration {
    pub index: usize,
    pub x: f64,
    pub fx: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivative: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_x: Option<f64>,
    #[serde(default)]
    pub error: Option<f64>,
}

impl Iteration {
    /// `|next_x - x|`, when this record took a step.
    pub fn step_size(&self) -> Option<f64> {
        self.next_x.map(|next| (next - self.x).abs())
    }
}

/// Outcome of one solver run.
///
/// `root` is present if and only if `converged` is true. `function_value`
/// is `f(root)` for a converged run, absent when the root lies where the
/// function cannot be evaluated (possible under the step-size rule). A
/// failed run carries the error in `failure` together with every record
/// collected before it stopped.
///
/// ## JSON Example
///
/// ```json
/// {
///   "method": "newton_raphson",
///   "expression": "x^2 - 4",
///   "converged": true,
///   "root": 2.0000000929222947,
///   "function_value": 3.716891878724482e-7,
///   "iterations": [
///     { "index": 0, "x": 3.0, "fx": 5.0, "derivative": 6.0, "next_x": 2.1666666666666665, "error": 0.8333333333333335 }
///   ],
///   "total_iterations": 4,
///   "execution_time_ms": 0.012,
///   "error_kind": null,
///   "failure": null,
///   "convergence_rate": 1.99,
///   "tolerance": 0.0001,
///   "max_iterations": 50
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResult {
    pub method: Method,
    pub expression: String,
    pub converged: bool,
    pub root: Option<f64>,
    /// `f(root)`, when defined
    pub function_value: Option<f64>,
    pub iterations: Vec<Iteration>,
    pub total_iterations: usize,
    pub execution_time_ms: f64,
    pub error_kind: Option<ErrorKind>,
    pub failure: Option<SolverError>,
    /// Estimated order of convergence from the last three step sizes
    pub convergence_rate: Option<f64>,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl RootResult {
    /// `|f(root)|` for a converged run.
    pub fn accuracy(&self) -> Option<f64> {
        self.function_value.map(f64::abs)
    }

    /// The last recorded error value.
    pub fn final_error(&self) -> Option<f64> {
        self.iterations.iter().rev().find_map(|it| it.error)
    }

    /// Did the update rule break down?
    pub fn is_singular(&self) -> bool {
        self.failure.as_ref().is_some_and(SolverError::is_singularity)
    }

    /// One-line human summary of the outcome.
    pub fn summary(&self) -> String {
        match (&self.root, &self.failure) {
            (Some(root), _) => format!(
                "{} converged to x = {root:.10} in {} iterations",
                self.method, self.total_iterations
            ),
            (None, Some(failure)) => format!("{} failed: {failure}", self.method),
            (None, None) => format!("{} did not converge", self.method),
        }
    }
}

/// Append-only history of a run in progress.
///
/// Records can be pushed but never edited or removed; the run ends by
/// consuming the recorder into a [`RootResult`].
pub(crate) struct Recorder<'a> {
    method: Method,
    expression: &'a Expression,
    config: &'a SolverConfig,
    started: Instant,
    history: Vec<Iteration>,
}

impl<'a> Recorder<'a> {
    pub(crate) fn start(method: Method, expression: &'a Expression, config: &'a SolverConfig) -> Self {
        debug!(
            method = %method,
            expression = expression.source(),
            tolerance = config.tolerance,
            max_iterations = config.max_iterations,
            "solver started"
        );
        Recorder {
            method,
            expression,
            config,
            started: Instant::now(),
            history: Vec::with_capacity(config.max_iterations.min(64) + 1),
        }
    }

    pub(crate) fn push(&mut self, iteration: Iteration) {
        self.history.push(iteration);
    }

    pub(crate) fn len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn converged(
        self,
        root: f64,
        function_value: Option<f64>,
        total_iterations: usize,
    ) -> RootResult {
        debug!(method = %self.method, root, total_iterations, "solver converged");
        if function_value.is_none() {
            debug!(method = %self.method, root, "function is undefined at the root");
        }
        self.finish(Some((root, function_value)), None, total_iterations)
    }

    pub(crate) fn failed(self, failure: SolverError, total_iterations: usize) -> RootResult {
        debug!(method = %self.method, error = %failure, total_iterations, "solver stopped without a root");
        self.finish(None, Some(failure), total_iterations)
    }

    fn finish(
        self,
        root: Option<(f64, Option<f64>)>,
        failure: Option<SolverError>,
        total_iterations: usize,
    ) -> RootResult {
        let execution_time_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let convergence_rate = convergence_rate(&self.history);
        RootResult {
            method: self.method,
            expression: self.expression.source().to_string(),
            converged: root.is_some(),
            root: root.map(|(x, _)| x),
            function_value: root.and_then(|(_, fx)| fx),
            iterations: self.history,
            total_iterations,
            execution_time_ms,
            error_kind: failure.as_ref().map(SolverError::kind),
            failure,
            convergence_rate,
            tolerance: self.config.tolerance,
            max_iterations: self.config.max_iterations,
        }
    }
}

/// Order-of-convergence estimate `ln(e3 / e2) / ln(e2 / e1)` over the last
/// three step sizes `e1, e2, e3` (oldest first).
///
/// Returns `None` with fewer than three steps, or when a step is zero or
/// the estimate is not finite.
pub fn convergence_rate(iterations: &[Iteration]) -> Option<f64> {
    let steps: Vec<f64> = iterations.iter().filter_map(Iteration::step_size).collect();
    let [e1, e2, e3] = match steps.as_slice() {
        [.., a, b, c] => [*a, *b, *c],
        _ => return None,
    };
    if e1 <= 0.0 || e2 <= 0.0 || e3 <= 0.0 {
        return None;
    }
    let rate = (e3 / e2).ln() / (e2 / e1).ln();
    rate.is_finite().then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: usize, x: f64, next_x: f64) -> Iteration {
        Iteration {
            index,
            x,
            fx: 0.0,
            derivative: None,
            next_x: Some(next_x),
            error: Some((next_x - x).abs()),
        }
    }

    #[test]
    fn test_convergence_rate_quadratic() {
        // Step sizes 1e-1, 1e-2, 1e-4
        let iterations = [step(0, 1.0, 1.1), step(1, 1.1, 1.11), step(2, 1.11, 1.1101)];
        let rate = convergence_rate(&iterations).unwrap();
        assert!((rate - 2.0).abs() < 1e-6, "rate = {rate}");
    }

    #[test]
    fn test_convergence_rate_needs_three_steps() {
        assert_eq!(convergence_rate(&[step(0, 1.0, 1.1), step(1, 1.1, 1.11)]), None);
        assert_eq!(convergence_rate(&[]), None);
    }

    #[test]
    fn test_convergence_rate_degenerate() {
        let iterations = [step(0, 1.0, 1.1), step(1, 1.1, 1.1), step(2, 1.1, 1.1)];
        assert_eq!(convergence_rate(&iterations), None);
    }

    #[test]
    fn test_seed_records_do_not_count_as_steps() {
        let seed = Iteration {
            index: 0,
            x: 3.0,
            fx: 5.0,
            derivative: None,
            next_x: None,
            error: None,
        };
        assert_eq!(seed.step_size(), None);
        let json = serde_json::to_string(&seed).unwrap();
        assert!(!json.contains("derivative"));
        assert!(json.contains("\"error\":null"));
    }

    #[test]
    fn test_recorder_builds_forward() {
        let expression = Expression::new("x^2 - 4").unwrap();
        let config = SolverConfig::default();
        let mut recorder = Recorder::start(Method::NewtonRaphson, &expression, &config);
        recorder.push(step(0, 3.0, 2.2));
        recorder.push(step(1, 2.2, 2.01));
        assert_eq!(recorder.len(), 2);

        let result = recorder.failed(SolverError::MaxIterationsReached { max_iterations: 2 }, 2);
        assert!(!result.converged);
        assert_eq!(result.root, None);
        assert_eq!(result.error_kind, Some(ErrorKind::MaxIterationsReached));
        assert_eq!(result.iterations.len(), 2);
        assert_eq!(result.final_error(), Some((2.01f64 - 2.2).abs()));
        assert!(!result.is_singular());
    }
}
