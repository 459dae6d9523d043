//! Shared convergence policy.

use serde::{Deserialize, Serialize};

use crate::errors::{SolveResult, SolverError};

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Magnitude below which a derivative (Newton) or a difference of function
/// values (Secant) is treated as zero.
pub const SINGULARITY_THRESHOLD: f64 = 1e-10;

/// What the per-iteration `error` measures.
///
/// A run uses one rule for every record it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoppingRule {
    /// `|x_next - x|`
    #[default]
    StepSize,
    /// `|f(x_next)|`
    Residual,
}

impl StoppingRule {
    /// The error value for one step.
    ///
    /// `f_next` is `None` when `f(next_x)` could not be evaluated. The step
    /// size never needs it; the residual is then unknown.
    pub fn error(self, x: f64, next_x: f64, f_next: Option<f64>) -> Option<f64> {
        match self {
            StoppingRule::StepSize => Some((next_x - x).abs()),
            StoppingRule::Residual => f_next.map(f64::abs),
        }
    }
}

/// Tolerance, iteration budget and stopping rule for one solver run.
///
/// ## JSON Example
///
/// ```json
/// { "tolerance": 0.0001, "max_iterations": 50, "stopping_rule": "step_size" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Convergence threshold; a step converges when `error < tolerance`
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Hard upper bound on update steps
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default)]
    pub stopping_rule: StoppingRule,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            stopping_rule: StoppingRule::StepSize,
        }
    }
}

impl SolverConfig {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        SolverConfig {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    pub fn with_stopping_rule(mut self, stopping_rule: StoppingRule) -> Self {
        self.stopping_rule = stopping_rule;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SolveResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::invalid_parameters(
                "tolerance",
                self.tolerance.to_string(),
                "Tolerance must be a positive finite number",
            ));
        }
        if self.max_iterations == 0 {
            return Err(SolverError::invalid_parameters(
                "max_iterations",
                "0",
                "Maximum iterations must be positive",
            ));
        }
        Ok(())
    }

    /// Strict comparison: an error equal to the tolerance has not converged.
    pub fn is_converged(&self, error: f64) -> bool {
        error < self.tolerance
    }
}
