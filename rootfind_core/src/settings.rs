//! Front-end defaults.
//!
//! [`SolverDefaults`] holds the values a front end pre-fills before the
//! user overrides them. Every field has a serde default, so a settings file
//! only needs the keys it changes:
//!
//! ```toml
//! tolerance = 1e-8
//! derivative_method = "shortcut"
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::SolveResult;
use crate::expression::sampling::{DEFAULT_PADDING, DEFAULT_POINTS};
use crate::expression::{DerivativeOptions, Differentiation, DEFAULT_STEP};
use crate::solvers::config::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::solvers::{SolverConfig, StoppingRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverDefaults {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub stopping_rule: StoppingRule,
    pub derivative_method: Differentiation,
    pub derivative_step: f64,
    /// Append the trailing Newton record after convergence
    pub record_final_point: bool,
    /// Points per sampled curve
    pub sample_points: usize,
    /// Half-width of the plot window around a root
    pub plot_padding: f64,
}

impl Default for SolverDefaults {
    fn default() -> Self {
        SolverDefaults {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            stopping_rule: StoppingRule::StepSize,
            derivative_method: Differentiation::CentralDifference,
            derivative_step: DEFAULT_STEP,
            record_final_point: false,
            sample_points: DEFAULT_POINTS,
            plot_padding: DEFAULT_PADDING,
        }
    }
}

impl SolverDefaults {
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            stopping_rule: self.stopping_rule,
        }
    }

    pub fn derivative_options(&self) -> DerivativeOptions {
        DerivativeOptions {
            method: self.derivative_method,
            step: self.derivative_step,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SolveResult<()> {
        self.solver_config().validate()?;
        self.derivative_options().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_solver_defaults() {
        let defaults = SolverDefaults::default();
        assert_eq!(defaults.solver_config(), SolverConfig::default());
        assert_eq!(defaults.derivative_options(), DerivativeOptions::default());
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let defaults: SolverDefaults =
            serde_json::from_str(r#"{ "tolerance": 1e-8, "derivative_method": "shortcut" }"#).unwrap();
        assert_eq!(defaults.tolerance, 1e-8);
        assert_eq!(defaults.derivative_method, Differentiation::Shortcut);
        assert_eq!(defaults.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_invalid_defaults_rejected() {
        let defaults = SolverDefaults {
            derivative_step: -1.0,
            ..Default::default()
        };
        assert!(defaults.validate().is_err());
    }
}
