//! # Predefined Test Cases
//!
//! A small catalogue of functions that exercise the solvers in different
//! ways: fast convergence, a Newton cycle, several nearby roots, an
//! exponential, and a cubic with three close roots.
//!
//! ```rust
//! use rootfind_core::test_cases;
//!
//! let case = test_cases::find("trigonometric").unwrap();
//! assert_eq!(case.function, "sin(x)");
//!
//! let comparison = rootfind_core::comparison::compare_methods(&case.comparison_input()).unwrap();
//! assert!(comparison.first.result.converged);
//! ```

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::comparison::ComparisonInput;
use crate::solvers::{NewtonInput, SecantInput};

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    pub id: &'static str,
    pub name: &'static str,
    /// Function text
    pub function: &'static str,
    /// Newton's guess and Secant's first guess
    pub initial_guess: f64,
    /// Secant's second guess
    pub second_guess: f64,
    pub description: &'static str,
    /// Real roots near the guesses, ascending
    pub known_roots: &'static [f64],
}

impl TestCase {
    pub fn newton_input(&self) -> NewtonInput {
        NewtonInput::new(self.function, self.initial_guess)
    }

    pub fn secant_input(&self) -> SecantInput {
        SecantInput::new(self.function, self.initial_guess, self.second_guess)
    }

    pub fn comparison_input(&self) -> ComparisonInput {
        ComparisonInput::new(self.function, self.initial_guess, self.second_guess)
    }

    /// The known root closest to `x`.
    pub fn nearest_root(&self, x: f64) -> Option<f64> {
        self.known_roots
            .iter()
            .copied()
            .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
    }
}

pub static TEST_CASES: [TestCase; 5] = [
    TestCase {
        id: "quadratic",
        name: "Well-behaved Quadratic",
        function: "x^2 - 4",
        initial_guess: 3.0,
        second_guess: 2.0,
        description: "A simple quadratic with roots at x = -2 and x = 2. Both methods converge quickly.",
        known_roots: &[-2.0, 2.0],
    },
    TestCase {
        id: "cubic",
        name: "Derivative Challenge",
        function: "x^3 - 2*x + 2",
        initial_guess: 1.0,
        second_guess: 0.0,
        description: "A cubic on which Newton-Raphson cycles between 0 and 1 from the textbook guesses.",
        known_roots: &[-1.769_292_354_238_631],
    },
    TestCase {
        id: "trigonometric",
        name: "Trigonometric Function",
        function: "sin(x)",
        initial_guess: 3.0,
        second_guess: 3.5,
        description: "A sine with a root every pi. Different methods may find different roots.",
        known_roots: &[0.0, PI, TAU],
    },
    TestCase {
        id: "exponential",
        name: "Convergence Stress Test",
        function: "e^x - x - 2",
        initial_guess: 1.0,
        second_guess: 2.0,
        description: "An exponential that highlights differences in method robustness.",
        known_roots: &[-1.841_405_660_436_960_6, 1.146_193_220_620_582_5],
    },
    TestCase {
        id: "challenging",
        name: "Challenging Function",
        function: "x^3 - 7*x^2 + 14*x - 6",
        initial_guess: 0.5,
        second_guess: 1.0,
        description: "A cubic with three roots (2 - sqrt(2), 3, 2 + sqrt(2)) that challenges convergence.",
        known_roots: &[0.585_786_437_626_904_9, 3.0, 3.414_213_562_373_095],
    },
];

static BY_ID: Lazy<HashMap<&'static str, &'static TestCase>> =
    Lazy::new(|| TEST_CASES.iter().map(|case| (case.id, case)).collect());

/// Look up a case by id.
pub fn find(id: &str) -> Option<&'static TestCase> {
    BY_ID.get(id).copied()
}

/// Every case, in catalogue order.
pub fn all() -> &'static [TestCase] {
    &TEST_CASES
}
