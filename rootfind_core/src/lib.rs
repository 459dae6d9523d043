//! # rootfind_core - Root-Finding Engine
//!
//! `rootfind_core` evaluates single-variable functions given as text and
//! finds their roots with Newton-Raphson and Secant iteration, keeping the
//! full iteration history and the metrics needed to compare the two methods.
//! All inputs and outputs are JSON-serializable, so a front end can feed
//! parameters in and store or plot the results as-is.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Closed Grammar**: Function text is parsed into a syntax tree and interpreted, never executed
//!
//! ## Quick Start
//!
//! ```rust
//! use rootfind_core::comparison::{compare_methods, ComparisonInput};
//!
//! let comparison = compare_methods(&ComparisonInput::new("x^2 - 4", 3.0, 2.5)).unwrap();
//!
//! let newton = &comparison.first.result;
//! assert!(newton.converged);
//! println!("{}", newton.summary());
//!
//! // Serialize to JSON for storage or plotting
//! let json = serde_json::to_string_pretty(&comparison).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`expression`] - Parser, evaluator, derivatives and sampling
//! - [`solvers`] - Newton-Raphson and Secant solvers
//! - [`comparison`] - Side-by-side metrics for two results
//! - [`test_cases`] - Predefined functions and guesses
//! - [`record`] - Flat records for storage
//! - [`settings`] - Front-end defaults
//! - [`errors`] - Structured error types

pub mod comparison;
pub mod errors;
pub mod expression;
pub mod record;
pub mod settings;
pub mod solvers;
pub mod test_cases;

// Re-export commonly used types at crate root for convenience
pub use comparison::{compare, compare_methods, ComparisonInput, ComparisonResult, Verdict};
pub use errors::{ErrorKind, SolveResult, SolverError};
pub use expression::{Expression, ExpressionError};
pub use record::CalculationRecord;
pub use solvers::{Iteration, Method, NewtonInput, RootResult, SecantInput, SolverConfig};
