//! # Calculation Records
//!
//! [`CalculationRecord`] is the flat value handed to a storage collaborator
//! once a run has finished: an id, a timestamp, the function text and the
//! outcome. The core does no I/O; a record is plain serializable data.
//!
//! ## Example
//!
//! ```rust
//! use rootfind_core::record::CalculationRecord;
//! use rootfind_core::solvers::newton::{solve, NewtonInput};
//!
//! let result = solve(&NewtonInput::new("x^2 - 4", 3.0)).unwrap();
//! let record = CalculationRecord::single(result);
//!
//! let json = serde_json::to_string_pretty(&record).unwrap();
//! assert!(json.contains("\"type\": \"Single\""));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comparison::ComparisonResult;
use crate::solvers::RootResult;

/// Current schema version for stored records
pub const SCHEMA_VERSION: &str = "0.1.0";

/// What a record stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Outcome {
    /// One solver run
    Single(RootResult),
    /// Both solvers on the same function
    Comparison(ComparisonResult),
}

impl Outcome {
    /// Get the outcome type as a string
    pub fn outcome_type(&self) -> &'static str {
        match self {
            Outcome::Single(_) => "Single",
            Outcome::Comparison(_) => "Comparison",
        }
    }

    /// Did any run in this outcome converge?
    pub fn any_converged(&self) -> bool {
        match self {
            Outcome::Single(result) => result.converged,
            Outcome::Comparison(comparison) => {
                comparison.first.result.converged || comparison.second.result.converged
            }
        }
    }
}

/// A finished calculation, ready to store verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    /// Schema version (for migration compatibility)
    pub schema_version: String,
    pub expression: String,
    pub outcome: Outcome,
}

impl CalculationRecord {
    /// Wrap an outcome with a fresh id and the current time.
    pub fn new(outcome: Outcome) -> Self {
        let expression = match &outcome {
            Outcome::Single(result) => result.expression.clone(),
            Outcome::Comparison(comparison) => comparison.first.result.expression.clone(),
        };
        CalculationRecord {
            id: Uuid::new_v4(),
            created: Utc::now(),
            schema_version: SCHEMA_VERSION.to_string(),
            expression,
            outcome,
        }
    }

    pub fn single(result: RootResult) -> Self {
        CalculationRecord::new(Outcome::Single(result))
    }

    pub fn comparison(comparison: ComparisonResult) -> Self {
        CalculationRecord::new(Outcome::Comparison(comparison))
    }
}
