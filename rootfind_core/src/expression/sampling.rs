//! Point sampling for plotting collaborators.

use serde::{Deserialize, Serialize};

use super::Expression;
use crate::errors::{SolveResult, SolverError};

/// Default number of points per sampled curve.
pub const DEFAULT_POINTS: usize = 100;

/// Default half-width of a plot window around a root.
pub const DEFAULT_PADDING: f64 = 5.0;

/// One `(x, f(x))` point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

/// Sample `expression` at `points` evenly spaced values on `[start, end]`.
///
/// Points where the function is undefined or not finite are skipped, so
/// the returned curve may have gaps (e.g. `1/x` around zero).
///
/// # Errors
///
/// Returns `InvalidParameters` if the interval is empty or not finite, or
/// if fewer than two points are requested.
pub fn sample(
    expression: &Expression,
    start: f64,
    end: f64,
    points: usize,
) -> SolveResult<Vec<SamplePoint>> {
    if !(start.is_finite() && end.is_finite() && start < end) {
        return Err(SolverError::invalid_parameters(
            "range",
            format!("[{start}, {end}]"),
            "Range must be finite with start < end",
        ));
    }
    if points < 2 {
        return Err(SolverError::invalid_parameters(
            "points",
            points.to_string(),
            "At least two points are required",
        ));
    }

    let step = (end - start) / (points - 1) as f64;
    Ok((0..points)
        .filter_map(|i| {
            let x = start + i as f64 * step;
            expression.evaluate(x).ok().map(|y| SamplePoint { x, y })
        })
        .collect())
}

/// Plot window `[center - padding, center + padding]`, centred on zero when
/// there is no root to centre on.
pub fn plot_range(center: Option<f64>, padding: f64) -> (f64, f64) {
    let center = center.unwrap_or(0.0);
    (center - padding, center + padding)
}
