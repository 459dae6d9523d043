//! Sample command implementation

use rootfind_core::expression::{plot_range, sample, Expression};
use rootfind_core::SolverError;
use tracing::info;

use crate::{Context, Result};

/// Run the sample command
pub fn run(
    ctx: &Context,
    expression: &str,
    center: Option<f64>,
    range: Option<(f64, f64)>,
    points: Option<usize>,
) -> Result<()> {
    let f = Expression::new(expression)
        .map_err(|err| SolverError::invalid_expression(expression, err.to_string()))?;
    let (start, end) = range.unwrap_or_else(|| plot_range(center, ctx.defaults.plot_padding));
    let points = points.unwrap_or(ctx.defaults.sample_points);
    info!(expression, start, end, points, "sampling");

    let samples = sample(&f, start, end, points)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    println!("f(x) = {f} on [{start}, {end}]");
    println!();
    println!("{:>16}  {:>18}", "x", "f(x)");
    for point in &samples {
        println!("{:>16.8}  {:>18.10e}", point.x, point.y);
    }
    if samples.len() < points {
        println!();
        println!("({} of {} points undefined)", points - samples.len(), points);
    }
    Ok(())
}
