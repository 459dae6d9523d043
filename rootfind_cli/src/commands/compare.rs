//! Compare command implementation

use rootfind_core::comparison::{compare_methods, ComparisonInput, ComparisonResult};
use rootfind_core::record::CalculationRecord;
use tracing::info;

use crate::{output, Context, Result, SolveOptions};

/// Run the compare command
pub fn run(ctx: &Context, expression: &str, x0: f64, x1: f64, options: &SolveOptions) -> Result<()> {
    let input = ComparisonInput::new(expression, x0, x1)
        .with_config(options.solver_config(&ctx.defaults))
        .with_derivative(options.derivative_options(&ctx.defaults));
    info!(expression, x0, x1, "comparing methods");
    report(ctx, compare_methods(&input)?)
}

pub(crate) fn report(ctx: &Context, comparison: ComparisonResult) -> Result<()> {
    if ctx.json {
        output::print_json(&CalculationRecord::comparison(comparison))
    } else {
        output::print_comparison(&comparison);
        Ok(())
    }
}
