//! Single-method commands.

use rootfind_core::record::CalculationRecord;
use rootfind_core::solvers::{newton, secant, NewtonInput, RootResult, SecantInput};
use tracing::info;

use crate::{output, Context, Result, SolveOptions};

/// Run the newton command
pub fn newton(
    ctx: &Context,
    expression: &str,
    x0: f64,
    final_point: bool,
    options: &SolveOptions,
) -> Result<()> {
    let input = NewtonInput {
        expression: expression.to_string(),
        x0,
        config: options.solver_config(&ctx.defaults),
        derivative: options.derivative_options(&ctx.defaults),
        record_final_point: final_point || ctx.defaults.record_final_point,
    };
    info!(expression, x0, "running Newton-Raphson");
    report(ctx, newton::solve(&input)?)
}

/// Run the secant command
pub fn secant(ctx: &Context, expression: &str, x0: f64, x1: f64, options: &SolveOptions) -> Result<()> {
    let input = SecantInput::new(expression, x0, x1).with_config(options.solver_config(&ctx.defaults));
    info!(expression, x0, x1, "running Secant");
    report(ctx, secant::solve(&input)?)
}

fn report(ctx: &Context, result: RootResult) -> Result<()> {
    if ctx.json {
        output::print_json(&CalculationRecord::single(result))
    } else {
        output::print_result(&result);
        Ok(())
    }
}
