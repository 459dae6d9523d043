//! Test case commands.

use rootfind_core::comparison::compare_methods;
use rootfind_core::test_cases;
use tracing::info;

use super::compare;
use crate::{CliError, Context, Result, SolveOptions};

/// List the catalogue
pub fn list(ctx: &Context) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(test_cases::all())?);
        return Ok(());
    }

    println!("┌───────────────┬────────────────────────────┬──────────────────────────┬───────┬───────┐");
    println!("│ id            │ name                       │ f(x)                     │    x0 │    x1 │");
    println!("├───────────────┼────────────────────────────┼──────────────────────────┼───────┼───────┤");
    for case in test_cases::all() {
        println!(
            "│ {:<13} │ {:<26} │ {:<24} │ {:>5} │ {:>5} │",
            case.id, case.name, case.function, case.initial_guess, case.second_guess
        );
    }
    println!("└───────────────┴────────────────────────────┴──────────────────────────┴───────┴───────┘");
    Ok(())
}

/// Compare both methods on one catalogue entry
pub fn run(ctx: &Context, id: &str, options: &SolveOptions) -> Result<()> {
    let case = test_cases::find(id).ok_or_else(|| CliError::UnknownCase(id.to_string()))?;
    info!(id, function = case.function, "running test case");

    if !ctx.json {
        println!("{}: {}", case.name, case.description);
        println!();
    }

    let input = case
        .comparison_input()
        .with_config(options.solver_config(&ctx.defaults))
        .with_derivative(options.derivative_options(&ctx.defaults));
    compare::report(ctx, compare_methods(&input)?)
}
