//! Terminal rendering of results.

use rootfind_core::comparison::{ComparisonResult, Verdict};
use rootfind_core::record::CalculationRecord;
use rootfind_core::solvers::{Iteration, RootResult};

use crate::Result;

const RULE: &str = "═══════════════════════════════════════════════════════════════════════";

/// Print a record as pretty JSON.
pub fn print_json(record: &CalculationRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.8e}"))
}

fn status_icon(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn iteration_row(it: &Iteration) -> String {
    format!(
        "│ {:>4} │ {:>16.10} │ {:>15} │ {:>15} │ {:>15} │",
        it.index,
        it.x,
        format!("{:.8e}", it.fx),
        fmt_opt(it.derivative),
        fmt_opt(it.error),
    )
}

/// Print one solver run with its iteration table.
pub fn print_result(result: &RootResult) {
    println!("{RULE}");
    println!("  {} : f(x) = {}", result.method.name().to_uppercase(), result.expression);
    println!("{RULE}");
    println!();
    println!("┌──────┬──────────────────┬─────────────────┬─────────────────┬─────────────────┐");
    println!("│    n │                x │            f(x) │           f'(x) │           error │");
    println!("├──────┼──────────────────┼─────────────────┼─────────────────┼─────────────────┤");
    for it in &result.iterations {
        println!("{}", iteration_row(it));
    }
    println!("└──────┴──────────────────┴─────────────────┴─────────────────┴─────────────────┘");
    println!();

    match (result.root, &result.failure) {
        (Some(root), _) => {
            println!("  Root:        {root:.12}");
            println!("  f(root):     {}", fmt_opt(result.function_value));
        }
        (None, Some(failure)) => {
            println!("  Failed:      {failure}");
            println!("  Hint:        {}", failure.guidance());
        }
        (None, None) => println!("  No root found"),
    }
    println!("  Iterations:  {} (max {})", result.total_iterations, result.max_iterations);
    println!("  Tolerance:   {:e}", result.tolerance);
    if let Some(rate) = result.convergence_rate {
        println!("  Order est.:  {rate:.3}");
    }
    println!("  Time:        {:.3} ms", result.execution_time_ms);
    println!();
    println!("  RESULT: {} {}", status_icon(result.converged), result.summary());
    println!();
}

fn verdict_label(comparison: &ComparisonResult, verdict: Verdict) -> String {
    match verdict {
        Verdict::Tie => "tie".to_string(),
        Verdict::Neither => "-".to_string(),
        side => comparison.name_of(side).unwrap_or("-").to_string(),
    }
}

/// Print both runs and the comparison summary.
pub fn print_comparison(comparison: &ComparisonResult) {
    print_result(&comparison.first.result);
    print_result(&comparison.second.result);

    println!("{RULE}");
    println!("  COMPARISON");
    println!("{RULE}");
    println!();
    println!("  Fewer iterations:   {}", verdict_label(comparison, comparison.winner_by_iterations));
    println!("  Better accuracy:    {}", verdict_label(comparison, comparison.winner_by_accuracy));
    println!(
        "  Faster order:       {}",
        verdict_label(comparison, comparison.winner_by_convergence_rate)
    );
    println!("  Iteration delta:    {}", comparison.iteration_delta);
    println!("  Time delta:         {:.3} ms", comparison.execution_time_delta_ms);
    if let Some(agree) = comparison.roots_agree(comparison.first.result.tolerance) {
        println!("  Same root:          {}", if agree { "yes" } else { "no" });
    }
    println!();
    println!("  WINNER: {}", verdict_label(comparison, comparison.winner));
    println!();
}
