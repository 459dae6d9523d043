//! # rootfind CLI
//!
//! Command-line front end for the root-finding engine.
//!
//! # Commands
//!
//! - `rootfind newton <expr> --x0 <x>` - Newton-Raphson
//! - `rootfind secant <expr> --x0 <x> --x1 <x>` - Secant
//! - `rootfind compare <expr> --x0 <x> --x1 <x>` - both, side by side
//! - `rootfind cases` - list the predefined test cases
//! - `rootfind case <id>` - compare both methods on a test case
//! - `rootfind sample <expr>` - tabulate f(x) over a range
//!
//! Defaults come from `rootfind.toml` (or `--config`); flags override them.
//! `--json` prints the flat calculation record instead of a table.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rootfind_core::expression::{DerivativeOptions, Differentiation};
use rootfind_core::settings::SolverDefaults;
use rootfind_core::solvers::{SolverConfig, StoppingRule};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

/// Newton-Raphson and Secant root finder
#[derive(Parser)]
#[command(name = "rootfind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: String,

    /// Print the calculation record as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a root with Newton-Raphson
    Newton {
        /// Function of x, e.g. "x^2 - 4"
        expression: String,

        /// Initial guess
        #[arg(long, allow_hyphen_values = true)]
        x0: f64,

        /// Append (root, f(root), f'(root)) to the history after convergence
        #[arg(long)]
        final_point: bool,

        #[command(flatten)]
        options: SolveOptions,
    },

    /// Find a root with the Secant method
    Secant {
        /// Function of x, e.g. "x^2 - 4"
        expression: String,

        /// First guess
        #[arg(long, allow_hyphen_values = true)]
        x0: f64,

        /// Second guess (must differ from x0)
        #[arg(long, allow_hyphen_values = true)]
        x1: f64,

        #[command(flatten)]
        options: SolveOptions,
    },

    /// Run both methods on the same function and compare them
    Compare {
        /// Function of x, e.g. "x^2 - 4"
        expression: String,

        /// Newton's guess and Secant's first guess
        #[arg(long, allow_hyphen_values = true)]
        x0: f64,

        /// Secant's second guess
        #[arg(long, allow_hyphen_values = true)]
        x1: f64,

        #[command(flatten)]
        options: SolveOptions,
    },

    /// List the predefined test cases
    Cases,

    /// Compare both methods on a predefined test case
    Case {
        /// Test case id (see `rootfind cases`)
        id: String,

        #[command(flatten)]
        options: SolveOptions,
    },

    /// Tabulate f(x) over a range
    Sample {
        /// Function of x, e.g. "x^2 - 4"
        expression: String,

        /// Centre of the range (range is centre +/- padding)
        #[arg(long, allow_hyphen_values = true)]
        center: Option<f64>,

        /// Range start (overrides --center)
        #[arg(long, allow_hyphen_values = true, requires = "end")]
        start: Option<f64>,

        /// Range end (overrides --center)
        #[arg(long, allow_hyphen_values = true, requires = "start")]
        end: Option<f64>,

        /// Number of points
        #[arg(short, long)]
        points: Option<usize>,
    },
}

/// Solver flags shared by every solving command.
#[derive(Args, Debug, Clone, Default)]
pub struct SolveOptions {
    /// Convergence tolerance
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Maximum number of iterations
    #[arg(short = 'n', long)]
    max_iterations: Option<usize>,

    /// Stop on |f(x)| instead of the step size
    #[arg(long)]
    residual: bool,

    /// Use exact derivatives for recognised patterns
    #[arg(long)]
    shortcut: bool,
}

impl SolveOptions {
    /// Solver configuration: flags over settings file over built-in defaults.
    pub fn solver_config(&self, defaults: &SolverDefaults) -> SolverConfig {
        let mut config = defaults.solver_config();
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if self.residual {
            config.stopping_rule = StoppingRule::Residual;
        }
        config
    }

    pub fn derivative_options(&self, defaults: &SolverDefaults) -> DerivativeOptions {
        let mut options = defaults.derivative_options();
        if self.shortcut {
            options.method = Differentiation::Shortcut;
        }
        options
    }
}

/// Settings shared by every command.
pub struct Context {
    pub defaults: SolverDefaults,
    pub json: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let ctx = Context {
        defaults: config::load(&cli.config)?,
        json: cli.json,
    };

    match cli.command {
        Commands::Newton {
            expression,
            x0,
            final_point,
            options,
        } => commands::solve::newton(&ctx, &expression, x0, final_point, &options),
        Commands::Secant {
            expression,
            x0,
            x1,
            options,
        } => commands::solve::secant(&ctx, &expression, x0, x1, &options),
        Commands::Compare {
            expression,
            x0,
            x1,
            options,
        } => commands::compare::run(&ctx, &expression, x0, x1, &options),
        Commands::Cases => commands::cases::list(&ctx),
        Commands::Case { id, options } => commands::cases::run(&ctx, &id, &options),
        Commands::Sample {
            expression,
            center,
            start,
            end,
            points,
        } => {
            let range = start.zip(end);
            commands::sample::run(&ctx, &expression, center, range, points)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(solver_error) = e.solver_error() {
                eprintln!("Hint: {}", solver_error.guidance());
                if let Ok(json) = serde_json::to_string_pretty(solver_error) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}
