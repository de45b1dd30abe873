//! CLI argument definitions for Fairmark.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Run a fair-price analysis from a request JSON file |
//! | `rate` | Look up the cached market rate |
//! | `policy` | Print the active policy tables |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--offline` | `false` | Built-in rate source, no network |
//! | `--rate-url` | env | Rate endpoint override |
//! | `--timeout-ms` | `3000` | Rate fetch timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Analyze a request file
//! fairmark analyze request.json --pretty
//!
//! # Analyze with a soft deadline, strict mode for CI
//! fairmark analyze request.json --deadline-ms 500 --strict
//!
//! # Inspect the cached rate, forcing a refresh
//! fairmark rate --refresh
//!
//! # Dump the adjustment coefficient tables
//! fairmark policy --table adjustment
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Fairmark - fair-price analytics for property comparables
///
/// Turns a target property plus comparable listings into a statistically
/// defensible fair price, confidence interval, characteristic adjustments,
/// and sale-strategy scenarios with financial projections.
#[derive(Debug, Parser)]
#[command(
    name = "fairmark",
    author,
    version,
    about = "Fair-price analytics for property comparables",
    long_about = "Fairmark analyzes a target property against comparable listings:\n\
\n\
  • Robust outlier rejection over price-per-area\n\
  • Median-centered confidence intervals\n\
  • Bounded characteristic adjustments\n\
  • Sale scenarios with opportunity-cost projections\n\
\n\
Use 'fairmark <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - json: Single JSON envelope (default)
    /// - table: Human-readable summary
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    ///
    /// Useful for CI/CD pipelines that need strict validation.
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Use the built-in deterministic rate source instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Rate endpoint URL; defaults to the FAIRMARK_RATE_URL environment
    /// variable. Without either, the built-in rate source is used.
    #[arg(long, global = true)]
    pub rate_url: Option<String>,

    /// Rate fetch timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 3000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary for terminal display.
    Table,
    /// Single JSON envelope output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a fair-price analysis from a request JSON file.
    ///
    /// The file holds a serialized analysis request: target property,
    /// comparable list and optional configuration overrides.
    ///
    /// # Examples
    ///
    ///   fairmark analyze request.json
    ///   fairmark analyze request.json --deadline-ms 500 --pretty
    ///   cat request.json | fairmark analyze -
    Analyze(AnalyzeArgs),

    /// Look up the market opportunity-cost rate.
    ///
    /// Serves the cached rate when fresh; otherwise refreshes from the
    /// configured source with stale-if-error fallback.
    ///
    /// # Examples
    ///
    ///   fairmark rate
    ///   fairmark rate --refresh
    Rate(RateArgs),

    /// Print the active policy tables as JSON.
    ///
    /// Shows the adjustment coefficient tables, liquidity breakpoints and
    /// scenario multipliers the engine would use.
    Policy(PolicyArgs),
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Path to the analysis request JSON file, or '-' for stdin.
    pub input: String,

    /// Overall soft deadline for the analysis in milliseconds.
    ///
    /// On expiry the engine returns the partial result computed so far
    /// instead of failing.
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

/// Arguments for the `rate` command.
#[derive(Debug, Args)]
pub struct RateArgs {
    /// Refresh from the source even when the cached rate is still fresh.
    #[arg(long, default_value_t = false)]
    pub refresh: bool,

    /// Fetch without reading or writing the cache.
    #[arg(long, default_value_t = false, conflicts_with = "refresh")]
    pub bypass: bool,
}

/// Arguments for the `policy` command.
#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Which policy table to print.
    #[arg(long, value_enum, default_value_t = PolicyTable::All)]
    pub table: PolicyTable,
}

/// Policy table selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyTable {
    All,
    Adjustment,
    Liquidity,
    Scenario,
}
