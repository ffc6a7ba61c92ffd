//! grid-bayes - discretized Bayesian updating on the command line
//!
//! Commands:
//! - `grid`: print a candidate grid
//! - `update`: one prior, one batch of data
//! - `run`: every scenario of a scenario file (prior sensitivity)
//! - `predict`: posterior predictive simulation
//! - `config`: show or validate the resolved scenario file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gb_config::{load_scenario, LoadedScenario, ValidationError};
use gb_core::exit_codes::ExitCode;
use gb_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat};
use gb_core::{
    build_grid, predictive_summary, prior_weights, Analysis, Grid, Observations,
    PredictiveSummary, PriorFamily, UpdateError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span};

/// Version of the JSON documents written to stdout.
const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

/// Discretized Bayesian updating of a success probability
#[derive(Parser)]
#[command(name = "grid-bayes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity (-q, -qq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the candidate grid
    Grid(GridArgs),

    /// Update one prior with observed successes and trials
    Update(UpdateArgs),

    /// Run every scenario in the resolved scenario file
    Run(ScenarioArgs),

    /// Simulate future trials from the posterior
    Predict(PredictArgs),

    /// Scenario file management
    Config(ConfigArgs),
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug, Clone)]
struct GridArgs {
    /// Number of grid points
    #[arg(long, default_value_t = 10)]
    points: usize,

    /// Lowest grid point; omit both bounds for the interior grid i/(points+1)
    #[arg(long, requires = "upper", allow_negative_numbers = true)]
    lower: Option<f64>,

    /// Highest grid point
    #[arg(long, requires = "lower", allow_negative_numbers = true)]
    upper: Option<f64>,
}

impl GridArgs {
    fn build(&self) -> Result<Grid, CliError> {
        let grid = match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => build_grid(self.points, lower, upper)?,
            _ => Grid::interior(self.points)?,
        };
        Ok(grid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PriorKind {
    Triangular,
    Uniform,
    Beta,
}

#[derive(Args, Debug, Clone)]
struct PriorArgs {
    /// Prior family
    #[arg(long, value_enum, default_value_t = PriorKind::Triangular)]
    prior: PriorKind,

    /// Beta shape alpha (with --prior beta)
    #[arg(long, allow_negative_numbers = true)]
    alpha: Option<f64>,

    /// Beta shape beta (with --prior beta)
    #[arg(long, allow_negative_numbers = true)]
    beta: Option<f64>,
}

impl PriorArgs {
    fn family(&self) -> Result<PriorFamily, CliError> {
        match self.prior {
            PriorKind::Triangular => Ok(PriorFamily::Triangular),
            PriorKind::Uniform => Ok(PriorFamily::Uniform),
            PriorKind::Beta => match (self.alpha, self.beta) {
                (Some(alpha), Some(beta)) => Ok(PriorFamily::beta(alpha, beta)?),
                _ => Err(UpdateError::InvalidArgument {
                    field: "prior.beta",
                    message: "--prior beta needs both --alpha and --beta".to_string(),
                }
                .into()),
            },
        }
    }
}

#[derive(Args, Debug, Clone)]
struct DataArgs {
    /// Observed successes
    #[arg(long, allow_negative_numbers = true)]
    successes: i64,

    /// Observed trials
    #[arg(long, allow_negative_numbers = true)]
    trials: i64,
}

impl DataArgs {
    fn observations(&self) -> Result<Observations, CliError> {
        Ok(Observations::from_signed(self.successes, self.trials)?)
    }
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[command(flatten)]
    grid: GridArgs,

    #[command(flatten)]
    prior: PriorArgs,

    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[command(flatten)]
    grid: GridArgs,

    #[command(flatten)]
    prior: PriorArgs,

    #[command(flatten)]
    data: DataArgs,

    /// Trials in each simulated future batch (at most 100000)
    #[arg(long, default_value_t = 10)]
    future_trials: u64,

    /// Number of simulated batches
    #[arg(long, default_value_t = 1000)]
    draws: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Scenario file (.toml or .json); overrides GRID_BAYES_SCENARIO
    #[arg(long)]
    scenario: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved scenario file
    Show(ScenarioArgs),
    /// Load and validate the resolved scenario file
    Validate(ScenarioArgs),
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error(transparent)]
    Config(#[from] ValidationError),

    #[error("scenario '{name}': {source}")]
    Scenario { name: String, source: UpdateError },

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Update(e) => ExitCode::from(e),
            CliError::Config(e) => ExitCode::from(e),
            CliError::Scenario { source, .. } => match source {
                UpdateError::DegenerateMarginal { .. } => ExitCode::DegenerateError,
                UpdateError::InvalidArgument { .. } => ExitCode::ConfigError,
            },
            CliError::Encode(_) => ExitCode::InternalError,
        }
    }

    fn code(&self) -> Option<u32> {
        match self {
            CliError::Update(e) | CliError::Scenario { source: e, .. } => Some(e.code()),
            CliError::Config(e) => Some(e.code()),
            CliError::Encode(_) => None,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Common envelope for every JSON payload on stdout.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    run_id: &'a str,
    command: &'static str,
    #[serde(flatten)]
    body: T,
}

struct Ctx {
    format: OutputFormat,
    run_id: String,
}

impl Ctx {
    fn emit<T: Serialize>(&self, command: &'static str, body: T) -> Result<(), CliError> {
        let envelope = Envelope {
            schema_version: OUTPUT_SCHEMA_VERSION,
            run_id: &self.run_id,
            command,
            body,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        Ok(())
    }

    fn report_error(&self, err: &CliError) -> ExitCode {
        let exit_code = err.exit_code();
        match self.format {
            OutputFormat::Json => {
                let response = serde_json::json!({
                    "schema_version": OUTPUT_SCHEMA_VERSION,
                    "run_id": self.run_id,
                    "status": "error",
                    "error": {
                        "kind": exit_code.code_name(),
                        "code": err.code(),
                        "message": err.to_string(),
                    }
                });
                eprintln!("{}", response);
            }
            OutputFormat::Text => {
                eprintln!("error: {}", err);
            }
        }
        exit_code
    }
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let base = LogConfig::from_env(None, cli.global.log_format);
    let level = base.level.adjusted(cli.global.verbose, cli.global.quiet);
    init_logging(&base.with_level(level));

    let ctx = Ctx {
        format: cli.global.format,
        run_id: generate_run_id(),
    };
    let span = info_span!("grid_bayes", run_id = %ctx.run_id);
    let _guard = span.enter();

    let result = match &cli.command {
        Commands::Grid(args) => run_grid(&ctx, args),
        Commands::Update(args) => run_update(&ctx, args),
        Commands::Run(args) => run_scenarios(&ctx, args),
        Commands::Predict(args) => run_predict(&ctx, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show(args) => run_config_show(&ctx, args),
            ConfigCommands::Validate(args) => run_config_validate(&ctx, args),
        },
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Ok,
        Err(err) => ctx.report_error(&err),
    };
    info!(exit_code = exit_code.as_i32(), "done");
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_grid(ctx: &Ctx, args: &GridArgs) -> Result<(), CliError> {
    let grid = args.build()?;
    debug!(points = grid.len(), "grid built");
    match ctx.format {
        OutputFormat::Json => ctx.emit("grid", serde_json::json!({ "grid": grid })),
        OutputFormat::Text => {
            for (i, theta) in grid.iter().enumerate() {
                println!("{:>4}  {:.6}", i, theta);
            }
            Ok(())
        }
    }
}

fn run_update(ctx: &Ctx, args: &UpdateArgs) -> Result<(), CliError> {
    let grid = args.grid.build()?;
    let family = args.prior.family()?;
    let data = args.data.observations()?;
    let analysis = Analysis::run(&grid, family, data)?;
    info!(prior = %family, posterior_mean = analysis.posterior_mean, "update complete");

    match ctx.format {
        OutputFormat::Json => ctx.emit("update", serde_json::json!({ "analysis": analysis })),
        OutputFormat::Text => {
            print_analysis(&analysis);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ScenarioResult {
    name: String,
    analysis: Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    predictive: Option<PredictiveSummary>,
}

fn run_scenarios(ctx: &Ctx, args: &ScenarioArgs) -> Result<(), CliError> {
    let loaded = load_scenario(args.scenario.as_deref())?;
    info!(
        source = %loaded.source,
        scenarios = loaded.file.scenarios.len(),
        "scenario file loaded"
    );
    let grid = Grid::try_from(&loaded.file.grid)?;

    let mut results = Vec::with_capacity(loaded.file.scenarios.len());
    for spec in &loaded.file.scenarios {
        let with_name = |source: UpdateError| CliError::Scenario {
            name: spec.name.clone(),
            source,
        };
        let data = Observations::try_from(&spec.data).map_err(with_name)?;
        let family = PriorFamily::from(spec.prior);
        let analysis = Analysis::run(&grid, family, data).map_err(with_name)?;
        let predictive = match loaded.file.predictive {
            Some(p) => {
                let trials = u64::try_from(p.trials).map_err(|_| {
                    with_name(UpdateError::InvalidArgument {
                        field: "predictive.trials",
                        message: format!("must be non-negative, got {}", p.trials),
                    })
                })?;
                Some(
                    predictive_summary(&grid, &analysis.posterior, trials, p.draws, p.seed)
                        .map_err(with_name)?,
                )
            }
            None => None,
        };
        debug!(scenario = %spec.name, posterior_mean = analysis.posterior_mean, "scenario done");
        results.push(ScenarioResult {
            name: spec.name.clone(),
            analysis,
            predictive,
        });
    }

    match ctx.format {
        OutputFormat::Json => ctx.emit(
            "run",
            serde_json::json!({
                "source": loaded.source.to_string(),
                "path": loaded.path.as_ref().map(|p| p.display().to_string()),
                "description": loaded.file.description,
                "grid": grid,
                "results": results,
            }),
        ),
        OutputFormat::Text => {
            if let Some(ref description) = loaded.file.description {
                println!("# {}", description);
            }
            println!("source: {}", loaded.source);
            println!(
                "{:<16} {:<16} {:>5} {:>5} {:>9} {:>9} {:>9} {:>19} {:>12}",
                "scenario", "prior", "k", "n", "mean", "sd", "map", "95% interval", "log evid"
            );
            for r in &results {
                let a = &r.analysis;
                let prior = a
                    .prior_family
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "custom".to_string());
                println!(
                    "{:<16} {:<16} {:>5} {:>5} {:>9.4} {:>9.4} {:>9.4} [{:>7.4}, {:>7.4}] {:>12.4}",
                    r.name,
                    prior,
                    a.data.successes(),
                    a.data.trials(),
                    a.posterior_mean,
                    a.summary.sd,
                    a.summary.map,
                    a.summary.interval.lower,
                    a.summary.interval.upper,
                    a.log_evidence
                );
            }
            Ok(())
        }
    }
}

fn run_predict(ctx: &Ctx, args: &PredictArgs) -> Result<(), CliError> {
    let grid = args.grid.build()?;
    let family = args.prior.family()?;
    let data = args.data.observations()?;
    let analysis = Analysis::run(&grid, family, data)?;
    let predictive = predictive_summary(
        &grid,
        &analysis.posterior,
        args.future_trials,
        args.draws,
        args.seed,
    )?;
    info!(
        trials = predictive.trials,
        draws = predictive.draws,
        seed = predictive.seed,
        "predictive sample drawn"
    );

    match ctx.format {
        OutputFormat::Json => ctx.emit(
            "predict",
            serde_json::json!({
                "posterior_mean": analysis.posterior_mean,
                "summary": analysis.summary,
                "predictive": predictive,
            }),
        ),
        OutputFormat::Text => {
            println!(
                "posterior mean {:.4}; {} draws of {} trials (seed {})",
                analysis.posterior_mean, predictive.draws, predictive.trials, predictive.seed
            );
            println!("{:>5} {:>8} {:>10} {:>10}", "k", "count", "freq", "exact");
            for (k, (count, exact)) in predictive.histogram.iter().zip(&predictive.pmf).enumerate()
            {
                let freq = if predictive.draws == 0 {
                    0.0
                } else {
                    *count as f64 / predictive.draws as f64
                };
                println!("{:>5} {:>8} {:>10.4} {:>10.4}", k, count, freq, exact);
            }
            match predictive.sample_mean {
                Some(m) => println!("sample mean {:.4}, exact mean {:.4}", m, predictive.mean),
                None => println!("exact mean {:.4}", predictive.mean),
            }
            Ok(())
        }
    }
}

fn run_config_show(ctx: &Ctx, args: &ScenarioArgs) -> Result<(), CliError> {
    let LoadedScenario { file, path, source } = load_scenario(args.scenario.as_deref())?;
    match ctx.format {
        OutputFormat::Json => ctx.emit(
            "config.show",
            serde_json::json!({
                "source": source.to_string(),
                "path": path.as_ref().map(|p| p.display().to_string()),
                "scenario_file": file,
            }),
        ),
        OutputFormat::Text => {
            println!("source: {}", source);
            match path {
                Some(p) => println!("path: {}", p.display()),
                None => println!("path: (builtin)"),
            }
            println!("schema_version: {}", file.schema_version);
            match (file.grid.lower, file.grid.upper) {
                (Some(lo), Some(hi)) => {
                    println!("grid: {} points over [{}, {}]", file.grid.points, lo, hi)
                }
                _ => println!("grid: {} interior points", file.grid.points),
            }
            for s in &file.scenarios {
                println!(
                    "scenario {}: prior {}, {} of {}",
                    s.name,
                    PriorFamily::from(s.prior),
                    s.data.successes,
                    s.data.trials
                );
            }
            if let Some(p) = file.predictive {
                println!(
                    "predictive: {} trials, {} draws, seed {}",
                    p.trials, p.draws, p.seed
                );
            }
            Ok(())
        }
    }
}

fn run_config_validate(ctx: &Ctx, args: &ScenarioArgs) -> Result<(), CliError> {
    let loaded = load_scenario(args.scenario.as_deref())?;
    // core-side checks the config validator does not repeat
    let grid = Grid::try_from(&loaded.file.grid)?;
    for spec in &loaded.file.scenarios {
        let with_name = |source: UpdateError| CliError::Scenario {
            name: spec.name.clone(),
            source,
        };
        prior_weights(&grid, &PriorFamily::from(spec.prior)).map_err(with_name)?;
        Observations::try_from(&spec.data).map_err(with_name)?;
    }

    match ctx.format {
        OutputFormat::Json => ctx.emit(
            "config.validate",
            serde_json::json!({
                "status": "valid",
                "source": loaded.source.to_string(),
                "path": loaded.path.as_ref().map(|p| p.display().to_string()),
                "scenarios": loaded.file.scenarios.len(),
            }),
        ),
        OutputFormat::Text => {
            println!(
                "valid: {} scenario(s) from {}",
                loaded.file.scenarios.len(),
                loaded.source
            );
            Ok(())
        }
    }
}

fn print_analysis(a: &Analysis) {
    if let Some(family) = a.prior_family {
        println!("prior: {}", family);
    }
    println!(
        "data: {} successes in {} trials",
        a.data.successes(),
        a.data.trials()
    );
    println!(
        "{:>10} {:>12} {:>12} {:>12}",
        "theta", "prior", "likelihood", "posterior"
    );
    for row in a.rows() {
        println!(
            "{:>10.6} {:>12.6} {:>12.6} {:>12.6}",
            row.theta, row.prior, row.likelihood, row.posterior
        );
    }
    println!("posterior mean: {:.6}", a.posterior_mean);
    println!("posterior sd:   {:.6}", a.summary.sd);
    println!("map:            {:.6}", a.summary.map);
    println!(
        "{:.0}% interval:   [{:.6}, {:.6}] (mass {:.4})",
        a.summary.interval.level * 100.0,
        a.summary.interval.lower,
        a.summary.interval.upper,
        a.summary.interval.mass
    );
    println!("log evidence:   {:.6}", a.log_evidence);
}
