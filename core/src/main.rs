//! NAVFUSION: configuration and analysis front end for the GPS/INS fusion engine.
//!
//! - `run`: build the engine command line from a run file, launch the engine and optionally chart its output
//! - `inspect`: chart every column of a CSV file
//! - `compare`: chart the inertial-only and fused estimates of the engine output side by side
//! - `stats`: mean and standard deviation of a rest-state recording, for sensor bias estimation
//! - `config`: write a template run file

mod common;

use clap::{Args, Parser, Subcommand};
use common::{
    init_logger, parse_char, validate_input_csv, validate_output_path, wait_for_operator,
};
use log::{error, info};
use navfusion::analysis::{self, DEFAULT_COMPARE_LABELS, plotting, stats};
use navfusion::command::synthesize;
use navfusion::config::{ConfigurationModel, ParameterKey};
use navfusion::runner::{EngineArtifacts, EngineRunner, ShellRunner, read_index_listing};
use navfusion::settings::RunConfig;
use navfusion::table::{CsvFormat, TimeSeriesTable};
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

const LONG_ABOUT: &str = "NAVFUSION: configuration and analysis front end for a GPS/INS fusion engine.

The engine is configured entirely from its command line. A run file (TOML/JSON/YAML) lists the
engine parameters in the order they are emitted together with the Kalman filter noise group;
`navfusion run` validates it, renders the command line and launches the engine.

The remaining subcommands work on CSV files directly:
- inspect: one chart per column of an input file
- compare: INS_<L> against FUS_<L> for each quantity L of the engine output
- stats:   rest-state mean and standard deviation, written next to the input as <name>_stats.csv

Use `navfusion config --output run.toml` to start from the bundled tram example.";

#[derive(Parser)]
#[command(author, version, about = "Configuration and analysis front end for a GPS/INS fusion engine.", long_about = LONG_ABOUT)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (off, error, warn, info, debug, trace). Overrides the run file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log file path (if not specified, logs to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Do not wait for Enter after writing charts
    #[arg(long, global = true)]
    no_wait: bool,
}

#[derive(Subcommand, Clone)]
enum Command {
    #[command(
        name = "run",
        about = "Run the engine from a run file",
        long_about = "Validate the parameters of a run file, render the engine command line and launch the engine. When the write-index flag is set the engine only lists the CSV column indices of the input file, which are printed instead of analyzing the output."
    )]
    Run(RunArgs),
    #[command(name = "inspect", about = "Chart every column of a CSV file")]
    Inspect(InspectArgs),
    #[command(name = "compare", about = "Chart reference vs fused estimates of engine output")]
    Compare(CompareArgs),
    #[command(
        name = "stats",
        about = "Rest-state statistics of a CSV file",
        long_about = "Compute mean, sample standard deviation and their sum for every column of a recording taken at rest. The result is written next to the input as <name>_stats.csv using ';' between fields and ',' as decimal separator."
    )]
    Stats(StatsArgs),
    #[command(name = "config", about = "Generate a template run file")]
    Config(ConfigArgs),
}

#[derive(Args, Clone, Debug)]
struct RunArgs {
    /// Run file (TOML/JSON/YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// Print the engine command line without launching it
    #[arg(long)]
    dry_run: bool,

    /// Chart the engine output after the run
    #[arg(long)]
    analyze: bool,
}

#[derive(Args, Clone, Debug)]
struct FormatArgs {
    /// Field delimiter of the CSV file
    #[arg(long, default_value = ",", value_parser = parse_char)]
    delimiter: char,

    /// Decimal separator of the CSV file
    #[arg(long, default_value = ".", value_parser = parse_char)]
    decimal: char,
}

impl FormatArgs {
    fn format(&self) -> CsvFormat {
        CsvFormat::new(self.delimiter, self.decimal)
    }
}

#[derive(Args, Clone, Debug)]
struct InspectArgs {
    /// CSV file to chart
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the SVG charts
    #[arg(short, long)]
    out_dir: PathBuf,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Args, Clone, Debug)]
struct CompareArgs {
    /// Engine output CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for the SVG charts
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Quantities to compare, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_COMPARE_LABELS.map(String::from))]
    labels: Vec<String>,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Args, Clone, Debug)]
struct StatsArgs {
    /// Rest-state recording
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Args, Clone, Debug)]
struct ConfigArgs {
    /// Where to write the template (.toml, .json, .yaml)
    #[arg(short, long, default_value = "run.toml")]
    output: PathBuf,
}

fn run_engine(args: &RunArgs, config: &RunConfig, wait: bool) -> Result<(), Box<dyn Error>> {
    let model = config.model()?;
    let artifacts = EngineArtifacts::from_model(&model)?;
    let invocation = synthesize(&config.engine, &model, &config.noise);
    info!("Engine invocation: {}", invocation);
    if args.dry_run {
        println!("{invocation}");
        return Ok(());
    }

    validate_output_path(&artifacts.output_dir)?;
    ShellRunner.run(invocation)?;

    if let Some(listing) = &artifacts.index_listing {
        info!("Reading column indices from {}", listing.display());
        for (index, name) in read_index_listing(listing)? {
            println!("{index:>4}  {name}");
        }
        return Ok(());
    }

    if args.analyze {
        analyze_run(config, &model, &artifacts, wait)?;
    }
    Ok(())
}

fn analyze_run(
    config: &RunConfig,
    model: &ConfigurationModel,
    artifacts: &EngineArtifacts,
    wait: bool,
) -> Result<(), Box<dyn Error>> {
    let plot_dir = config
        .analysis
        .plot_dir
        .clone()
        .unwrap_or_else(|| artifacts.output_dir.join("plots"));

    let output = TimeSeriesTable::from_csv(&artifacts.output_csv, &config.analysis.output_format)?;
    let comparisons = analysis::compare_all(&output, &config.analysis.compare_labels)?;
    let mut written = plotting::render_collection(&comparisons, &plot_dir)?;

    if config.analysis.inspect_input
        && let Some(input) = model.text(ParameterKey::InputFile)
    {
        let table = load_or_empty(Path::new(input), &config.analysis.input_format);
        written.extend(plotting::render_collection(
            &analysis::inspect_columns(&table),
            &plot_dir.join("input"),
        )?);
    }
    finish_plots(&written, wait)
}

/// Ingestion failures are reported and yield an empty table, so inspection produces no charts.
fn load_or_empty(path: &Path, format: &CsvFormat) -> TimeSeriesTable {
    TimeSeriesTable::from_csv(path, format).unwrap_or_else(|e| {
        error!("{}", e);
        TimeSeriesTable::empty()
    })
}

fn finish_plots(written: &[PathBuf], wait: bool) -> Result<(), Box<dyn Error>> {
    for path in written {
        println!("{}", path.display());
    }
    if wait && !written.is_empty() {
        wait_for_operator(io::stdin().lock())?;
    }
    Ok(())
}

fn inspect(args: &InspectArgs, wait: bool) -> Result<(), Box<dyn Error>> {
    validate_input_csv(&args.input)?;
    validate_output_path(&args.out_dir)?;
    let table = load_or_empty(&args.input, &args.format.format());
    let charts = analysis::inspect_columns(&table);
    let written = plotting::render_collection(&charts, &args.out_dir)?;
    finish_plots(&written, wait)
}

fn compare(args: &CompareArgs, wait: bool) -> Result<(), Box<dyn Error>> {
    validate_input_csv(&args.input)?;
    validate_output_path(&args.out_dir)?;
    let table = TimeSeriesTable::from_csv(&args.input, &args.format.format())?;
    let charts = analysis::compare_all(&table, &args.labels)?;
    let written = plotting::render_collection(&charts, &args.out_dir)?;
    finish_plots(&written, wait)
}

fn rest_state(args: &StatsArgs) -> Result<(), Box<dyn Error>> {
    validate_input_csv(&args.input)?;
    let table = TimeSeriesTable::from_csv(&args.input, &args.format.format())?;
    let (summary, path) = stats::persist_statistics(&args.input, &table, &CsvFormat::STATISTICS)?;
    let stat = |row: &[f64], j: usize| row.get(j).copied().unwrap_or(f64::NAN);
    let (mean, std) = (summary.mean(), summary.std());
    println!("{:<20} {:>14} {:>14}", "column", "mean", "std");
    for (j, name) in summary.columns().iter().enumerate() {
        println!("{:<20} {:>14.6} {:>14.6}", name, stat(&mean, j), stat(&std, j));
    }
    println!("Statistics written to {}", path.display());
    Ok(())
}

fn create_config_file(args: &ConfigArgs) -> Result<(), Box<dyn Error>> {
    RunConfig::template().to_file(&args.output)?;
    info!("Template run file written to {}", args.output.display());
    println!("Template run file written to {}", args.output.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let wait = !cli.no_wait;

    if let Command::Run(ref args) = cli.command {
        // Load the run file first to get logging preferences; CLI flags take precedence
        let config = RunConfig::from_file(&args.config)?;
        let log_level = cli
            .log_level
            .as_deref()
            .unwrap_or(config.logging.level.as_str());
        let config_log_file = config.logging.file.as_ref().map(PathBuf::from);
        let log_file = cli.log_file.as_ref().or(config_log_file.as_ref());
        init_logger(log_level, log_file)?;
        info!("Loaded run file {}", args.config.display());
        return run_engine(args, &config, wait);
    }

    init_logger(
        cli.log_level.as_deref().unwrap_or("info"),
        cli.log_file.as_ref(),
    )?;
    match cli.command {
        // handled above
        Command::Run(_) => Ok(()),
        Command::Inspect(args) => inspect(&args, wait),
        Command::Compare(args) => compare(&args, wait),
        Command::Stats(args) => rest_state(&args),
        Command::Config(args) => create_config_file(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_compare_labels_default_and_split() {
        let cli = Cli::parse_from(["navfusion", "compare", "-i", "out.csv", "-o", "plots"]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.labels, vec!["ROLL", "PITCH", "YAW", "V"]);

        let cli = Cli::parse_from([
            "navfusion", "compare", "-i", "out.csv", "-o", "plots", "--labels", "LAT,LON",
        ]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.labels, vec!["LAT", "LON"]);
    }

    #[test]
    fn test_format_arguments() {
        let cli = Cli::parse_from([
            "navfusion",
            "stats",
            "-i",
            "rest.csv",
            "--delimiter",
            ";",
            "--decimal",
            ",",
            "--no-wait",
        ]);
        assert!(cli.no_wait);
        let Command::Stats(args) = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(args.format.format(), CsvFormat::STATISTICS);
        assert!(
            Cli::try_parse_from(["navfusion", "stats", "-i", "a.csv", "--delimiter", ";;"]).is_err()
        );
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::parse_from([
            "navfusion",
            "--log-level",
            "debug",
            "run",
            "--config",
            "run.toml",
            "--dry-run",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("run.toml"));
        assert!(args.dry_run && !args.analyze);
    }
}
