use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eigen_equity::{compute_equity_from_path, Damping, EquityConfig, EquityError, ErrorKind};

const FORMAT_HELP: &str = "\
The votes file should contain a header row with N columns of individual names, \
followed by N rows with N numbers between 0-1.0, all fields separated by a tab. \
The rows are in the same order as the columns, so if Alice is the name in the \
first column, then Alice's votes are the first row after the header row. Each row \
represents the equity allocation desired by that person, and should sum to 1 (100%).";

#[derive(Parser)]
#[command(name = "eigenequity", about = "Consensus equity split from peer allocation votes")]
#[command(version, after_help = FORMAT_HELP)]
struct Cli {
    /// Votes table (header of names, then one allocation row per name)
    votes_file: Option<PathBuf>,

    /// Damping coefficient α in [0, 1]; 1.0 is pure EigenEquity, 0.85 is PageRank
    #[arg(short, long, env = "EIGENEQUITY_ALPHA", default_value_t = 1.0)]
    alpha: f64,

    /// Field separator
    #[arg(short, long, default_value_t = '\t', hide_default_value = true)]
    delimiter: char,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(EquityError::Usage) => {
            println!("Usage: eigenequity [OPTIONS] <VOTES_FILE>");
            println!("{FORMAT_HELP}");
            ExitCode::from(ErrorKind::Usage.exit_code())
        }
        Err(e) => {
            eprintln!("error: {e}");
            if e.kind() == ErrorKind::Parse {
                eprintln!("Check the file against the format described by --help");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<String, EquityError> {
    let path = cli.votes_file.as_ref().ok_or(EquityError::Usage)?;
    let config = EquityConfig {
        damping: Damping::new(cli.alpha)?,
        delimiter: cli.delimiter,
        ..EquityConfig::default()
    };
    let report = compute_equity_from_path(path, &config)?;
    render(&report, cli.format)
}

#[cfg(feature = "serde")]
fn render(report: &eigen_equity::EquityReport, format: Format) -> Result<String, EquityError> {
    match format {
        Format::Text => Ok(report.to_string()),
        Format::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
    }
}

#[cfg(not(feature = "serde"))]
fn render(report: &eigen_equity::EquityReport, format: Format) -> Result<String, EquityError> {
    if format == Format::Json {
        tracing::warn!("built without the serde feature; falling back to text output");
    }
    Ok(report.to_string())
}
