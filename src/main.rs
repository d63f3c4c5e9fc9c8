use clap::{Parser, ValueEnum};
use conflang::convert::{convert, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{filter::LevelFilter, fmt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => OutputFormat::Yaml,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Convert a configuration file with constants and nested structures to YAML or JSON.
#[derive(Parser)]
#[command(name = "conflang", version, about)]
struct Cli {
    /// Input file; standard input when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| OutputFormat::from_path(&cli.output));

    convert(cli.input.as_deref(), &cli.output, format)?;

    println!("Configuration written to {}", cli.output.display());
    Ok(())
}
