mod commands;
mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use model_eval_shared::config::{DEFAULT_CSV_PATH, DEFAULT_PLOT_PATH};
use tracing_subscriber::EnvFilter;

use commands::SourceArgs;

#[derive(Parser)]
#[command(
    name = "model-eval",
    about = "Compare image-classification results across models and input resolutions"
)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary table
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the best model under each metric
    Best {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write the summary table as CSV
    Export {
        #[command(flatten)]
        source: SourceArgs,
        /// Destination CSV file
        #[arg(long, default_value = DEFAULT_CSV_PATH)]
        output: PathBuf,
    },
    /// Write the comparison plots as SVG
    Plot {
        #[command(flatten)]
        source: SourceArgs,
        /// Destination SVG file
        #[arg(long, default_value = DEFAULT_PLOT_PATH)]
        output: PathBuf,
    },
    /// Summary, best models, plots and CSV export in one pass
    Evaluate {
        #[command(flatten)]
        source: SourceArgs,
        /// Destination CSV file
        #[arg(long, default_value = DEFAULT_CSV_PATH)]
        csv: PathBuf,
        /// Destination SVG file
        #[arg(long, default_value = DEFAULT_PLOT_PATH)]
        plot: PathBuf,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Summary { source } => commands::summary::run(&source),
        Commands::Best { source } => commands::best::run(&source),
        Commands::Export { source, output } => commands::export::run(&source, &output),
        Commands::Plot { source, output } => commands::plot::run(&source, &output),
        Commands::Evaluate { source, csv, plot } => commands::evaluate::run(&source, &csv, &plot),
    }
}
