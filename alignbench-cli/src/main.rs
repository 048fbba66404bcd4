//! alignbench CLI: score automated decision-makers against KDMA alignment
//! targets.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// alignbench: KDMA alignment evaluation for automated decision-makers
#[derive(Parser, Debug)]
#[command(name = "alignbench", version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Score recorded ADM outputs against a target profile
    Evaluate {
        /// Labeled dataset (.json array or .jsonl, one entry per line)
        #[arg(long)]
        dataset: PathBuf,

        /// Recorded ADM decisions (JSON array)
        #[arg(long)]
        outputs: PathBuf,

        /// Target KDMA profile (JSON object of name -> value)
        #[arg(long)]
        target: PathBuf,

        /// Evaluation configuration (TOML); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a baseline ADM over a dataset, then score it
    Baseline {
        /// Labeled dataset (.json array or .jsonl, one entry per line)
        #[arg(long)]
        dataset: PathBuf,

        /// Target KDMA profile (JSON object of name -> value)
        #[arg(long)]
        target: PathBuf,

        /// Baseline to run
        #[arg(long, value_enum, default_value = "random")]
        adm: commands::Baseline,

        /// Seed for the random baseline
        #[arg(long)]
        seed: Option<u64>,

        /// Evaluation configuration (TOML); defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_directive = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Evaluate {
            dataset,
            outputs,
            target,
            config,
            output,
        } => commands::evaluate(&dataset, &outputs, &target, config.as_deref(), output.as_deref()),
        Commands::Baseline {
            dataset,
            target,
            adm,
            seed,
            config,
            output,
        } => commands::baseline(&dataset, &target, adm, seed, config.as_deref(), output.as_deref()),
    }
}
