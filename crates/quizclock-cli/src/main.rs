//! quizclock CLI — timed multiple-choice exams in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizclock", version, about = "Timed multiple-choice exams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How the final result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable score and review table
    Text,
    /// Result as JSON on stdout; everything else goes to stderr
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an exam
    Run {
        /// Path to a .toml question pool (default: config, then the built-in pool)
        #[arg(long)]
        pool: Option<PathBuf>,

        /// Number of questions to draw
        #[arg(long)]
        count: Option<usize>,

        /// Total time in seconds
        #[arg(long)]
        time: Option<u64>,

        /// Seed for question selection
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Result format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate question pool TOML files
    Validate {
        /// Path to pool file or directory
        #[arg(long)]
        pool: PathBuf,
    },

    /// Create starter config and example pool
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quizclock_core=warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            pool,
            count,
            time,
            seed,
            config,
            format,
        } => commands::run::execute(pool, count, time, seed, config, format).await,
        Commands::Validate { pool } => commands::validate::execute(pool),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
