//! qmetric CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "qmetric",
    version,
    about = "Exam paper quality evaluation against a teaching plan"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate question papers
    Evaluate {
        /// Path to a paper file (.toml/.json) or directory
        #[arg(long)]
        paper: PathBuf,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output formats: json, html, md, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print every scored question
        #[arg(long, short)]
        verbose: bool,
    },

    /// Validate paper files without scoring them
    Validate {
        /// Path to a paper file or directory
        #[arg(long)]
        paper: PathBuf,
    },

    /// Compare two evaluation reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Final-score drop (in points) treated as a regression
        #[arg(long)]
        threshold: Option<f64>,

        /// Exit code 1 if the score regressed
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the cognitive trigger-word lexicon
    Lexicon {
        /// Only show one category (e.g. "apply")
        #[arg(long)]
        category: Option<String>,
    },

    /// Create a starter config and example paper
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qmetric=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            paper,
            output,
            format,
            config,
            verbose,
        } => commands::evaluate::execute(paper, output, format, config, verbose),
        Commands::Validate { paper } => commands::validate::execute(paper),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Lexicon { category } => commands::lexicon::execute(category),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
