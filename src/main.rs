//! sbom-score: SBOM quality and compliance scoring tool
//!
//! Scores SPDX and `CycloneDX` documents against NTIA, BSI TR-03183-2 and
//! OWASP SCVS check sets.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sbom_score::cli::{self, exit_codes, ScoreConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported SBOM Formats:",
        "\n  SPDX:      2.1, 2.2, 2.3 (JSON, YAML, tag-value, RDF/XML)",
        "\n             3.0, 3.0.1 (JSON-LD)",
        "\n  CycloneDX: 1.0 - 1.6 (JSON, XML)",
        "\n\nCheck Categories:",
        "\n  Structural, NTIA-minimum-elements, Semantic, Quality, Sharing,",
        "\n  bsi-v1.1, bsi-v2.0, SCVS-L1, SCVS-L2, SCVS-L3"
    )
}

#[derive(Parser)]
#[command(name = "sbom-score")]
#[command(author = "Binarly.io")]
#[command(version, long_version = build_long_version())]
#[command(about = "SBOM quality and compliance scoring tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  All inputs scored
    1  At least one input failed to parse
    3  Error occurred

EXAMPLES:
    # Score with every check
    sbom-score score sbom.cdx.json

    # NTIA minimum elements only, one line per file
    sbom-score score --category ntia --basic fleet/*.json

    # Two individual checks, JSON output
    sbom-score score --feature comp_with_name --feature Sharing/sbom_sharable --json sbom.spdx")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `score` subcommand
#[derive(Parser)]
struct ScoreArgs {
    /// SBOM files to score
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Score only these categories (repeatable)
    #[arg(short, long = "category")]
    categories: Vec<String>,

    /// Score only these checks, as `key` or `category/key` (repeatable)
    #[arg(short, long = "feature")]
    features: Vec<String>,

    /// Path to a scoring config file
    #[arg(long, env = "SBOM_SCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit a JSON report
    #[arg(long, conflicts_with = "basic")]
    json: bool,

    /// One line per file
    #[arg(long)]
    basic: bool,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one or more SBOMs
    Score(ScoreArgs),

    /// Print the detected spec, version and encoding of an SBOM
    Detect {
        file: PathBuf,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List the registered checks
    List {
        /// Restrict to these categories (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Print an example config enabling every check
    GenerateConfig,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Score(args) => cli::run_score(ScoreConfig {
            paths: args.files,
            categories: args.categories,
            features: args.features,
            config_path: args.config,
            json: args.json,
            basic: args.basic,
            output_file: args.output_file,
            no_color: cli.no_color,
        }),
        Commands::Detect { file, json } => cli::run_detect(&file, json),
        Commands::List { categories, json } => cli::run_list(&categories, json),
        Commands::GenerateConfig => cli::run_generate_config(),
    }
}
