//! GreenLane: sustainability analysis CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use greenlane::analyzer::InferenceEngine;
use greenlane::backend;
use greenlane::config::{default_config_json, CONFIG_FILENAME};
use greenlane::reporter::{ConsoleReporter, JsonReporter};
use greenlane::ProductInput;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// GreenLane: local sustainability analysis for product listings
#[derive(Parser, Debug)]
#[command(name = "greenlane")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a product listing without starting the server
    Score {
        /// Product title as shown in the listing
        title: String,

        /// Brand name
        #[arg(long)]
        brand: Option<String>,

        /// Price as displayed
        #[arg(long)]
        price: Option<String>,

        /// Materials description
        #[arg(long)]
        materials: Option<String>,

        /// Model file (default: mock mode)
        #[arg(long, short)]
        model: Option<PathBuf>,

        /// Output format as JSON (same body as POST /analyze)
        #[arg(long, short)]
        json: bool,

        /// Minimum green score (exit 1 if below)
        #[arg(long, short)]
        threshold: Option<u8>,

        /// Quiet mode (score only)
        #[arg(long, short)]
        quiet: bool,

        /// Verbose output (keyword breakdown, debug logs)
        #[arg(long, short)]
        verbose: bool,
    },

    /// Create .greenlanerc.json with sensible defaults
    Init {
        /// Port for the server (default 8765)
        #[arg(long)]
        port: Option<u16>,

        /// Model file path to record in the config
        #[arg(long)]
        model: Option<PathBuf>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Commands::Score {
            title,
            brand,
            price,
            materials,
            model,
            json,
            threshold,
            quiet,
            verbose,
        } => {
            init_logging(verbose);
            let product = ProductInput::new(title)
                .with_brand(brand.unwrap_or_default())
                .with_price(price.unwrap_or_default())
                .with_materials(materials.unwrap_or_default());
            run_score(&product, model.as_deref(), json, threshold, quiet, verbose)
        }
        Commands::Init { port, model, dir } => run_init(port, model.as_deref(), dir.as_deref()),
    }
}

/// Logs go to stderr so JSON on stdout stays parseable
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "greenlane=debug" } else { "greenlane=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_score(
    product: &ProductInput,
    model: Option<&Path>,
    json: bool,
    threshold: Option<u8>,
    quiet: bool,
    verbose: bool,
) -> Result<ExitCode> {
    if product.title.trim().is_empty() {
        anyhow::bail!("product title is required");
    }

    let engine = InferenceEngine::new(backend::select(model));
    let model_arg = model
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Err(e) = engine.load_model(&model_arg) {
        eprintln!("{}: {}; using mock analyzer", "Warning".yellow(), e);
    }

    let result = engine.analyze(product).context("Analysis failed")?;

    if json {
        println!("{}", JsonReporter::new().report(&result));
    } else {
        let mut reporter = ConsoleReporter::new();
        if verbose {
            reporter = reporter.verbose();
        }
        if quiet {
            reporter.report_quiet(product, &result);
        } else {
            reporter.report(product, &result);
        }
    }

    match threshold {
        Some(min) if result.green_score < min => {
            if !quiet && !json {
                eprintln!(
                    "{}: green score {} is below threshold {}",
                    "Failed".red().bold(),
                    result.green_score,
                    min
                );
            }
            Ok(ExitCode::from(1))
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

fn run_init(port: Option<u16>, model: Option<&Path>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let json = default_config_json(port, model)?;
    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{} {}", "Created".green().bold(), config_path.display());
    Ok(ExitCode::SUCCESS)
}
