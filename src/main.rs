use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use tracing::{info, warn};

use unused_styles::analysis::Analyzer;
use unused_styles::config::Config;
use unused_styles::report::{ReportFormat, Reporter};
use unused_styles::store::FindingStore;
use unused_styles::watch::FileWatcher;

/// unused-styles - Find CSS/SCSS classes that no script uses
#[derive(Parser, Debug)]
#[command(name = "unused-styles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet to analyze, relative to the project (can be specified
    /// multiple times; the first that exists is used)
    #[arg(short, long)]
    stylesheet: Vec<PathBuf>,

    /// Directory names to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Watch mode - re-run on every script or stylesheet change
    #[arg(long)]
    watch: bool,

    /// Skip files matched by .gitignore
    #[arg(long)]
    gitignore: bool,

    /// Read and match files on a single thread
    #[arg(long)]
    no_parallel: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("unused-styles v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    if cli.watch {
        run_watch_mode(config, &cli)?;
    } else {
        run_analysis(&config, &cli)?;
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.stylesheet.is_empty() {
        config.stylesheets = cli.stylesheet.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude_dirs.extend(cli.exclude.clone());
    }
    if cli.gitignore {
        config.respect_gitignore = true;
    }
    if cli.no_parallel {
        config.parallel = false;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    let analyzer = Analyzer::new(config.clone());
    let outcome = analyzer
        .analyze(&cli.path)
        .into_diagnostic()
        .wrap_err("Analysis failed")?;

    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone());
    reporter.report(&outcome)
}

fn run_watch_mode(config: Config, cli: &Cli) -> Result<()> {
    let watcher = FileWatcher::new()
        .with_debounce_ms(config.watch.debounce_ms)
        .with_excluded_dirs(config.exclude_dirs.clone());

    let analyzer = Analyzer::new(config);
    let store = FindingStore::new();
    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone());
    let path = cli.path.clone();

    watcher
        .watch(&cli.path, || {
            let ticket = store.begin();
            match analyzer.analyze(&path) {
                Ok(outcome) => {
                    if store.publish(ticket, &outcome) {
                        if let Err(e) = reporter.report(&outcome) {
                            warn!("Failed to write report: {:?}", e);
                        }
                    }
                    println!();
                    println!("{}", "Analysis complete. Waiting for changes...".green());
                }
                Err(e) => {
                    eprintln!("{}: {}", "Analysis error".red(), e);
                }
            }
            true // Continue watching
        })
        .map_err(|e| miette::miette!("Watch error: {}", e))?;

    Ok(())
}
