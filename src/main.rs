//! Setup-Scout main entry point
//!
//! This is the command-line interface for the Setup-Scout catalog harvester.

use anyhow::{bail, Context};
use clap::Parser;
use setup_scout::config::{load_config_with_hash, validate, Config};
use setup_scout::crawler::crawl;
use setup_scout::output::{format_record, print_statistics, CatalogStatistics};
use setup_scout::storage::JsonCatalogStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Setup-Scout: harvests problem setup commands from course documentation
///
/// Setup-Scout probes a course documentation site level by level (course,
/// year, format, index), scrapes each problem page for the shell commands
/// that fetch its starter files, and writes them to a JSON catalog.
#[derive(Parser, Debug)]
#[command(name = "setup-scout")]
#[command(version)]
#[command(about = "Harvests problem setup commands from course documentation", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be walked without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "show"])]
    dry_run: bool,

    /// Show statistics of the existing catalog and exit
    #[arg(long, conflicts_with_all = ["dry_run", "show"])]
    stats: bool,

    /// Print the stored setup sequence for a problem (e.g. `mario/less`) and exit
    #[arg(long, value_name = "PROBLEM", conflicts_with_all = ["dry_run", "stats"])]
    show: Option<String>,

    /// Year to use with --show (defaults to the most recent catalogued year)
    #[arg(long, requires = "show")]
    year: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_ref())?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if let Some(problem) = &cli.show {
        handle_show(&config, problem, cli.year)
    } else {
        handle_walk(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("setup_scout=info,warn"),
            1 => EnvFilter::new("setup_scout=debug,info"),
            2 => EnvFilter::new("setup_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the stock configuration when none is given
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            let config = Config::default();
            validate(&config).context("default configuration is invalid")?;
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: validates config and shows what would be walked
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let site = &config.site;
    let years: Vec<u16> = site.years().collect();

    println!("=== Setup-Scout Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", site.base_url()?);
    println!("  Courses: {}", site.courses.join(", "));
    println!("  Probe course roots: {}", site.probe_courses);
    println!(
        "  Years: {} down to {} ({} per course)",
        site.first_year,
        site.last_year,
        years.len()
    );
    println!("  Formats (in order): {}", site.formats.join(", "));

    println!("\nFetcher:");
    println!(
        "  Max concurrent requests: {}",
        config.fetcher.max_concurrent_requests
    );
    println!("  Max attempts: {}", config.fetcher.max_attempts);
    println!("  Backoff base: {}ms", config.fetcher.backoff_base_ms);
    println!("  Request timeout: {}s", config.fetcher.request_timeout_secs);
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\nExtractor:");
    println!(
        "  Section headings: {}",
        config.extractor.section_headings.join(", ")
    );
    println!(
        "  Command prefixes: {}",
        config
            .extractor
            .command_prefixes
            .iter()
            .map(|p| format!("{:?}", p))
            .collect::<Vec<_>>()
            .join(", ")
    );

    println!("\nOutput:");
    println!("  Catalog: {}", config.output.catalog_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would probe {} course/year pairs",
        site.courses.len() * years.len()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics of the persisted catalog
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Catalog: {}\n", config.output.catalog_path);

    let catalog = JsonCatalogStore::new(&config.output.catalog_path)
        .load()
        .with_context(|| format!("failed to read catalog {}", config.output.catalog_path))?;

    print_statistics(&CatalogStatistics::from_catalog(&catalog));

    Ok(())
}

/// Handles the --show mode: prints one problem's setup sequence
fn handle_show(config: &Config, problem: &str, year: Option<u16>) -> anyhow::Result<()> {
    let catalog = JsonCatalogStore::new(&config.output.catalog_path)
        .load()
        .with_context(|| format!("failed to read catalog {}", config.output.catalog_path))?;

    match catalog.resolve(problem, year) {
        Some((endpoint, record)) => {
            print!("{}", format_record(&endpoint, record));
            Ok(())
        }
        None => {
            let years = catalog.years_for(problem);
            if years.is_empty() {
                bail!("problem '{}' is not in the catalog", problem);
            }
            let listed: Vec<String> = years.iter().map(|y| y.to_string()).collect();
            bail!(
                "problem '{}' has no entry for the requested year (available: {})",
                problem,
                listed.join(", ")
            )
        }
    }
}

/// Handles the main walk
async fn handle_walk(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Walking {} courses from {} ({} down to {})",
        config.site.courses.len(),
        config.site.base_url,
        config.site.first_year,
        config.site.last_year
    );

    let (catalog, _report) = crawl(config)
        .await
        .context("walk aborted")?;

    tracing::info!(
        "Catalog written to {} ({} problems)",
        config.output.catalog_path,
        catalog.len()
    );

    Ok(())
}
