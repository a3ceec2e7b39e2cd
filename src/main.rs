//! Episode Sweeper main entry point
//!
//! This is the command-line interface for the Episode Sweeper.

use anyhow::Context;
use clap::Parser;
use episode_sweeper::config::{load_config_with_hash, validate, Config, RunMode};
use episode_sweeper::crawler::run_sweep;
use episode_sweeper::output::{print_report, startup_failure_line};
use episode_sweeper::session::export_blob;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Episode Sweeper: marks unread episodes as read
///
/// Episode Sweeper restores a logged-in browser session, finds unread
/// episodes on a listing page, and reads each one the way a person would
/// until nothing unread is left.
#[derive(Parser, Debug)]
#[command(name = "episode-sweeper")]
#[command(version = "1.0.0")]
#[command(about = "Reads every unread episode on a listing page", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Listing URL to sweep, overriding the configuration
    #[arg(long)]
    url: Option<String>,

    /// WebDriver endpoint, overriding the configuration
    #[arg(long)]
    webdriver: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Never prompt; restore the session from the environment or give up
    #[arg(long)]
    unattended: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what the sweep would use without starting a browser
    #[arg(long, conflicts_with = "export_cookies")]
    dry_run: bool,

    /// Print the saved cookie store as a base64 blob for unattended runs and exit
    #[arg(long, conflicts_with = "dry_run")]
    export_cookies: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    let mode = RunMode::detect(cli.unattended);

    if cli.dry_run {
        handle_dry_run(&config, mode);
    } else if cli.export_cookies {
        handle_export_cookies(&config)?;
    } else {
        handle_sweep(config, mode).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("episode_sweeper=info,warn"),
            1 => EnvFilter::new("episode_sweeper=debug,info"),
            2 => EnvFilter::new("episode_sweeper=trace,debug"),
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

/// Loads the configuration file (if any), applies CLI overrides, and validates
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (cfg, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(url) = &cli.url {
        config.target.url = url.clone();
    }
    if let Some(webdriver) = &cli.webdriver {
        config.browser.webdriver_url = webdriver.clone();
    }
    if cli.headless {
        config.browser.headless = true;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config, mode: RunMode) {
    println!("=== Episode Sweeper Dry Run ===\n");

    println!("Target:");
    println!("  Listing: {}", config.target.url);
    println!("  Mode: {}", mode);

    println!("\nBrowser:");
    println!("  WebDriver: {}", config.browser.webdriver_url);
    println!(
        "  Headless: {}",
        config.browser.headless || mode.is_unattended()
    );
    println!(
        "  Window: {}x{}",
        config.browser.window_width, config.browser.window_height
    );
    println!("  User agent: {}", config.browser.user_agent);

    println!("\nSession:");
    println!("  Environment variable: {}", config.session.cookie_env_var);
    println!(
        "  Environment blob present: {}",
        std::env::var_os(&config.session.cookie_env_var).is_some()
    );
    println!("  Cookie store: {}", config.session.cookie_store);
    println!(
        "  Cookie store present: {}",
        Path::new(&config.session.cookie_store).exists()
    );

    println!("\nSelectors:");
    println!("  Unread link: {}", config.selectors.unread_link);
    println!("  Viewer: {}", config.selectors.viewer);
    println!("  Page item: {}", config.selectors.page_item);
    println!("  Next page: {}", config.selectors.next_page);

    println!("\nTiming:");
    println!(
        "  Inter-episode pause: {}-{}ms",
        config.timing.inter_episode.min().as_millis(),
        config.timing.inter_episode.max().as_millis()
    );
    println!(
        "  Scroll pause: {}-{}ms",
        config.timing.scroll_pause.min().as_millis(),
        config.timing.scroll_pause.max().as_millis()
    );
    println!(
        "  Page turn pause: {}-{}ms",
        config.timing.page_turn.min().as_millis(),
        config.timing.page_turn.max().as_millis()
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --export-cookies mode: prints the store as an environment blob
fn handle_export_cookies(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.session.cookie_store);
    let blob = export_blob(path)
        .with_context(|| format!("exporting cookie store {}", path.display()))?;

    eprintln!(
        "Set {} to the following value for unattended runs:",
        config.session.cookie_env_var
    );
    println!("{}", blob);
    Ok(())
}

/// Handles the main sweep
async fn handle_sweep(config: Config, mode: RunMode) -> anyhow::Result<()> {
    tracing::info!("Sweeping {} ({} mode)", config.target.url, mode);

    match run_sweep(config, mode).await {
        Ok(report) => print_report(&report),
        Err(e) => {
            tracing::error!("Sweep failed to start: {}", e);
            println!("{}", startup_failure_line(&e));
        }
    }

    // Every outcome, including a failed start, exits normally
    Ok(())
}
