//! Product-Snap main entry point
//!
//! This is the command-line interface for the Product-Snap extractor.

use anyhow::Context;
use clap::{Parser, Subcommand};
use product_snap::config::{load_config_with_hash, validate, Config};
use product_snap::server::{serve, AppState};
use product_snap::{ProductQuery, Scraper};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Product-Snap: resilient product data extraction
///
/// Product-Snap fetches an Amazon product page (following short links) and
/// extracts its title and primary high-resolution image, retrying through
/// throttling and challenge pages.
#[derive(Parser, Debug)]
#[command(name = "product-snap")]
#[command(version = "1.0.0")]
#[command(about = "Resilient Amazon product data extraction", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used if omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract title and image for one product URL
    Fetch {
        /// Product page or short-link URL
        url: String,

        /// Attempt budget (clamped to the configured ceiling)
        #[arg(short, long)]
        retries: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the JSON HTTP API
    Serve {
        /// Address to listen on (overrides server.bind-addr)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Validate the configuration and print the effective values
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_ref())?;

    match cli.command {
        Command::Fetch { url, retries, json } => handle_fetch(&config, url, retries, json).await,
        Command::Serve { bind } => handle_serve(&config, bind).await,
        Command::CheckConfig => {
            handle_check_config(&config);
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, wins over the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let fallback = if quiet {
        // Only show errors
        "error"
    } else {
        match verbose {
            0 => "product_snap=info,warn",
            1 => "product_snap=debug,info",
            2 => "product_snap=trace,debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file if one was given, otherwise validates the defaults
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            let config = Config::default();
            validate(&config).context("built-in configuration is invalid")?;
            Ok(config)
        }
    }
}

/// Handles `fetch`: one extraction, Ctrl-C cancels it
async fn handle_fetch(
    config: &Config,
    url: String,
    retries: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let scraper = Scraper::new(config).context("failed to build HTTP client")?;
    let attempts = retries.unwrap_or_else(|| scraper.default_attempts());
    let query = ProductQuery::new(url);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted; cancelling extraction");
            on_interrupt.cancel();
        }
    });

    let product = scraper.run_with_cancel(&query, attempts, &cancel).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
    } else {
        println!("Title: {}", product.title);
        println!("Image: {}", product.image_url);
        println!("URL:   {}", product.amazon_url);
    }

    Ok(())
}

/// Handles `serve`: runs the HTTP API until shutdown
async fn handle_serve(config: &Config, bind: Option<SocketAddr>) -> anyhow::Result<()> {
    let addr = match bind {
        Some(addr) => addr,
        None => config
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind address '{}'", config.server.bind_addr))?,
    };

    let scraper = Scraper::new(config).context("failed to build HTTP client")?;
    let state = AppState::new(scraper, config);

    serve(state, addr)
        .await
        .with_context(|| format!("server on {} failed", addr))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Handles `check-config`: prints the effective configuration
fn handle_check_config(config: &Config) {
    println!("=== Product-Snap Configuration ===\n");

    println!("Site:");
    println!("  Host markers: {}", config.site.host_markers.join(", "));
    println!(
        "  Short-link markers: {}",
        config.site.short_link_markers.join(", ")
    );
    println!(
        "  Challenge markers: {}",
        config.site.challenge_markers.join(", ")
    );

    println!("\nFetch:");
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);
    println!("  Resolve timeout: {}s", config.fetch.resolve_timeout_secs);
    println!("  Connect timeout: {}s", config.fetch.connect_timeout_secs);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Default attempts: {}", config.retry.default_attempts);
    println!("  Backoff base: {}ms", config.retry.backoff_base_ms);
    println!("  Jitter: 0-{}ms", config.retry.jitter_max_ms);
    println!(
        "  Pacing: {}-{}ms",
        config.retry.pacing_min_ms, config.retry.pacing_max_ms
    );

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_addr);
    println!("  Store capacity: {}", config.server.store_capacity);
    println!(
        "  Request deadline: {}s",
        config.server.request_deadline_secs
    );

    println!("\n✓ Configuration is valid");
}
