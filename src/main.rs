//! Sumi-Scout main entry point
//!
//! This is the command-line interface for the Sumi-Scout web research relay.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sumi_scout::config::{load_config_with_hash, Config};
use sumi_scout::relay::Relay;
use sumi_scout::server;
use sumi_scout::summarizer::{AnthropicSummarizer, Summarizer};
use tracing_subscriber::EnvFilter;

/// Sumi-Scout: a same-origin web research relay
///
/// Sumi-Scout crawls a website within its own host, streams progress to
/// WebSocket clients, and relays an AI summary plus follow-up answers grounded
/// in the crawled pages.
#[derive(Parser, Debug)]
#[command(name = "sumi-scout")]
#[command(version = "1.0.0")]
#[command(about = "A same-origin web research relay", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the listen address (host:port)
    #[arg(long, env = "SCOUT_BIND")]
    bind: Option<String>,

    /// Anthropic API key; without it summaries fall back to a page listing
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,

    /// Validate config and print the effective settings without serving
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    sumi_scout::config::validate(&config).context("invalid effective configuration")?;

    let summarizer = build_summarizer(&config, cli.anthropic_api_key.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config, summarizer.is_some());
        return Ok(());
    }

    let relay = Relay::from_config(&config, summarizer);
    server::serve(&config, relay, server::shutdown_signal())
        .await
        .context("server failed")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scout=info,tower_http=info,warn"),
            1 => EnvFilter::new("sumi_scout=debug,tower_http=debug,info"),
            2 => EnvFilter::new("sumi_scout=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&std::path::Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Builds the Anthropic summarizer when an API key is available
fn build_summarizer(
    config: &Config,
    api_key: Option<&str>,
) -> Result<Option<Arc<dyn Summarizer>>> {
    match api_key.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) => {
            let summarizer = AnthropicSummarizer::new(key, &config.summarizer)
                .context("failed to initialize Anthropic summarizer")?;
            tracing::info!("Summarizer initialized with model: {}", summarizer.model());
            Ok(Some(Arc::new(summarizer)))
        }
        None => {
            tracing::warn!("ANTHROPIC_API_KEY not set; summaries will list pages only");
            Ok(None)
        }
    }
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config, summarizer_configured: bool) {
    println!("=== Sumi-Scout Dry Run ===\n");

    println!("Server:");
    println!("  Bind: {}", config.server.bind);
    println!("  Allowed origins: {}", config.server.allowed_origins.join(", "));

    println!("\nCrawler Configuration:");
    println!("  Default max pages: {}", config.crawler.default_max_pages);
    println!("  Max pages limit: {}", config.crawler.max_pages_limit);
    println!("  Page timeout: {}ms", config.crawler.page_timeout);
    println!("  Settle time: {}ms", config.crawler.settle_time);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay);
    println!("  Content limit: {} chars", config.crawler.content_limit);
    println!(
        "  Private hosts: {}",
        if config.crawler.allow_private_hosts {
            "allowed"
        } else {
            "rejected"
        }
    );

    println!("\nSessions:");
    println!("  TTL: {} minutes", config.sessions.ttl_minutes);
    println!(
        "  Sweep interval: {} minutes",
        config.sessions.sweep_interval_minutes
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nSummarizer:");
    println!("  Model: {}", config.summarizer.model);
    println!("  API base: {}", config.summarizer.api_base);
    println!(
        "  Status: {}",
        if summarizer_configured {
            "configured"
        } else {
            "not configured (page listing fallback)"
        }
    );

    println!("\n=== Dry run complete. Configuration is valid. ===");
}
