//! Topic-Digest main entry point
//!
//! This is the command-line interface for the Topic-Digest encyclopedia crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use topic_digest::config::{load_config_with_hash, Config};
use topic_digest::crawler::{crawl_session, resolve_seed};
use topic_digest::output::{print_statistics, render_digest, write_digest};
use tracing_subscriber::EnvFilter;

/// Topic-Digest: a bounded-depth topic crawler
///
/// Topic-Digest starts at a seed article, follows its "see also" and most
/// frequent in-body links breadth-first, and prints a markdown digest of the
/// discovered topics ranked by how much of the tree sits below them.
#[derive(Parser, Debug)]
#[command(name = "topic-digest")]
#[command(version)]
#[command(about = "Crawl an encyclopedia topic into a markdown digest", long_about = None)]
struct Cli {
    /// Seed article: a name ("Graph theory"), an article link or a URL
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file (defaults are used when absent)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override crawler max-depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Override crawler request-delay (milliseconds)
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Override output max-print-depth
    #[arg(long, value_name = "N")]
    print_depth: Option<u32>,

    /// Override output top-k
    #[arg(long, value_name = "N")]
    top_k: Option<usize>,

    /// Write the digest here instead of summary-path or stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate config and seed and show the crawl plan without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print crawl statistics after the digest is written
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(&cli)?;
    apply_overrides(&mut config, &cli);
    topic_digest::config::validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        return handle_dry_run(&config, &cli.seed);
    }

    handle_crawl(&config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("topic_digest=info,warn"),
            1 => EnvFilter::new("topic_digest=debug,info"),
            2 => EnvFilter::new("topic_digest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout may carry the digest
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load(cli: &Cli) -> anyhow::Result<Config> {
    let Some(path) = &cli.config else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(delay) = cli.delay_ms {
        config.crawler.request_delay = delay;
    }
    if let Some(depth) = cli.print_depth {
        config.output.max_print_depth = depth;
    }
    if let Some(k) = cli.top_k {
        config.output.top_k = Some(k);
    }
    if let Some(path) = &cli.output {
        config.output.summary_path = Some(path.display().to_string());
    }
}

/// Handles the --dry-run mode: validates config and seed and shows the plan
fn handle_dry_run(config: &Config, seed: &str) -> anyhow::Result<()> {
    let seed_link = resolve_seed(config, seed)?;
    let seed_url = seed_link
        .resolve(&url::Url::parse(&config.site.base_url)?)
        .context("Seed does not resolve against base-url")?;

    println!("=== Topic-Digest Dry Run ===\n");

    println!("Seed:");
    println!("  Link: {}", seed_link);
    println!("  URL: {}", seed_url);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!("  Seed content links: {}", config.crawler.seed_content_links);
    println!(
        "  Fallback content links: {} (when fewer than {} related links)",
        config.crawler.fallback_content_links, config.crawler.sparse_related_threshold
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Max print depth: {}", config.output.max_print_depth);
    match config.output.top_k {
        Some(k) => println!("  Top-k per level: {}", k),
        None => println!("  Top-k per level: unbounded"),
    }
    println!(
        "  Digest: {}",
        config.output.summary_path.as_deref().unwrap_or("stdout")
    );

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", seed_url);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let session = match crawl_session(config, &cli.seed).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let digest = render_digest(&session, &config.output);

    match config.output.summary_path.as_deref() {
        Some(path) => {
            write_digest(&digest, Path::new(path))
                .with_context(|| format!("Failed to write digest to {}", path))?;
            tracing::info!("Digest written to {}", path);
        }
        None => println!("{}", digest),
    }

    if cli.stats {
        print_statistics(&session.stats);
    }

    Ok(())
}
