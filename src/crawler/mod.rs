//! Crawler module for topic discovery
//!
//! This module contains the core crawling logic, including:
//! - Page fetching behind the `PageSource` capability
//! - Politeness pacing between fetch attempts
//! - The breadth-first crawl loop and its link-selection policy

mod coordinator;
mod fetcher;
mod scheduler;

pub use coordinator::{select_expansion, Coordinator};
pub use fetcher::{build_http_client, user_agent_string, FetchError, HttpFetcher, PageSource};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::link::{normalize_link, seed_href, NormalizedLink};
use crate::output::{render_digest, CrawlStatistics};
use crate::state::PageDatabase;
use crate::DigestError;
use std::collections::HashMap;
use url::Url;

/// Everything a finished crawl hands to the digest renderer
pub struct CrawlSession {
    /// The normalized starting link
    pub seed: NormalizedLink,

    /// Title of the seed page, or the title derived from the seed link when
    /// the page yielded none
    pub root_title: String,

    /// Base URL article links are resolved against
    pub base_url: Url,

    /// Parent/child edges in the order children were taken up
    pub edges: Vec<(NormalizedLink, NormalizedLink)>,

    /// Last title seen for each analyzed link
    pub titles: HashMap<NormalizedLink, String>,

    /// Page records keyed by lowercase title
    pub database: PageDatabase,

    pub stats: CrawlStatistics,
}

/// Normalizes a seed given as an article name, article link or URL
///
/// # Returns
///
/// * `Ok(NormalizedLink)` - The starting link
/// * `Err(DigestError::InvalidSeed)` - The seed does not denote an article
pub fn resolve_seed(config: &Config, seed: &str) -> Result<NormalizedLink, DigestError> {
    let prefix = &config.site.article_prefix;
    normalize_link(&seed_href(seed, prefix), prefix)
        .map_err(|e| DigestError::InvalidSeed(format!("'{}': {}", seed, e)))
}

/// Crawls from `seed` using the given page source
pub async fn crawl_session_with<S: PageSource>(
    config: &Config,
    seed: &str,
    source: S,
) -> Result<CrawlSession, DigestError> {
    let seed = resolve_seed(config, seed)?;
    let title_hint = seed.display_title();
    let mut coordinator = Coordinator::new(config.clone(), source)?;
    coordinator.run(seed, title_hint).await
}

/// Crawls from `seed` over HTTP
pub async fn crawl_session(config: &Config, seed: &str) -> Result<CrawlSession, DigestError> {
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    crawl_session_with(config, seed, fetcher).await
}

/// Crawls a topic and renders its digest
///
/// This is the main entry point. It will:
/// 1. Normalize the seed
/// 2. Crawl breadth-first up to `max-depth`
/// 3. Build the topic tree from the recorded edges
/// 4. Render the markdown digest
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `seed` - Article name (`Graph theory`), article link or URL
///
/// # Returns
///
/// * `Ok(String)` - The rendered digest
/// * `Err(DigestError::InvalidSeed)` - The seed is not an article link
/// * `Err(DigestError::SeedUnreachable)` - The seed page could not be crawled
///
/// # Example
///
/// ```no_run
/// use topic_digest::{crawl_topic, Config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let digest = crawl_topic(&Config::default(), "Graph theory").await?;
/// println!("{}", digest);
/// # Ok(())
/// # }
/// ```
pub async fn crawl_topic(config: &Config, seed: &str) -> Result<String, DigestError> {
    let session = crawl_session(config, seed).await?;
    Ok(render_digest(&session, &config.output))
}
