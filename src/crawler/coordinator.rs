//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop:
//! - Managing the frontier queue and discovery depths
//! - Pacing fetch attempts through the scheduler
//! - Analyzing fetched pages and recording them in the session database
//! - Selecting the links each page expands to
//! - Recording parent/child edges when a child is taken up

use crate::analyzer::{analyze_markup, PageAnalysis, PageContext};
use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::PageSource;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::CrawlSession;
use crate::link::{has_excluded_extension, rank_by_frequency, NormalizedLink};
use crate::output::CrawlStatistics;
use crate::state::{CrawlState, LinkState, PageRecord};
use crate::DigestError;
use chrono::Utc;
use std::sync::Arc;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<S: PageSource> {
    config: Arc<Config>,
    source: S,
    scheduler: Scheduler,
    base_url: Url,
}

impl<S: PageSource> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `source` - Where page markup comes from
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(DigestError)` - The configured base URL does not parse
    pub fn new(config: Config, source: S) -> Result<Self, DigestError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let scheduler = Scheduler::from_config(&config.crawler);

        Ok(Self {
            config: Arc::new(config),
            source,
            scheduler,
            base_url,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Runs the crawl loop until the frontier is empty
    ///
    /// # Arguments
    ///
    /// * `seed` - The normalized starting link (depth 0)
    /// * `title_hint` - Root title used when the seed page yields none
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Edges, titles and page records of the crawl
    /// * `Err(DigestError::SeedUnreachable)` - No page could be analyzed
    pub async fn run(
        &mut self,
        seed: NormalizedLink,
        title_hint: String,
    ) -> Result<CrawlSession, DigestError> {
        let started_at = Utc::now();
        let mut state = CrawlState::new(seed.clone());

        tracing::info!(
            "Starting crawl at {} (max depth {}, delay {:?})",
            seed,
            self.config.crawler.max_depth,
            self.scheduler.delay()
        );

        while let Some((link, depth)) = state.next_link() {
            tracing::debug!(
                "Processing {} at depth {} ({} queued)",
                link,
                depth,
                state.frontier_len()
            );
            self.process_link(&mut state, link, depth).await;
        }

        if state.completed_count() == 0 {
            let url = seed
                .resolve(&self.base_url)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| seed.to_string());
            tracing::error!("Seed page {} could not be crawled", url);
            return Err(DigestError::SeedUnreachable { url });
        }

        let stats = CrawlStatistics::from_state(&state, started_at, Utc::now());
        tracing::info!(
            "Crawl completed: {} pages analyzed, {} edges in {}s",
            stats.pages_analyzed(),
            stats.total_edges,
            stats.duration().num_seconds()
        );

        let root_title = state
            .title_of(&seed)
            .map(str::to_string)
            .unwrap_or(title_hint);
        let (edges, titles, database) = state.into_parts();

        Ok(CrawlSession {
            seed,
            root_title,
            base_url: self.base_url.clone(),
            edges,
            titles,
            database,
            stats,
        })
    }

    /// Handles one dequeued link
    ///
    /// The politeness pause is taken before anything else is decided, so
    /// filtered links are paced like fetched ones.
    async fn process_link(&mut self, state: &mut CrawlState, link: NormalizedLink, depth: u32) {
        let url = link.resolve(&self.base_url);
        let filtered = url
            .as_ref()
            .is_ok_and(|u| has_excluded_extension(u.as_str()));

        self.scheduler.pause().await;

        if filtered || state.is_completed(&link) {
            tracing::debug!("Skipping {} (filtered or already crawled)", link);
            if filtered {
                state.transition(&link, LinkState::Filtered);
            }
            return;
        }

        // deferred: the edge to this link exists once it is taken up, even if
        // the fetch below fails
        state.record_edge(&link);

        let url = match url {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot resolve {}: {}", link, e);
                state.transition(&link, LinkState::FetchFailed);
                return;
            }
        };

        let markup = match self.source.fetch(&url).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                state.transition(&link, LinkState::FetchFailed);
                return;
            }
        };

        let ctx = PageContext {
            site: &self.config.site,
            current: &link,
            external_links: depth == 0,
        };
        let analysis = match analyze_markup(&markup, &ctx) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!("Unanalyzable page {}: {}", url, e);
                state.transition(&link, LinkState::FetchFailed);
                return;
            }
        };

        tracing::debug!(
            "Analyzed '{}': {} sections, {} related links, {} content links",
            analysis.title,
            analysis.sections.len(),
            analysis.related.len(),
            analysis.content_links.len()
        );

        state.record_page(&link, PageRecord::from_analysis(&analysis));

        if depth < self.config.crawler.max_depth {
            for child in select_expansion(&link, depth, &analysis, &self.config.crawler) {
                if state.discover(&child, &link, depth + 1) {
                    tracing::debug!("Queued {} at depth {}", child, depth + 1);
                } else {
                    tracing::debug!("Already known: {}", child);
                }
            }
        }

        state.transition(&link, LinkState::Expanded);
    }
}

/// Chooses the links an analyzed page expands to, in queue order
///
/// # Selection Policy
///
/// 1. Depth 0: the `seed-content-links` most frequent content links
/// 2. Every depth: all related links not already selected
/// 3. Depth > 0 with fewer than `sparse-related-threshold` related links:
///    the `fallback-content-links` most frequent content links not already
///    selected
pub fn select_expansion(
    link: &NormalizedLink,
    depth: u32,
    analysis: &PageAnalysis,
    config: &CrawlerConfig,
) -> Vec<NormalizedLink> {
    let mut selected: Vec<NormalizedLink> = Vec::new();

    if depth == 0 {
        selected.extend(
            rank_by_frequency(&analysis.content_links)
                .into_iter()
                .take(config.seed_content_links),
        );
    }

    for related in &analysis.related.links {
        if !selected.contains(related) {
            selected.push(related.clone());
        }
    }

    if depth > 0 && analysis.related.len() < config.sparse_related_threshold {
        tracing::info!(
            "Related links sparse for {} ({} found), falling back to content links",
            link,
            analysis.related.len()
        );

        let mut added = 0;
        for candidate in rank_by_frequency(&analysis.content_links)
            .into_iter()
            .take(config.fallback_content_links)
        {
            if !selected.contains(&candidate) {
                selected.push(candidate);
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!("Added {} content links as fallback for {}", added, link);
        }
    }

    selected
}
