//! Statistics of a finished crawl
//!
//! This module derives counts from the crawl state and displays them.

use crate::state::{CrawlState, LinkState};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of links that were ever queued
    pub total_links: u64,

    /// Count of links by final state
    pub links_by_state: HashMap<LinkState, u64>,

    /// Analyzed pages per discovery depth
    pub pages_by_depth: BTreeMap<u32, u64>,

    /// Number of parent/child edges recorded
    pub total_edges: u64,

    /// Number of distinct titles in the page database
    pub database_entries: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlStatistics {
    /// Collects statistics from a finished crawl
    ///
    /// # Arguments
    ///
    /// * `state` - The state the crawl ended with
    /// * `started_at` - When the crawl loop started
    /// * `finished_at` - When the frontier ran empty
    pub fn from_state(
        state: &CrawlState,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut links_by_state = HashMap::new();
        let mut pages_by_depth = BTreeMap::new();

        for (link, link_state) in state.states() {
            *links_by_state.entry(*link_state).or_insert(0) += 1;

            if link_state.is_success() {
                let depth = state.depth_of(link).unwrap_or(0);
                *pages_by_depth.entry(depth).or_insert(0) += 1;
            }
        }

        Self {
            total_links: state.states().len() as u64,
            links_by_state,
            pages_by_depth,
            total_edges: state.edges().len() as u64,
            database_entries: state.database().len() as u64,
            started_at,
            finished_at,
        }
    }

    pub fn count(&self, state: LinkState) -> u64 {
        self.links_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Pages that were fetched and analyzed
    pub fn pages_analyzed(&self) -> u64 {
        self.count(LinkState::Analyzed) + self.count(LinkState::Expanded)
    }

    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// Percentage of queued links that were analyzed
    pub fn success_rate(&self) -> f64 {
        if self.total_links == 0 {
            0.0
        } else {
            (self.pages_analyzed() as f64 / self.total_links as f64) * 100.0
        }
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// The digest itself may go to stdout, so statistics stay out of its way.
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Links queued: {}", stats.total_links);
    eprintln!("  Pages analyzed: {}", stats.pages_analyzed());
    eprintln!("  Distinct topics: {}", stats.database_entries);
    eprintln!("  Tree edges: {}", stats.total_edges);
    eprintln!(
        "  Duration: {:.1}s ({} to {})",
        stats.duration().num_milliseconds() as f64 / 1000.0,
        stats.started_at.format("%H:%M:%S"),
        stats.finished_at.format("%H:%M:%S")
    );
    eprintln!();

    eprintln!("Links by State:");
    let mut state_counts: Vec<_> = stats.links_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (state, count) in state_counts {
        eprintln!("  {}: {}", state, count);
    }
    eprintln!();

    if !stats.pages_by_depth.is_empty() {
        eprintln!("Pages by Depth:");
        for (depth, count) in &stats.pages_by_depth {
            eprintln!("  {}: {}", depth, count);
        }
        eprintln!();
    }

    eprintln!(
        "Success Rate: {:.1}% ({} / {} links analyzed)",
        stats.success_rate(),
        stats.pages_analyzed(),
        stats.total_links
    );
}
