//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `LinkState`: Lifecycle of each discovered link (queued, filtered, fetch failed, analyzed, expanded)
//! - `CrawlState`: Frontier, discovery depths, parents, edges and the page database of one crawl
//! - `PageRecord`: What is kept about each analyzed page

mod crawl_state;
mod link_state;

// Re-export main types
pub use crawl_state::{CrawlState, PageDatabase, PageRecord};
pub use link_state::LinkState;
