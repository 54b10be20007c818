//! Topic-Digest: a bounded-depth topic crawler for hypertext encyclopedias
//!
//! This crate crawls an encyclopedia starting from a seed article, follows
//! "see also" and in-body article links breadth-first, and renders the
//! discovered topic tree as a priority-ranked markdown digest.

pub mod analyzer;
pub mod config;
pub mod crawler;
pub mod link;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Topic-Digest operations
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Seed page unreachable: {url}")]
    SeedUnreachable { url: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons a raw href does not denote an article
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Path is outside the article prefix: {0}")]
    OutsideArticlePath(String),

    #[error("Empty article name")]
    EmptyArticle,

    #[error("Article name contains unsafe characters: {0}")]
    UnsafeCharacters(String),
}

/// Result type alias for Topic-Digest operations
pub type Result<T> = std::result::Result<T, DigestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for link normalization
pub type LinkResult<T> = std::result::Result<T, LinkError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_topic, CrawlSession};
pub use link::{has_excluded_extension, is_article_namespace, normalize_link, NormalizedLink};
pub use state::LinkState;
