use serde::Deserialize;

/// Main configuration structure for Topic-Digest
///
/// Every section is optional in the TOML file; missing sections and keys
/// take the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The encyclopedia being crawled
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL article links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path prefix shared by every article (e.g. "/wiki/")
    #[serde(rename = "article-prefix")]
    pub article_prefix: String,

    /// Site-name suffix stripped from the `<title>` fallback
    #[serde(rename = "title-suffix")]
    pub title_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            article_prefix: "/wiki/".to_string(),
            title_suffix: " - Wikipedia".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum BFS depth that is still expanded (pages at this depth are
    /// fetched but their links are not followed)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Pause before every fetch attempt (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Number of most frequent content links followed from the seed page
    #[serde(rename = "seed-content-links")]
    pub seed_content_links: usize,

    /// Number of most frequent content links used when related links are sparse
    #[serde(rename = "fallback-content-links")]
    pub fallback_content_links: usize,

    /// Pages with fewer related links than this fall back to content links
    #[serde(rename = "sparse-related-threshold")]
    pub sparse_related_threshold: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            request_delay: 2000,
            seed_content_links: 1,
            fallback_content_links: 5,
            sparse_related_threshold: 2,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "topic-digest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// Digest rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Deepest subtopic level that is rendered below "Key Subtopics"
    #[serde(rename = "max-print-depth")]
    pub max_print_depth: u32,

    /// Children rendered per node, ranked by subtree size (unbounded if absent)
    #[serde(rename = "top-k")]
    pub top_k: Option<usize>,

    /// External links of the seed page that are rendered (all if absent)
    #[serde(rename = "external-link-count")]
    pub external_link_count: Option<usize>,

    /// Where the digest is written (stdout if absent)
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_print_depth: 2,
            top_k: Some(5),
            external_link_count: None,
            summary_path: None,
        }
    }
}
