//! Link handling module for Topic-Digest
//!
//! This module canonicalizes raw hrefs into article links and classifies
//! them: non-document resources, meta-namespace pages and citation or
//! identifier boilerplate are recognised here so the analyzer and the crawl
//! engine never see them as topics.

mod normalize;

use std::collections::HashMap;

// Re-export main functions
pub use normalize::{normalize_link, seed_href, NormalizedLink};

/// File extensions of resources that are never articles
const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".tif", ".tiff", ".svg", ".txt",
];

/// Substrings marking citation machinery and action links
const BLOCKED_SUBSTRINGS: &[&str] = &[
    "(identifier)",
    "disambiguation",
    "#cite_note",
    "#references",
    "action=edit",
    "action=history",
    "action=submit",
];

/// Article names of identifier schemes and archive services, which every
/// citation links to
const BLOCKED_ARTICLES: &[&str] = &[
    "isbn", "doi", "pmid", "jstor", "arxiv", "bibcode", "wayback",
];

/// Returns true if the URL's path ends in a non-document file extension
///
/// # Examples
///
/// ```
/// use topic_digest::link::has_excluded_extension;
///
/// assert!(has_excluded_extension("https://en.wikipedia.org/wiki/File:Graph.PNG"));
/// assert!(!has_excluded_extension("https://en.wikipedia.org/wiki/Graph_theory"));
/// ```
pub fn has_excluded_extension(url: &str) -> bool {
    let path = url
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Returns true if the link points to a regular article rather than a
/// meta page (template, category, talk, file, ...)
pub fn is_article_namespace(link: &NormalizedLink) -> bool {
    !link.article_name().contains(':')
}

/// Returns true if the link is citation, identifier or action boilerplate
pub fn is_blocked_keyword(link: &NormalizedLink) -> bool {
    let name = link.article_name().to_lowercase();

    if BLOCKED_SUBSTRINGS.iter().any(|keyword| name.contains(keyword)) {
        return true;
    }

    BLOCKED_ARTICLES.iter().any(|article| {
        name == *article
            || name
                .strip_prefix(article)
                .is_some_and(|rest| rest.starts_with('_') || rest.starts_with('('))
    })
}

/// Orders distinct links by how often they occur, most frequent first
///
/// Links with equal counts keep the order of their first occurrence.
pub fn rank_by_frequency(links: &[NormalizedLink]) -> Vec<NormalizedLink> {
    let mut counts: HashMap<&NormalizedLink, usize> = HashMap::new();
    let mut order: Vec<&NormalizedLink> = Vec::new();

    for link in links {
        let count = counts.entry(link).or_insert(0);
        if *count == 0 {
            order.push(link);
        }
        *count += 1;
    }

    // stable: ties stay in first-occurrence order
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().cloned().collect()
}
