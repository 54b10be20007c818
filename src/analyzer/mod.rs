//! Document analysis module for Topic-Digest
//!
//! This module extracts everything the crawl and the digest need from one
//! fetched article:
//! - Title and introduction
//! - Labeled sections
//! - Related ("see also"), external and in-body content links
//!
//! Boilerplate regions are recognised through [`StructuralRole`] rather than
//! through ad hoc class checks at every call site.

mod links;
mod structure;
mod text;

use crate::config::SiteConfig;
use crate::link::NormalizedLink;
use scraper::{ElementRef, Html};
use thiserror::Error;

pub use links::{extract_content_links, extract_external_links, extract_related_links};
pub use structure::{heading, structural_role, Heading, StructuralRole, EXCLUDED_SECTIONS};
pub use text::{extract_introduction, extract_sections, extract_title};

/// Title used when neither the heading nor the `<title>` element is usable
pub const TITLE_NOT_FOUND: &str = "Title not found";

/// Introduction used when the page has no main content region
pub const INTRODUCTION_NOT_FOUND: &str = "Introduction not found.";

/// A labeled block of article prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

/// A link leaving the encyclopedia
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub text: String,
    pub url: String,
}

/// Result of the "see also" lookup
///
/// `heading_found` tells a page without a "see also" heading apart from one
/// whose list turned out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedLinks {
    pub heading_found: bool,
    /// Deduplicated, lexicographically sorted
    pub links: Vec<NormalizedLink>,
}

impl RelatedLinks {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}

/// Everything extracted from one page
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub title: String,
    pub introduction: String,
    pub sections: Vec<Section>,
    pub related: RelatedLinks,
    pub external_links: Vec<ExternalLink>,
    /// In document order, duplicates kept for frequency ranking
    pub content_links: Vec<NormalizedLink>,
}

/// The page being analyzed and the site it belongs to
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub site: &'a SiteConfig,
    pub current: &'a NormalizedLink,
    /// Whether the "external links" list is extracted
    pub external_links: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("Neither a title nor an introduction could be extracted")]
    Unanalyzable,
}

/// Locates the main content region of an article
pub fn content_region(document: &Html) -> Option<ElementRef<'_>> {
    let root = document.root_element();
    structure::select_first(root, "div#mw-content-text div.mw-parser-output")
        .or_else(|| structure::select_first(root, "div.mw-parser-output"))
}

/// Analyzes a parsed article
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `ctx` - Site description and the page's own link
///
/// # Returns
///
/// * `Ok(PageAnalysis)` - Extracted title, prose and links
/// * `Err(AnalyzeError::Unanalyzable)` - Neither a title nor an introduction
///   was found; the caller treats the page as unfetched
pub fn analyze(document: &Html, ctx: &PageContext) -> Result<PageAnalysis, AnalyzeError> {
    let region = content_region(document);

    let title = extract_title(document, &ctx.site.title_suffix);
    let introduction = region.map(extract_introduction);

    if title.is_none() && introduction.as_deref().map_or(true, str::is_empty) {
        return Err(AnalyzeError::Unanalyzable);
    }

    let (sections, content_links) = match region {
        Some(region) => (
            extract_sections(region),
            extract_content_links(region, ctx),
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(PageAnalysis {
        title: title.unwrap_or_else(|| TITLE_NOT_FOUND.to_string()),
        introduction: introduction.unwrap_or_else(|| INTRODUCTION_NOT_FOUND.to_string()),
        sections,
        related: extract_related_links(document, ctx),
        external_links: if ctx.external_links {
            extract_external_links(document, ctx)
        } else {
            Vec::new()
        },
        content_links,
    })
}

/// Parses raw markup and analyzes it
///
/// The parsed document is dropped before returning, so callers in async
/// code never hold it across an await point.
pub fn analyze_markup(markup: &str, ctx: &PageContext) -> Result<PageAnalysis, AnalyzeError> {
    let document = Html::parse_document(markup);
    analyze(&document, ctx)
}
