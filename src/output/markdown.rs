//! Markdown digest generation
//!
//! Every node renders to its own list of lines; the digest is the
//! concatenation of those blocks. Nothing threads a shared buffer through the
//! recursion, so each block can be tested in isolation.

use crate::analyzer::{ExternalLink, INTRODUCTION_NOT_FOUND};
use crate::config::OutputConfig;
use crate::crawler::CrawlSession;
use crate::output::tree::{build_tree, ContentNode};
use crate::state::{PageDatabase, PageRecord};
use std::cmp::Reverse;
use url::Url;

/// Shown when the seed page never made it into the database
pub const ROOT_NOT_FOUND: &str = "(Main topic data not found in database.)";

/// Shown for subtopics that were never fetched or analyzed
pub const INTRODUCTION_UNAVAILABLE: &str = "(Introduction not available or page not crawled)";

/// Heading level of the root's children
const SUBTOPIC_LEVEL: usize = 2;

/// What every subtopic block needs besides its node
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub database: &'a PageDatabase,
    pub base_url: &'a Url,
    /// Deepest subtopic level rendered (1 = children of the root only)
    pub max_print_depth: u32,
    /// Children kept per node (all if `None`)
    pub top_k: Option<usize>,
}

/// Renders the digest of a finished crawl
///
/// # Arguments
///
/// * `session` - Edges, titles and page records of the crawl
/// * `output` - Depth and breadth limits of the digest
///
/// # Returns
///
/// The markdown document
pub fn render_digest(session: &CrawlSession, output: &OutputConfig) -> String {
    let mut tree = build_tree(&session.edges, &session.seed, &session.titles);
    tree.title = session.root_title.clone();

    let ctx = RenderContext {
        database: &session.database,
        base_url: &session.base_url,
        max_print_depth: output.max_print_depth,
        top_k: output.top_k,
    };

    render_tree(&tree, &ctx, output.external_link_count)
}

/// Renders a tree whose root is the seed topic
pub fn render_tree(root: &ContentNode, ctx: &RenderContext, external_link_count: Option<usize>) -> String {
    let mut lines = root_block(root, ctx.database.get(&root.title), external_link_count);

    if !root.children.is_empty() {
        lines.push("## Key Subtopics".to_string());
        lines.extend(subtopic_blocks(root, SUBTOPIC_LEVEL, ctx));
    }

    lines.join("\n")
}

/// Lines for the seed topic: title, introduction, sections and external links
pub fn root_block(
    root: &ContentNode,
    record: Option<&PageRecord>,
    external_link_count: Option<usize>,
) -> Vec<String> {
    let mut lines = vec![format!("# {}", root.title)];

    let Some(record) = record else {
        lines.push(format!("\n{}\n", ROOT_NOT_FOUND));
        return lines;
    };

    lines.push(format!("\n{}\n", record.introduction));

    for section in &record.sections {
        if section.heading.is_empty() || section.content.trim().is_empty() {
            continue;
        }
        lines.push(format!("## {}", section.heading));
        lines.push(format!("\n{}\n", section.content));
    }

    let links = &record.external_links;
    if !links.is_empty() {
        let count = external_link_count.map_or(links.len(), |n| n.min(links.len()));
        lines.extend(external_links_block(&links[..count]));
    }

    lines
}

fn external_links_block(links: &[ExternalLink]) -> Vec<String> {
    let mut lines = vec!["## External Links".to_string()];
    lines.extend(
        links
            .iter()
            .map(|link| format!("* [{}]({})", link.text, link.url)),
    );
    lines.push(String::new());
    lines
}

/// Orders children by subtree size, largest first, and keeps the top k
///
/// Equal sizes keep edge order.
pub fn ranked_children<'a>(node: &'a ContentNode, top_k: Option<usize>) -> Vec<&'a ContentNode> {
    let mut children: Vec<&ContentNode> = node.children.iter().collect();
    children.sort_by_cached_key(|child| Reverse(child.descendant_count()));
    if let Some(k) = top_k {
        children.truncate(k);
    }
    children
}

/// Lines for one subtopic: heading, introduction and link to the live page
pub fn subtopic_block(node: &ContentNode, level: usize, ctx: &RenderContext) -> Vec<String> {
    let introduction = ctx
        .database
        .get(&node.title)
        .map(|record| record.introduction.as_str())
        .filter(|intro| !intro.is_empty() && *intro != INTRODUCTION_NOT_FOUND)
        .unwrap_or(INTRODUCTION_UNAVAILABLE);

    let url = node
        .link
        .resolve(ctx.base_url)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}{}", ctx.base_url.as_str().trim_end_matches('/'), node.link));

    vec![
        format!("{} {}", "#".repeat(level), node.title),
        format!("\n{}\n", introduction),
        format!("[Link to page]({})\n", url),
    ]
}

/// Lines for the ranked children of `node` and their subtrees
///
/// Children are rendered at heading `level`; nothing is rendered once
/// `level - 1` exceeds the maximum print depth.
pub fn subtopic_blocks(node: &ContentNode, level: usize, ctx: &RenderContext) -> Vec<String> {
    if level.saturating_sub(1) > ctx.max_print_depth as usize {
        return Vec::new();
    }

    ranked_children(node, ctx.top_k)
        .into_iter()
        .flat_map(|child| {
            let mut lines = subtopic_block(child, level, ctx);
            if !child.children.is_empty() {
                lines.extend(subtopic_blocks(child, level + 1, ctx));
            }
            lines
        })
        .collect()
}
