use crate::analyzer::structure::{
    child_elements, clean_text, has_class, heading, heading_block, next_elements, select_all,
    select_first, structural_role,
};
use crate::analyzer::{ExternalLink, PageContext, RelatedLinks};
use crate::link::{is_article_namespace, is_blocked_keyword, normalize_link, NormalizedLink};
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeSet, HashSet};

/// Anchor ids of the "see also" heading
const SEE_ALSO_ANCHORS: &[&str] = &["See_also", "See_also_section"];

/// Anchor ids of the "external links" heading
const EXTERNAL_LINKS_ANCHORS: &[&str] = &["External_links", "External_links_section"];

/// Page furniture that follows the article body
const FOOTER_IDS: &[&str] = &[
    "catlinks",
    "references-section",
    "siteSub",
    "contentSub",
    "jump-to-nav",
    "printfooter",
];

/// Hosts that mirror other pages rather than being sources themselves
const ARCHIVE_HOSTS: &[&str] = &["web.archive.org", "archive.is"];

/// Finds the block element of a heading, first by anchor id, then by
/// comparing the text of `<h2>`/`<h3>` headings
fn find_heading_block<'a>(document: &'a Html, anchors: &[&str], title: &str) -> Option<ElementRef<'a>> {
    let root = document.root_element();

    for anchor in anchors {
        let Some(target) = select_first(root, &format!("#{}", anchor)) else {
            continue;
        };
        if heading(&target).is_some() {
            return Some(heading_block(target));
        }
        let enclosing = target
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| matches!(el.value().name(), "h2" | "h3"));
        if let Some(h) = enclosing {
            return Some(heading_block(h));
        }
    }

    select_all(root, "h2, h3")
        .into_iter()
        .find(|el| heading(el).is_some_and(|h| h.is_titled(title)))
        .map(heading_block)
}

fn is_footer(element: &ElementRef) -> bool {
    element.value().name() == "div"
        && element
            .value()
            .id()
            .is_some_and(|id| FOOTER_IDS.contains(&id))
}

/// Extracts the "see also" links
///
/// Every list between the "see also" heading and the next top-level heading
/// contributes the first link of each of its items. Links are admitted when
/// they are article-namespace links other than the current page; the result
/// is deduplicated and sorted.
pub fn extract_related_links(document: &Html, ctx: &PageContext) -> RelatedLinks {
    let Some(start) = find_heading_block(document, SEE_ALSO_ANCHORS, "see also") else {
        return RelatedLinks::default();
    };
    let (Ok(list_selector), Ok(anchor_selector)) =
        (Selector::parse("ul"), Selector::parse("a[href]"))
    else {
        return RelatedLinks::default();
    };

    let mut lists: Vec<ElementRef> = Vec::new();

    for sibling in next_elements(start) {
        if heading(&sibling).is_some_and(|h| h.level <= 3) || is_footer(&sibling) {
            break;
        }

        match sibling.value().name() {
            "ul" => lists.push(sibling),
            "div" => {
                if structural_role(&sibling).is_some_and(|role| role.skipped_in_related()) {
                    continue;
                }
                lists.extend(sibling.select(&list_selector));
            }
            _ => {}
        }
    }

    let mut found = BTreeSet::new();

    for list in lists {
        for item in child_elements(list).filter(|el| el.value().name() == "li") {
            let Some(href) = item
                .select(&anchor_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                continue;
            };
            let Ok(link) = normalize_link(href, &ctx.site.article_prefix) else {
                continue;
            };
            if &link != ctx.current && is_article_namespace(&link) {
                found.insert(link);
            }
        }
    }

    RelatedLinks {
        heading_found: true,
        links: found.into_iter().collect(),
    }
}

/// Extracts the "external links" list
///
/// Protocol-relative targets are upgraded to `https:`. Archive mirrors and
/// links to the site's own file pages are dropped.
pub fn extract_external_links(document: &Html, ctx: &PageContext) -> Vec<ExternalLink> {
    let Some(start) = find_heading_block(document, EXTERNAL_LINKS_ANCHORS, "external links") else {
        return Vec::new();
    };
    let Ok(selectors) = ExternalSelectors::new() else {
        return Vec::new();
    };

    let mut lists: Vec<ElementRef> = Vec::new();

    for sibling in next_elements(start) {
        if heading(&sibling).is_some_and(|h| h.level <= 2) || is_footer(&sibling) {
            break;
        }

        match sibling.value().name() {
            "ul" => lists.push(sibling),
            "div"
                if has_class(&sibling, "div-col")
                    || has_class(&sibling, "noprint")
                    || has_class(&sibling, "plainlist") =>
            {
                lists.extend(sibling.select(&selectors.list));
            }
            _ => {}
        }
    }

    let file_prefix = format!(
        "{}{}File:",
        ctx.site.base_url.trim_end_matches('/'),
        ctx.site.article_prefix
    );

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for list in lists {
        for item in list.select(&selectors.item) {
            let Some(anchor) = selectors.anchor_of(item) else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let url = match href.strip_prefix("//") {
                Some(rest) => format!("https://{}", rest),
                None => href.to_string(),
            };

            if ARCHIVE_HOSTS.iter().any(|host| url.contains(host)) || url.starts_with(&file_prefix) {
                continue;
            }
            if !seen.insert(url.clone()) {
                continue;
            }

            let text = clean_text(anchor);
            let text = if text.is_empty() { url.clone() } else { text };
            links.push(ExternalLink { text, url });
        }
    }

    links
}

/// Selectors of the "external links" scan, parsed once per page
struct ExternalSelectors {
    list: Selector,
    item: Selector,
    external: Selector,
    anchor: Selector,
}

impl ExternalSelectors {
    fn new() -> Result<Self, scraper::error::SelectorErrorKind<'static>> {
        Ok(Self {
            list: Selector::parse("ul")?,
            item: Selector::parse("li")?,
            external: Selector::parse("a.external[href]")?,
            anchor: Selector::parse("a[href]")?,
        })
    }

    /// The `a.external` anchor of a list item, else its first absolute link
    fn anchor_of<'a>(&self, item: ElementRef<'a>) -> Option<ElementRef<'a>> {
        item.select(&self.external).next().or_else(|| {
            item.select(&self.anchor).find(|a| {
                a.value().attr("href").is_some_and(|href| {
                    href.starts_with("http://")
                        || href.starts_with("https://")
                        || href.starts_with("//")
                })
            })
        })
    }
}

/// Extracts every in-body article link, duplicates included
///
/// Occurrence counts matter to the crawl's ranking, so a link mentioned four
/// times appears four times. Links inside structural regions (navigation,
/// citations, info boxes, ...) and inside sections governed by an excluded
/// heading are dropped.
pub fn extract_content_links(region: ElementRef, ctx: &PageContext) -> Vec<NormalizedLink> {
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    let mut guard_level: Option<u8> = None;

    for block in child_elements(region) {
        if let Some(h) = heading(&block) {
            let still_guarded = guard_level.is_some_and(|level| h.level > level);
            if !still_guarded {
                guard_level = h.mentions_excluded().then_some(h.level);
            }
        }
        if guard_level.is_some() {
            continue;
        }

        for anchor in block.select(&anchor_selector) {
            if let Some(link) = admit_content_link(anchor, region, ctx) {
                links.push(link);
            }
        }
    }

    links
}

fn admit_content_link(
    anchor: ElementRef,
    region: ElementRef,
    ctx: &PageContext,
) -> Option<NormalizedLink> {
    let href = anchor.value().attr("href")?;
    let link = normalize_link(href, &ctx.site.article_prefix).ok()?;

    if &link == ctx.current || !is_article_namespace(&link) || is_blocked_keyword(&link) {
        return None;
    }

    let in_structure = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|ancestor| *ancestor != region)
        .any(|ancestor| structural_role(&ancestor).is_some());

    if in_structure {
        None
    } else {
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::content_region;
    use crate::config::SiteConfig;

    fn page(body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div id="mw-content-text"><div class="mw-parser-output">{}</div></div>
            <div id="catlinks"><ul><li><a href="/wiki/Category:Graphs">Graphs</a></li></ul></div>
            </body></html>"#,
            body
        ))
    }

    fn link(href: &str) -> NormalizedLink {
        normalize_link(href, "/wiki/").unwrap()
    }

    fn with_ctx<T>(f: impl FnOnce(&PageContext) -> T) -> T {
        let site = SiteConfig::default();
        let current = link("/wiki/Graph_theory");
        f(&PageContext {
            site: &site,
            current: &current,
            external_links: true,
        })
    }

    #[test]
    fn test_related_links_legacy_heading() {
        let doc = page(
            r#"<p>Intro</p>
            <h2><span class="mw-headline" id="See_also">See also</span></h2>
            <div class="div-col"><ul>
              <li><a href="/wiki/Tree_(graph_theory)">Tree</a> and <a href="/wiki/Other">x</a></li>
              <li><a href="/wiki/Glossary_of_graph_theory">Glossary</a></li>
              <li><a href="/wiki/Portal:Mathematics">Portal</a></li>
              <li><a href="/wiki/Graph_theory#History">Self</a></li>
            </ul></div>
            <div class="navbox"><ul><li><a href="/wiki/Navbox_link">N</a></li></ul></div>
            <ul><li><a href="/wiki/Adjacency_matrix">Adjacency</a></li></ul>
            <h2><span class="mw-headline" id="References">References</span></h2>
            <ul><li><a href="/wiki/After">After</a></li></ul>"#,
        );

        let related = with_ctx(|ctx| extract_related_links(&doc, ctx));

        assert!(related.heading_found);
        assert_eq!(
            related.links,
            vec![
                link("/wiki/Adjacency_matrix"),
                link("/wiki/Glossary_of_graph_theory"),
                link("/wiki/Tree_(graph_theory)"),
            ]
        );
    }

    #[test]
    fn test_related_links_modern_heading() {
        let doc = page(
            r#"<div class="mw-heading mw-heading2"><h2 id="See_also">See also</h2></div>
            <ul><li><a href="/wiki/Network_science">Network science</a></li></ul>
            <div class="mw-heading mw-heading2"><h2 id="Notes">Notes</h2></div>
            <ul><li><a href="/wiki/After">After</a></li></ul>"#,
        );

        let related = with_ctx(|ctx| extract_related_links(&doc, ctx));
        assert_eq!(related.links, vec![link("/wiki/Network_science")]);
    }

    #[test]
    fn test_related_links_by_heading_text() {
        let doc = page(
            r#"<h2>SEE ALSO</h2>
            <ul><li><a href="/wiki/Network_science">Network science</a></li></ul>"#,
        );

        let related = with_ctx(|ctx| extract_related_links(&doc, ctx));
        assert!(related.heading_found);
        assert_eq!(related.links.len(), 1);
    }

    #[test]
    fn test_related_links_missing_heading() {
        let doc = page(r#"<p><a href="/wiki/Tree">Tree</a></p>"#);
        let related = with_ctx(|ctx| extract_related_links(&doc, ctx));
        assert!(!related.heading_found);
        assert!(related.is_empty());
    }

    #[test]
    fn test_related_links_empty_but_found() {
        let doc = page(r#"<h2 id="See_also">See also</h2><p>Nothing listed.</p>"#);
        let related = with_ctx(|ctx| extract_related_links(&doc, ctx));
        assert!(related.heading_found);
        assert!(related.is_empty());
    }

    #[test]
    fn test_external_links() {
        let doc = page(
            r#"<h2><span class="mw-headline" id="External_links">External links</span></h2>
            <ul>
              <li><a class="external text" href="https://example.org/graphs">Graph notes</a></li>
              <li><a href="//example.net/trees">Trees</a></li>
              <li><a class="external" href="https://web.archive.org/web/2000/x">Archived</a></li>
              <li><a class="external" href="https://en.wikipedia.org/wiki/File:Graph.svg">File</a></li>
              <li><a class="external" href="http://example.com/bare"></a></li>
              <li><a href="/wiki/Internal">Internal only</a></li>
            </ul>
            <div class="noprint"><ul><li><a class="external" href="https://example.com/more">More</a></li></ul></div>"#,
        );

        let links = with_ctx(|ctx| extract_external_links(&doc, ctx));

        assert_eq!(
            links,
            vec![
                ExternalLink {
                    text: "Graph notes".to_string(),
                    url: "https://example.org/graphs".to_string(),
                },
                ExternalLink {
                    text: "Trees".to_string(),
                    url: "https://example.net/trees".to_string(),
                },
                ExternalLink {
                    text: "http://example.com/bare".to_string(),
                    url: "http://example.com/bare".to_string(),
                },
                ExternalLink {
                    text: "More".to_string(),
                    url: "https://example.com/more".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_external_links_missing() {
        let doc = page("<p>Nothing</p>");
        assert!(with_ctx(|ctx| extract_external_links(&doc, ctx)).is_empty());
    }

    #[test]
    fn test_content_links_keep_duplicates() {
        let doc = page(
            r#"<p><a href="/wiki/Vertex_(graph_theory)">vertex</a> and
            <a href="/wiki/Edge_(graph_theory)">edge</a>; every
            <a href="/wiki/Vertex_(graph_theory)">vertex</a>.</p>"#,
        );
        let region = content_region(&doc).unwrap();
        let links = with_ctx(|ctx| extract_content_links(region, ctx));

        assert_eq!(
            links,
            vec![
                link("/wiki/Vertex_(graph_theory)"),
                link("/wiki/Edge_(graph_theory)"),
                link("/wiki/Vertex_(graph_theory)"),
            ]
        );
    }

    #[test]
    fn test_content_links_exclude_structure() {
        let doc = page(
            r#"<table class="infobox"><tr><td><a href="/wiki/Infobox_link">i</a></td></tr></table>
            <p><a href="/wiki/Kept">kept</a><sup class="reference"><a href="/wiki/Cite_link">[1]</a></sup></p>
            <div class="thumb"><a href="/wiki/Thumb_link">t</a></div>
            <div class="navbox"><a href="/wiki/Navbox_link">n</a></div>
            <p><a href="/wiki/Template:Graphs">template</a>
               <a href="/wiki/ISBN_(identifier)">ISBN</a>
               <a href="/wiki/Graph_theory">self</a>
               <a href="https://example.org/x">outside</a></p>"#,
        );
        let region = content_region(&doc).unwrap();
        let links = with_ctx(|ctx| extract_content_links(region, ctx));

        assert_eq!(links, vec![link("/wiki/Kept")]);
    }

    #[test]
    fn test_content_links_heading_guard() {
        let doc = page(
            r#"<p><a href="/wiki/Before">b</a></p>
            <h2><span class="mw-headline" id="See_also">See also</span></h2>
            <ul><li><a href="/wiki/Related">r</a></li></ul>
            <h3>Sub list</h3>
            <ul><li><a href="/wiki/Nested">n</a></li></ul>
            <h2><span class="mw-headline" id="Applications">Applications</span></h2>
            <p><a href="/wiki/After">a</a></p>
            <div class="mw-heading mw-heading2"><h2 id="Notes_and_references">Notes and references</h2></div>
            <p><a href="/wiki/Note_link">n</a></p>"#,
        );
        let region = content_region(&doc).unwrap();
        let links = with_ctx(|ctx| extract_content_links(region, ctx));

        assert_eq!(links, vec![link("/wiki/Before"), link("/wiki/After")]);
    }
}
