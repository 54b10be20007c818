//! Structural roles of content regions
//!
//! Encyclopedia markup wraps boilerplate (navigation boxes, citations, tables
//! of contents, info boxes, ...) in regions recognisable by element name and
//! class. Each such region is mapped to a [`StructuralRole`]; extraction
//! rules are then expressed over roles instead of over class names.

use scraper::{ElementRef, Selector};

/// Headings whose sections are never emitted and whose regions never
/// contribute content links
pub const EXCLUDED_SECTIONS: &[&str] = &[
    "references",
    "external links",
    "see also",
    "notes",
    "further reading",
    "bibliography",
    "sources",
    "citations",
    "gallery",
];

/// Non-article structural region of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralRole {
    /// Navigation boxes and sidebars
    Navigation,
    /// Maintenance and sister-project boxes
    Metadata,
    /// Reference lists
    References,
    /// Inline citation markers and back-links
    Citation,
    /// Table of contents
    TableOfContents,
    /// Summary box beside the introduction
    InfoBox,
    /// Image thumbnails floated beside the prose
    Thumbnail,
    /// Image galleries
    Gallery,
    /// "[edit]" markers inside headings
    EditSection,
    /// Sortable data tables
    DataTable,
}

impl StructuralRole {
    /// Returns true if this region closes the section being collected
    pub fn ends_section(&self) -> bool {
        !matches!(
            self,
            Self::InfoBox | Self::Thumbnail | Self::Citation | Self::EditSection
        )
    }

    /// Returns true if this region is skipped while collecting "see also" lists
    pub fn skipped_in_related(&self) -> bool {
        matches!(
            self,
            Self::Navigation | Self::Metadata | Self::TableOfContents
        )
    }

    /// Returns true if the text of this region is left out of prose
    pub fn is_inline_noise(&self) -> bool {
        matches!(self, Self::Citation | Self::EditSection)
    }
}

/// Determines the structural role of an element, if it has one
pub fn structural_role(element: &ElementRef) -> Option<StructuralRole> {
    let value = element.value();

    if value.id() == Some("toc") {
        return Some(StructuralRole::TableOfContents);
    }

    let has = |class: &str| has_class(element, class);

    match value.name() {
        "div" | "nav" | "ul" | "ol" => {
            if has("navbox") || has("vertical-navbox") {
                Some(StructuralRole::Navigation)
            } else if has("metadata") || has("sistersitebox") || has("noprint") {
                Some(StructuralRole::Metadata)
            } else if has("reflist") || has("mw-references") || has("references") {
                Some(StructuralRole::References)
            } else if has("toc") {
                Some(StructuralRole::TableOfContents)
            } else if has("infobox") {
                Some(StructuralRole::InfoBox)
            } else if has("thumb") {
                Some(StructuralRole::Thumbnail)
            } else if has("gallery") {
                Some(StructuralRole::Gallery)
            } else {
                None
            }
        }
        "span" => {
            if has("mw-editsection") || has("mw-editsection-bracket") {
                Some(StructuralRole::EditSection)
            } else if has("mw-cite-backlink") {
                Some(StructuralRole::Citation)
            } else {
                None
            }
        }
        "sup" => {
            if has("reference") {
                Some(StructuralRole::Citation)
            } else if has("noprint") {
                Some(StructuralRole::Metadata)
            } else {
                None
            }
        }
        "table" => {
            if has("infobox") {
                Some(StructuralRole::InfoBox)
            } else if has("sidebar") || has("toccolours") || has("nowraplinks") {
                Some(StructuralRole::Navigation)
            } else if has("wikitable") {
                Some(StructuralRole::DataTable)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// A section heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,
    /// Heading text without edit markers
    pub text: String,
    /// Anchor id of the heading, if any
    pub id: Option<String>,
}

impl Heading {
    /// Returns true if this heading opens a section that is never emitted
    pub fn is_excluded(&self) -> bool {
        let text = self.text.to_lowercase();
        EXCLUDED_SECTIONS.contains(&text.as_str())
    }

    /// Returns true if this heading names an excluded section anywhere in its
    /// text ("Notes and references")
    pub fn mentions_excluded(&self) -> bool {
        let text = self.text.to_lowercase();
        EXCLUDED_SECTIONS.iter().any(|section| text.contains(section))
    }

    /// Case-insensitive comparison of the heading text
    pub fn is_titled(&self, title: &str) -> bool {
        self.text.eq_ignore_ascii_case(title)
    }
}

/// Reads a heading from either `<hN>` or the `<div class="mw-heading">`
/// wrapper used by current markup
pub fn heading(element: &ElementRef) -> Option<Heading> {
    let name = element.value().name();

    if let Some(level) = heading_level(name) {
        return Some(read_heading(*element, level));
    }

    if name == "div" && has_class(element, "mw-heading") {
        return child_elements(*element).find_map(|child| {
            heading_level(child.value().name()).map(|level| read_heading(child, level))
        });
    }

    None
}

/// Returns the element whose siblings follow the heading: the `mw-heading`
/// wrapper when present, the heading itself otherwise
pub fn heading_block<'a>(heading_element: ElementRef<'a>) -> ElementRef<'a> {
    heading_element
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| parent.value().name() == "div" && has_class(parent, "mw-heading"))
        .unwrap_or(heading_element)
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn read_heading(element: ElementRef, level: u8) -> Heading {
    let headline = select_first(element, "span.mw-headline");

    let text = match headline {
        Some(span) => clean_text(span),
        None => clean_text(element),
    };

    let id = element
        .value()
        .id()
        .or_else(|| headline.and_then(|span| span.value().id()))
        .map(str::to_string);

    Heading { level, text, id }
}

/// Text content with whitespace collapsed and citation/edit markers removed
pub fn clean_text(element: ElementRef) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if name == "style" || name == "script" {
                continue;
            }
            if structural_role(&child).is_some_and(|role| role.is_inline_noise()) {
                continue;
            }
            collect_text(child, out);
        }
    }
}

/// Direct element children
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Following element siblings
pub fn next_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.next_siblings().filter_map(ElementRef::wrap)
}

pub fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// First descendant matching a CSS selector
pub fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    let found = root.select(&selector).next();
    found
}

/// All descendants matching a CSS selector
pub fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => root.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}
