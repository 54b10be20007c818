use crate::analyzer::structure::{
    child_elements, clean_text, heading, select_first, structural_role, StructuralRole,
};
use crate::analyzer::Section;
use scraper::{ElementRef, Html};

/// Extracts the page title
///
/// The primary heading wins; otherwise the `<title>` element is used with
/// `suffix` (" - Wikipedia") stripped from its end.
pub fn extract_title(document: &Html, suffix: &str) -> Option<String> {
    let root = document.root_element();

    if let Some(h1) = select_first(root, "h1#firstHeading") {
        let text = clean_text(h1);
        if !text.is_empty() {
            return Some(text);
        }
    }

    let title = select_first(root, "title").map(clean_text)?;
    let title = title.strip_suffix(suffix).unwrap_or(&title).trim();

    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Collects the paragraphs before the first structural break
///
/// Walks the top-level blocks of the content region. Paragraphs accumulate;
/// a table of contents or a heading ends the introduction; an info box is
/// stepped over. Any other block ends the introduction once at least one
/// paragraph has been seen.
pub fn extract_introduction(region: ElementRef) -> String {
    let mut paragraphs: Vec<String> = Vec::new();

    for block in child_elements(region) {
        let role = structural_role(&block);

        if role == Some(StructuralRole::TableOfContents) || heading(&block).is_some() {
            break;
        }

        match block.value().name() {
            "p" => {
                let text = clean_text(block);
                if !text.is_empty() {
                    paragraphs.push(text);
                }
            }
            _ if role == Some(StructuralRole::InfoBox) => continue,
            _ if !paragraphs.is_empty() => break,
            _ => {}
        }
    }

    paragraphs.join("\n\n")
}

/// How one top-level block affects the section being collected
enum Block {
    Heading { text: String, opens: bool },
    Text(String),
    Boundary,
    Ignored,
}

fn classify_block(block: ElementRef) -> Block {
    if let Some(h) = heading(&block) {
        if h.level < 2 {
            return Block::Ignored;
        }
        let opens = !h.text.is_empty() && !h.is_titled("contents") && !h.is_excluded();
        return Block::Heading {
            text: h.text,
            opens,
        };
    }

    let role = structural_role(&block);

    match block.value().name() {
        "p" => {
            let text = clean_text(block);
            if text.is_empty() {
                Block::Ignored
            } else {
                Block::Text(text)
            }
        }
        "ul" | "ol" if role.is_none() => {
            let items: Vec<String> = child_elements(block)
                .filter(|li| li.value().name() == "li")
                .map(clean_text)
                .filter(|text| !text.is_empty())
                .map(|text| format!("* {}", text))
                .collect();
            if items.is_empty() {
                Block::Ignored
            } else {
                Block::Text(items.join("\n"))
            }
        }
        "table" if role != Some(StructuralRole::InfoBox) => Block::Boundary,
        _ if role.is_some_and(|r| r.ends_section()) => Block::Boundary,
        _ => Block::Ignored,
    }
}

/// Builds the ordered list of labeled sections
///
/// Each heading (level 2 and below) closes the section being collected.
/// Excluded headings ("References", "See also", ...) and "Contents" open
/// nothing; navigation and metadata blocks and non-info-box tables close the
/// current section. Sections without content are dropped.
pub fn extract_sections(region: ElementRef) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for block in child_elements(region) {
        match classify_block(block) {
            Block::Heading { text, opens } => {
                close_section(&mut current, &mut sections);
                if opens {
                    current = Some((text, Vec::new()));
                }
            }
            Block::Text(text) => {
                if let Some((_, content)) = current.as_mut() {
                    content.push(text);
                }
            }
            Block::Boundary => close_section(&mut current, &mut sections),
            Block::Ignored => {}
        }
    }

    close_section(&mut current, &mut sections);
    sections
}

fn close_section(current: &mut Option<(String, Vec<String>)>, sections: &mut Vec<Section>) {
    if let Some((heading, content)) = current.take() {
        if !content.is_empty() {
            sections.push(Section {
                heading,
                content: content.join("\n\n"),
            });
        }
    }
}
