//! Topic tree construction
//!
//! The tree is built once, after the crawl, strictly from the recorded
//! parent/child edges.

use crate::link::NormalizedLink;
use std::collections::{HashMap, HashSet};

/// One topic in the digest tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    pub title: String,
    pub link: NormalizedLink,
    /// In edge order
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(title: impl Into<String>, link: NormalizedLink) -> Self {
        Self {
            title: title.into(),
            link,
            children: Vec::new(),
        }
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// Builds the tree rooted at `root` from edges
///
/// Children are appended in edge order. Titles come from `titles`; links
/// without one use their article name with underscores replaced by spaces.
/// A link is placed at most once, so repeated or cyclic edges cannot blow up
/// the tree.
///
/// # Arguments
///
/// * `edges` - (parent, child) pairs in the order they were recorded
/// * `root` - The seed link
/// * `titles` - Last title seen for each fetched link
pub fn build_tree(
    edges: &[(NormalizedLink, NormalizedLink)],
    root: &NormalizedLink,
    titles: &HashMap<NormalizedLink, String>,
) -> ContentNode {
    let mut children: HashMap<&NormalizedLink, Vec<&NormalizedLink>> = HashMap::new();
    for (parent, child) in edges {
        children.entry(parent).or_default().push(child);
    }

    let mut placed = HashSet::new();
    materialize(root, &children, titles, &mut placed)
}

fn materialize<'a>(
    link: &'a NormalizedLink,
    children: &HashMap<&'a NormalizedLink, Vec<&'a NormalizedLink>>,
    titles: &HashMap<NormalizedLink, String>,
    placed: &mut HashSet<&'a NormalizedLink>,
) -> ContentNode {
    placed.insert(link);

    let title = titles
        .get(link)
        .cloned()
        .unwrap_or_else(|| link.display_title());
    let mut node = ContentNode::new(title, link.clone());

    if let Some(kids) = children.get(link) {
        for kid in kids {
            if !placed.contains(*kid) {
                let child = materialize(*kid, children, titles, placed);
                node.children.push(child);
            }
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::normalize_link;

    fn link(name: &str) -> NormalizedLink {
        normalize_link(&format!("/wiki/{}", name), "/wiki/").unwrap()
    }

    fn edge(parent: &str, child: &str) -> (NormalizedLink, NormalizedLink) {
        (link(parent), link(child))
    }

    fn child_links(node: &ContentNode) -> Vec<&str> {
        node.children.iter().map(|c| c.link.as_str()).collect()
    }

    #[test]
    fn test_build_tree_from_edges() {
        let edges = vec![edge("A", "B"), edge("A", "C"), edge("B", "D")];
        let tree = build_tree(&edges, &link("A"), &HashMap::new());

        assert_eq!(child_links(&tree), vec!["/wiki/B", "/wiki/C"]);
        assert_eq!(child_links(&tree.children[0]), vec!["/wiki/D"]);
        assert!(tree.children[1].children.is_empty());

        assert_eq!(tree.descendant_count(), 3);
        assert_eq!(tree.children[0].descendant_count(), 1);
        assert_eq!(tree.children[1].descendant_count(), 0);
    }

    #[test]
    fn test_titles() {
        let mut titles = HashMap::new();
        titles.insert(link("B"), "Bee".to_string());
        let edges = vec![edge("A", "B"), edge("A", "Graph_theory")];
        let tree = build_tree(&edges, &link("A"), &titles);

        assert_eq!(tree.title, "A");
        assert_eq!(tree.children[0].title, "Bee");
        assert_eq!(tree.children[1].title, "Graph theory");
    }

    #[test]
    fn test_root_without_edges() {
        let tree = build_tree(&[], &link("A"), &HashMap::new());
        assert!(tree.children.is_empty());
        assert_eq!(tree.descendant_count(), 0);
    }

    #[test]
    fn test_edges_outside_root_are_ignored() {
        let edges = vec![edge("X", "Y"), edge("A", "B")];
        let tree = build_tree(&edges, &link("A"), &HashMap::new());
        assert_eq!(tree.descendant_count(), 1);
    }

    #[test]
    fn test_cycle_is_cut() {
        let edges = vec![edge("A", "B"), edge("B", "A"), edge("B", "C")];
        let tree = build_tree(&edges, &link("A"), &HashMap::new());

        assert_eq!(child_links(&tree.children[0]), vec!["/wiki/C"]);
        assert_eq!(tree.descendant_count(), 2);
    }
}
