use crate::analyzer::{ExternalLink, PageAnalysis, Section};
use crate::link::NormalizedLink;
use crate::state::LinkState;
use std::collections::{HashMap, HashSet, VecDeque};

/// What the digest knows about one analyzed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub title: String,
    pub introduction: String,
    pub sections: Vec<Section>,
    /// Sorted "see also" links
    pub related_links: Vec<NormalizedLink>,
    /// Only recorded for the seed page
    pub external_links: Vec<ExternalLink>,
}

impl PageRecord {
    /// Builds the record kept for an analyzed page
    pub fn from_analysis(analysis: &PageAnalysis) -> Self {
        Self {
            title: analysis.title.clone(),
            introduction: analysis.introduction.clone(),
            sections: analysis.sections.clone(),
            related_links: analysis.related.links.clone(),
            external_links: analysis.external_links.clone(),
        }
    }
}

/// Session database: page records keyed by lowercase title
///
/// Two links leading to pages with the same title share one entry; the page
/// analyzed last wins.
#[derive(Debug, Clone, Default)]
pub struct PageDatabase {
    records: HashMap<String, PageRecord>,
}

impl PageDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record under its lowercase title
    pub fn insert(&mut self, record: PageRecord) {
        self.records.insert(record.title.to_lowercase(), record);
    }

    /// Looks up a record by title, ignoring case
    pub fn get(&self, title: &str) -> Option<&PageRecord> {
        self.records.get(&title.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Mutable state of one crawl invocation
///
/// Created for a single seed and consumed when the crawl finishes; nothing
/// in here outlives the invocation.
#[derive(Debug, Clone)]
pub struct CrawlState {
    seed: NormalizedLink,
    frontier: VecDeque<NormalizedLink>,
    in_frontier: HashSet<NormalizedLink>,
    completed: HashSet<NormalizedLink>,
    depths: HashMap<NormalizedLink, u32>,
    parents: HashMap<NormalizedLink, NormalizedLink>,
    edges: Vec<(NormalizedLink, NormalizedLink)>,
    titles: HashMap<NormalizedLink, String>,
    states: HashMap<NormalizedLink, LinkState>,
    database: PageDatabase,
}

impl CrawlState {
    /// Creates the state for a crawl starting at `seed` (depth 0)
    pub fn new(seed: NormalizedLink) -> Self {
        let mut state = Self {
            seed: seed.clone(),
            frontier: VecDeque::new(),
            in_frontier: HashSet::new(),
            completed: HashSet::new(),
            depths: HashMap::new(),
            parents: HashMap::new(),
            edges: Vec::new(),
            titles: HashMap::new(),
            states: HashMap::new(),
            database: PageDatabase::new(),
        };
        state.depths.insert(seed.clone(), 0);
        state.enqueue(seed);
        state
    }

    fn enqueue(&mut self, link: NormalizedLink) {
        if self.in_frontier.insert(link.clone()) {
            self.states.insert(link.clone(), LinkState::Queued);
            self.frontier.push_back(link);
        }
    }

    /// Pops the front of the frontier together with its discovery depth
    pub fn next_link(&mut self) -> Option<(NormalizedLink, u32)> {
        let link = self.frontier.pop_front()?;
        self.in_frontier.remove(&link);
        let depth = self.depths.get(&link).copied().unwrap_or(0);
        Some((link, depth))
    }

    /// Appends the edge from the recorded parent to `link`
    ///
    /// Called when `link` is taken up for fetching, not when it was
    /// discovered. The seed never gets an incoming edge. Returns true if an
    /// edge was appended.
    pub fn record_edge(&mut self, link: &NormalizedLink) -> bool {
        if link == &self.seed {
            return false;
        }
        match self.parents.get(link) {
            Some(parent) => {
                self.edges.push((parent.clone(), link.clone()));
                true
            }
            None => false,
        }
    }

    /// Stores the record of an analyzed page and marks its link completed
    pub fn record_page(&mut self, link: &NormalizedLink, record: PageRecord) {
        self.titles.insert(link.clone(), record.title.clone());
        self.database.insert(record);
        self.completed.insert(link.clone());
        self.transition(link, LinkState::Analyzed);
    }

    /// Registers a link found while expanding `parent`
    ///
    /// Links that already have a depth or were completed are left alone; the
    /// first parent to discover a link keeps it. Returns true if the link was
    /// newly discovered.
    pub fn discover(&mut self, link: &NormalizedLink, parent: &NormalizedLink, depth: u32) -> bool {
        if self.depths.contains_key(link) || self.completed.contains(link) {
            return false;
        }
        self.depths.insert(link.clone(), depth);
        self.parents
            .entry(link.clone())
            .or_insert_with(|| parent.clone());
        self.enqueue(link.clone());
        true
    }

    /// Moves a link to its next state
    ///
    /// Illegal transitions are ignored and reported as false.
    pub fn transition(&mut self, link: &NormalizedLink, next: LinkState) -> bool {
        let current = self.states.get(link).copied().unwrap_or(LinkState::Queued);
        if !current.can_transition_to(next) {
            tracing::warn!(
                "Ignoring transition {} -> {} for {}",
                current,
                next,
                link
            );
            return false;
        }
        self.states.insert(link.clone(), next);
        true
    }

    pub fn is_completed(&self, link: &NormalizedLink) -> bool {
        self.completed.contains(link)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn depth_of(&self, link: &NormalizedLink) -> Option<u32> {
        self.depths.get(link).copied()
    }

    pub fn parent_of(&self, link: &NormalizedLink) -> Option<&NormalizedLink> {
        self.parents.get(link)
    }

    pub fn state_of(&self, link: &NormalizedLink) -> Option<LinkState> {
        self.states.get(link).copied()
    }

    pub fn states(&self) -> &HashMap<NormalizedLink, LinkState> {
        &self.states
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn edges(&self) -> &[(NormalizedLink, NormalizedLink)] {
        &self.edges
    }

    pub fn title_of(&self, link: &NormalizedLink) -> Option<&str> {
        self.titles.get(link).map(String::as_str)
    }

    pub fn database(&self) -> &PageDatabase {
        &self.database
    }

    /// Splits the finished state into edges, titles and database
    pub fn into_parts(
        self,
    ) -> (
        Vec<(NormalizedLink, NormalizedLink)>,
        HashMap<NormalizedLink, String>,
        PageDatabase,
    ) {
        (self.edges, self.titles, self.database)
    }
}
