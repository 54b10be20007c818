/// Link state definitions for tracking crawl progress
///
/// Every discovered link moves through `Queued` to one of the terminal
/// states; a link is never retried within a session.
use std::fmt;

/// Represents the current state of a link in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkState {
    // ===== Active States =====
    /// Link is waiting in the frontier
    Queued,

    /// Page was fetched and analyzed; expansion has not run yet
    Analyzed,

    // ===== Terminal States =====
    /// Link points to a non-document resource or was already completed
    Filtered,

    /// Page could not be fetched or analyzed
    FetchFailed,

    /// Page was analyzed and its expansion set computed (possibly empty)
    Expanded,
}

impl LinkState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filtered | Self::FetchFailed | Self::Expanded)
    }

    /// Returns true if the page behind this link made it into the database
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Analyzed | Self::Expanded)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: LinkState) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Filtered)
                | (Self::Queued, Self::FetchFailed)
                | (Self::Queued, Self::Analyzed)
                | (Self::Analyzed, Self::Expanded)
        )
    }

    /// Short lowercase name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Analyzed => "analyzed",
            Self::Filtered => "filtered",
            Self::FetchFailed => "fetch_failed",
            Self::Expanded => "expanded",
        }
    }

    /// Returns all possible link states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::Analyzed,
            Self::Filtered,
            Self::FetchFailed,
            Self::Expanded,
        ]
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
