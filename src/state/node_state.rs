/// Sitemap node state definitions
///
/// Every sitemap URL handed to the traversal engine moves through
/// `Pending -> Fetching -> (ParsedLeaf | ParsedIndex | Failed)`.
use crate::{Result, ScoutError};
use std::fmt;

/// Represents the current state of a sitemap node in a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    // ===== Active States =====
    /// Claimed in the visited set, waiting for a fetch slot
    Pending,

    /// Fetch in flight
    Fetching,

    // ===== Terminal States =====
    /// Parsed as a `<urlset>`; its locs became page entries
    ParsedLeaf,

    /// Parsed as a `<sitemapindex>`; its locs became child nodes
    ParsedIndex,

    /// Fetch, decompression, or XML parsing failed
    Failed,
}

impl NodeState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Fetching)
    }

    /// Returns true if the node parsed successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::ParsedLeaf | Self::ParsedIndex)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: NodeState) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Pending, Self::Failed)
                | (Self::Fetching, Self::ParsedLeaf)
                | (Self::Fetching, Self::ParsedIndex)
                | (Self::Fetching, Self::Failed)
        )
    }

    /// Moves to `next`, rejecting transitions outside the node lifecycle
    pub fn transition(self, next: NodeState) -> Result<NodeState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ScoutError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::ParsedLeaf => "parsed_leaf",
            Self::ParsedIndex => "parsed_index",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
