//! State module for tracking traversal progress
//!
//! # Components
//!
//! - `NodeState`: lifecycle of a single sitemap node (pending, fetching, parsed, failed)
//! - `VisitedSet`: per-traversal registry of sitemap URLs already claimed

mod node_state;
mod visited;

// Re-export main types
pub use node_state::NodeState;
pub use visited::VisitedSet;
