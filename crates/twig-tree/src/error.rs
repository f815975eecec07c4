//! Error types for tree reconciliation.

use std::fmt;

use serde::{Deserialize, Serialize};
use twig_seq::SeqError;

/// Which of the two input trees an error or index refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeSide {
    /// The tree being diffed from.
    Old,
    /// The tree being diffed to.
    New,
}

impl fmt::Display for TreeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSide::Old => f.write_str("old"),
            TreeSide::New => f.write_str("new"),
        }
    }
}

/// Errors that abort a diff. None of them leave a partial result behind.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The adapter returned no id (or an empty one) for a node.
    #[error("{side} tree: node at {location} has no id")]
    Configuration {
        /// The tree containing the node.
        side: TreeSide,
        /// Where the node sits, e.g. `root` or `child 2 of "list"`.
        location: String,
    },

    /// Two nodes in the same tree share an id.
    #[error("{side} tree: duplicate node id {id}")]
    DuplicateId {
        /// The tree containing the duplicate.
        side: TreeSide,
        /// The repeated id, in its `Debug` form.
        id: String,
    },

    /// The old and new roots carry different ids.
    #[error("root ids differ: old {old}, new {new}")]
    RootMismatch {
        /// Old root id, in its `Debug` form.
        old: String,
        /// New root id, in its `Debug` form.
        new: String,
    },

    /// The engine reached a state that correct inputs cannot produce.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    /// The sequence engine failed while diffing a child list.
    #[error("sequence diff failed: {0}")]
    Sequence(#[from] SeqError),
}

/// Convenience alias for tree diff results.
pub type DiffResult<T> = Result<T, DiffError>;
