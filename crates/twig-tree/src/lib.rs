//! Tree reconciliation for Twig.
//!
//! Diffs two ordered trees whose nodes carry stable ids and produces an
//! annotated edit tree plus a flat list of operations that turns the old
//! tree into the new one. Children are matched per parent with the
//! sequence engine from `twig-seq`; ids that leave one place and reappear
//! in another become moves.
//!
//! # Key Types
//!
//! - [`TreeAdapter`] -- How the engine reads a caller's node type
//! - [`TreeDiff`] / [`DiffOptions`] -- A cached diff session
//! - [`EditTree`] / [`EditNode`] / [`EditKind`] -- The annotated edit tree
//! - [`Operation`] / [`OperationSummary`] -- The replayable operation list
//! - [`NodeIndex`] -- Id lookup over one input tree

pub mod adapter;
mod builder;
pub mod edit_tree;
pub mod emit;
pub mod error;
mod flags;
pub mod index;
mod materialize;
mod moves;
pub mod operation;
pub mod session;

#[cfg(test)]
mod testutil;

pub use adapter::TreeAdapter;
pub use edit_tree::{EditKind, EditNode, EditNodeId, EditTree, EditType, Visit};
pub use emit::OperationEmitter;
pub use error::{DiffError, DiffResult, TreeSide};
pub use index::{IndexedNode, NodeIndex};
pub use operation::{Operation, OperationSummary};
pub use session::{diff_trees, DiffOptions, TreeDiff};
