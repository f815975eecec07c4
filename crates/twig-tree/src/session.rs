//! One diff between one old tree and one new tree.
//!
//! A [`TreeDiff`] builds its edit tree on first request and its operation
//! list on first request, caching both. A session is not `Sync`; share it
//! across threads only behind external synchronization.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapter::TreeAdapter;
use crate::builder::EditTreeBuilder;
use crate::edit_tree::EditTree;
use crate::emit::OperationEmitter;
use crate::error::{DiffError, DiffResult, TreeSide};
use crate::flags::propagate;
use crate::index::NodeIndex;
use crate::materialize::materialize;
use crate::moves::{detect_moves, resolve};
use crate::operation::Operation;

/// Knobs for a diff session. The defaults give the full pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Correlate removed and added ids into moves. When `false`, a
    /// relocated node shows up as a remove plus an add.
    pub detect_moves: bool,
    /// Drop moves whose parent and preceding sibling did not change.
    pub suppress_unmoved: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            detect_moves: true,
            suppress_unmoved: true,
        }
    }
}

impl DiffOptions {
    /// Options that report relocations as remove + add.
    pub fn without_moves() -> Self {
        Self {
            detect_moves: false,
            ..Default::default()
        }
    }
}

struct Built<'n, N, Id: Eq + std::hash::Hash> {
    old: NodeIndex<'n, N, Id>,
    new: NodeIndex<'n, N, Id>,
    tree: EditTree<Id>,
}

/// A diff session over two trees and the adapter describing them.
pub struct TreeDiff<'n, N, A: TreeAdapter<N>> {
    old_root: &'n N,
    new_root: &'n N,
    adapter: A,
    options: DiffOptions,
    built: OnceCell<Built<'n, N, A::Id>>,
    operations: OnceCell<Vec<Operation<A::Id, A::Detail>>>,
}

impl<'n, N, A: TreeAdapter<N>> TreeDiff<'n, N, A> {
    pub fn new(old_root: &'n N, new_root: &'n N, adapter: A) -> Self {
        Self::with_options(old_root, new_root, adapter, DiffOptions::default())
    }

    pub fn with_options(old_root: &'n N, new_root: &'n N, adapter: A, options: DiffOptions) -> Self {
        Self {
            old_root,
            new_root,
            adapter,
            options,
            built: OnceCell::new(),
            operations: OnceCell::new(),
        }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The edit tree, built on first call.
    pub fn edit_tree(&self) -> DiffResult<&EditTree<A::Id>> {
        Ok(&self.built()?.tree)
    }

    /// The operation list, derived from the edit tree on first call.
    pub fn operations(&self) -> DiffResult<&[Operation<A::Id, A::Detail>]> {
        if let Some(ops) = self.operations.get() {
            return Ok(ops);
        }
        let built = self.built()?;
        let ops = OperationEmitter::new(&built.tree, &self.adapter, &built.old, &built.new)
            .suppress_unmoved(self.options.suppress_unmoved)
            .emit()?;
        Ok(self.operations.get_or_init(|| ops))
    }

    /// Consume the session and return its operations.
    pub fn into_operations(self) -> DiffResult<Vec<Operation<A::Id, A::Detail>>> {
        self.operations()?;
        self.operations
            .into_inner()
            .ok_or_else(|| DiffError::InternalInvariant("operations were not cached".into()))
    }

    fn built(&self) -> DiffResult<&Built<'n, N, A::Id>> {
        if let Some(built) = self.built.get() {
            return Ok(built);
        }
        let built = self.build()?;
        Ok(self.built.get_or_init(|| built))
    }

    fn build(&self) -> DiffResult<Built<'n, N, A::Id>> {
        let adapter = &self.adapter;

        // Compare roots before indexing anything.
        let old_root = adapter.node_id(self.old_root).ok_or_else(|| DiffError::Configuration {
            side: TreeSide::Old,
            location: "root".into(),
        })?;
        let new_root = adapter.node_id(self.new_root).ok_or_else(|| DiffError::Configuration {
            side: TreeSide::New,
            location: "root".into(),
        })?;
        if old_root != new_root {
            return Err(DiffError::RootMismatch {
                old: format!("{old_root:?}"),
                new: format!("{new_root:?}"),
            });
        }

        let old = NodeIndex::build(self.old_root, adapter, TreeSide::Old)?;
        let new = NodeIndex::build(self.new_root, adapter, TreeSide::New)?;

        let mut draft = EditTreeBuilder::new(adapter, &old, &new).build()?;
        materialize(&mut draft, adapter, &old, &new)?;
        let moved = if self.options.detect_moves {
            detect_moves(&draft)
        } else {
            Vec::new()
        };
        let mut tree = resolve(draft, moved);
        propagate(&mut tree, adapter, &old, &new)?;

        debug!(
            edit_nodes = tree.len(),
            moved = tree.moved_ids().len(),
            root_changed = tree.root().has_child_changed() || tree.root().is_property_changed(),
            "edit tree ready"
        );
        Ok(Built { old, new, tree })
    }
}

/// Diff two trees in one call.
pub fn diff_trees<N, A>(
    old_root: &N,
    new_root: &N,
    adapter: A,
) -> DiffResult<Vec<Operation<A::Id, A::Detail>>>
where
    A: TreeAdapter<N>,
{
    TreeDiff::new(old_root, new_root, adapter).into_operations()
}
