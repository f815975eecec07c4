//! Breadth-first edit tree construction.
//!
//! The builder pairs the two roots, then repeatedly takes a matched pair off
//! a FIFO worklist, diffs the pair's child lists with the sequence engine
//! and records one provisional node per edit step. Reserve and Replace
//! children go back on the worklist; Remove and Add children stay leaves
//! until [`materialize`](crate::materialize) expands them.
//!
//! Nodes built here are *drafts*: their step is a [`SeqOp`]. They are only
//! given their final [`EditKind`](crate::EditKind) once move detection has
//! run, in [`resolve`](crate::moves::resolve).

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use tracing::{debug, trace};
use twig_seq::{diff_sequences_by, SeqOp};

use crate::adapter::TreeAdapter;
use crate::edit_tree::EditNodeId;
use crate::error::{DiffError, DiffResult, TreeSide};
use crate::index::NodeIndex;

/// A provisional edit node.
#[derive(Clone, Debug)]
pub(crate) struct DraftNode<Id> {
    pub step: SeqOp,
    pub old_id: Option<Id>,
    pub new_id: Option<Id>,
    pub children: Vec<EditNodeId>,
}

/// The edit tree before moves are resolved.
#[derive(Debug)]
pub(crate) struct DraftTree<Id> {
    pub nodes: Vec<DraftNode<Id>>,
    pub by_old: HashMap<Id, EditNodeId>,
    pub by_new: HashMap<Id, EditNodeId>,
    /// Old ids of removed nodes; branch roots until materialized.
    pub removed: Vec<Id>,
    /// New ids of added nodes; branch roots until materialized.
    pub added: Vec<Id>,
}

impl<Id: Clone + Eq + Hash> DraftTree<Id> {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            by_old: HashMap::new(),
            by_new: HashMap::new(),
            removed: Vec::new(),
            added: Vec::new(),
        }
    }

    /// Create a node, register its ids and attach it under `parent`.
    pub fn push(
        &mut self,
        parent: Option<EditNodeId>,
        step: SeqOp,
        old_id: Option<Id>,
        new_id: Option<Id>,
    ) -> EditNodeId {
        let id = EditNodeId(self.nodes.len());
        if let Some(old) = &old_id {
            self.by_old.insert(old.clone(), id);
        }
        if let Some(new) = &new_id {
            self.by_new.insert(new.clone(), id);
        }
        self.nodes.push(DraftNode {
            step,
            old_id,
            new_id,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn lookup(&self, side: TreeSide, id: &Id) -> Option<EditNodeId> {
        match side {
            TreeSide::Old => self.by_old.get(id).copied(),
            TreeSide::New => self.by_new.get(id).copied(),
        }
    }
}

/// Drives the level-by-level expansion of one diff.
pub(crate) struct EditTreeBuilder<'a, 'n, N, A: TreeAdapter<N>> {
    adapter: &'a A,
    old: &'a NodeIndex<'n, N, A::Id>,
    new: &'a NodeIndex<'n, N, A::Id>,
    worklist: VecDeque<EditNodeId>,
    draft: DraftTree<A::Id>,
}

impl<'a, 'n, N, A: TreeAdapter<N>> EditTreeBuilder<'a, 'n, N, A> {
    pub fn new(
        adapter: &'a A,
        old: &'a NodeIndex<'n, N, A::Id>,
        new: &'a NodeIndex<'n, N, A::Id>,
    ) -> Self {
        Self {
            adapter,
            old,
            new,
            worklist: VecDeque::new(),
            draft: DraftTree::new(),
        }
    }

    /// Expand the whole tree. Fails with [`DiffError::RootMismatch`] if the
    /// roots differ.
    pub(crate) fn build(mut self) -> DiffResult<DraftTree<A::Id>> {
        let old_root = self.old.root_id().clone();
        let new_root = self.new.root_id().clone();
        if old_root != new_root {
            return Err(DiffError::RootMismatch {
                old: format!("{old_root:?}"),
                new: format!("{new_root:?}"),
            });
        }

        let root = self
            .draft
            .push(None, SeqOp::Reserve, Some(old_root), Some(new_root));
        self.worklist.push_back(root);

        while let Some(pair) = self.worklist.pop_front() {
            self.expand(pair)?;
        }

        debug!(
            nodes = self.draft.nodes.len(),
            removed_roots = self.draft.removed.len(),
            added_roots = self.draft.added.len(),
            "edit tree expanded"
        );
        Ok(self.draft)
    }

    /// Diff the children of one matched pair and queue its matched children.
    fn expand(&mut self, pair: EditNodeId) -> DiffResult<()> {
        let (old_id, new_id) = {
            let draft = &self.draft.nodes[pair.0];
            match (&draft.old_id, &draft.new_id) {
                (Some(o), Some(n)) => (o.clone(), n.clone()),
                _ => {
                    return Err(DiffError::InternalInvariant(format!(
                        "queued edit node {pair} is not a matched pair"
                    )))
                }
            }
        };
        let adapter = self.adapter;
        let old_children = adapter.children(self.old.require(&old_id)?);
        let new_children = adapter.children(self.new.require(&new_id)?);

        let steps = diff_sequences_by(&old_children, &new_children, |a, b| {
            adapter.same_identity(a, b)
        })?;
        trace!(edit_node = %pair, ?old_id, steps = steps.len(), "expanding pair");

        for step in steps {
            let old_child = step
                .old_element()
                .map(|c| self.child_id(TreeSide::Old, c, &old_id))
                .transpose()?;
            let new_child = step
                .new_element()
                .map(|c| self.child_id(TreeSide::New, c, &new_id))
                .transpose()?;

            let op = step.op();
            let child = self.draft.push(Some(pair), op, old_child.clone(), new_child.clone());
            match op {
                SeqOp::Remove => self.draft.removed.extend(old_child),
                SeqOp::Add => self.draft.added.extend(new_child),
                SeqOp::Reserve | SeqOp::Replace => self.worklist.push_back(child),
            }
        }
        Ok(())
    }

    fn child_id(&self, side: TreeSide, child: &N, parent: &A::Id) -> DiffResult<A::Id> {
        self.adapter
            .node_id(child)
            .ok_or_else(|| DiffError::Configuration {
                side,
                location: format!("a child of {parent:?}"),
            })
    }
}
