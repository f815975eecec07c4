//! Flattening the edit tree into an ordered operation list.
//!
//! Two parent-first passes over the finished edit tree: the structural pass
//! emits adds, removes, moves and replaces; the property pass then emits
//! property changes. Consumers apply the list in order.

use tracing::{debug, warn};

use crate::adapter::TreeAdapter;
use crate::edit_tree::{EditKind, EditNode, EditNodeId, EditTree};
use crate::error::{DiffError, DiffResult};
use crate::index::NodeIndex;
use crate::operation::Operation;

/// Emits the operations for one finished edit tree.
pub struct OperationEmitter<'a, 'n, N, A: TreeAdapter<N>> {
    tree: &'a EditTree<A::Id>,
    adapter: &'a A,
    old: &'a NodeIndex<'n, N, A::Id>,
    new: &'a NodeIndex<'n, N, A::Id>,
    /// Parent and child position of every edit node, by arena index.
    placements: Vec<(Option<EditNodeId>, usize)>,
    suppress_unmoved: bool,
}

impl<'a, 'n, N, A: TreeAdapter<N>> OperationEmitter<'a, 'n, N, A> {
    pub fn new(
        tree: &'a EditTree<A::Id>,
        adapter: &'a A,
        old: &'a NodeIndex<'n, N, A::Id>,
        new: &'a NodeIndex<'n, N, A::Id>,
    ) -> Self {
        let mut placements = vec![(None, 0); tree.len()];
        for parent in tree.iter() {
            for (index, child) in parent.children.iter().enumerate() {
                placements[child.index()] = (Some(parent.id), index);
            }
        }
        Self {
            tree,
            adapter,
            old,
            new,
            placements,
            suppress_unmoved: true,
        }
    }

    /// Whether to drop moves whose parent and preceding sibling are unchanged.
    pub fn suppress_unmoved(mut self, suppress: bool) -> Self {
        self.suppress_unmoved = suppress;
        self
    }

    /// Run both passes.
    pub fn emit(&self) -> DiffResult<Vec<Operation<A::Id, A::Detail>>> {
        let mut ops = Vec::new();
        self.structural_pass(&mut ops)?;
        let structural = ops.len();
        self.property_pass(&mut ops)?;
        debug!(
            structural,
            property = ops.len() - structural,
            "operations emitted"
        );
        Ok(ops)
    }

    fn structural_pass(&self, ops: &mut Vec<Operation<A::Id, A::Detail>>) -> DiffResult<()> {
        // (node, parent, index under parent)
        let mut stack: Vec<(EditNodeId, Option<EditNodeId>, usize)> = vec![(EditNodeId::ROOT, None, 0)];

        while let Some((id, parent, index)) = stack.pop() {
            let node = self.node(id)?;
            match node.kind {
                EditKind::Add => ops.push(Operation::Add {
                    node_id: self.new_id(node)?,
                    parent_node_id: self.parent_new_id(parent)?,
                    pre_node_id: self.pre_node_id(parent, index)?,
                }),
                EditKind::Remove => {
                    // The branch goes with its root.
                    ops.push(Operation::Remove {
                        node_id: self.old_id(node)?,
                    });
                    continue;
                }
                EditKind::MoveTarget => {
                    let node_id = self.new_id(node)?;
                    if self.suppress_unmoved && self.kept_relative_position(&node_id, parent, index)? {
                        debug!(?node_id, "move suppressed, relative position unchanged");
                    } else {
                        ops.push(Operation::Move {
                            node_id,
                            parent_node_id: self.parent_new_id(parent)?,
                            pre_node_id: self.pre_node_id(parent, index)?,
                        });
                    }
                }
                EditKind::Replace => ops.push(Operation::Replace {
                    source_node_id: self.old_id(node)?,
                    target_node_id: self.new_id(node)?,
                }),
                EditKind::Reserve | EditKind::MoveSource => {}
            }

            for (child_index, child) in node.children.iter().enumerate().rev() {
                stack.push((*child, Some(id), child_index));
            }
        }
        Ok(())
    }

    fn property_pass(&self, ops: &mut Vec<Operation<A::Id, A::Detail>>) -> DiffResult<()> {
        for visit in self.tree.pre_order() {
            let node = self.node(visit.node)?;
            if !node.is_property_changed
                || !matches!(node.kind, EditKind::Reserve | EditKind::MoveTarget)
            {
                continue;
            }
            let old_id = self.old_id(node)?;
            let new_id = self.new_id(node)?;
            let detail = self
                .adapter
                .property_modify_detail(self.old.require(&old_id)?, self.new.require(&new_id)?);
            match detail {
                Some(detail) => ops.push(Operation::ModifyProperty {
                    node_id: new_id,
                    detail,
                }),
                None => warn!(
                    ?new_id,
                    "node flagged as changed but the adapter returned no detail"
                ),
            }
        }
        Ok(())
    }

    /// New id of the nearest earlier sibling that exists in the new tree.
    fn pre_node_id(&self, parent: Option<EditNodeId>, index: usize) -> DiffResult<Option<A::Id>> {
        let Some(parent) = parent else {
            return Ok(None);
        };
        let siblings = &self.node(parent)?.children[..index];
        for sibling in siblings.iter().rev() {
            let sibling = self.node(*sibling)?;
            if sibling.kind.survives() {
                return self.new_id(sibling).map(Some);
            }
        }
        Ok(None)
    }

    /// A moved node has not really moved when its parent and its nearest
    /// surviving preceding sibling are the same at the source and at the
    /// target.
    fn kept_relative_position(
        &self,
        id: &A::Id,
        target_parent: Option<EditNodeId>,
        target_index: usize,
    ) -> DiffResult<bool> {
        if self.old.parent_id(id) != self.new.parent_id(id) {
            return Ok(false);
        }
        let source = self.tree.by_old_id(id).ok_or_else(|| {
            DiffError::InternalInvariant(format!("moved node {id:?} has no source"))
        })?;
        let (source_parent, source_index) = self.placement(source.id)?;
        Ok(self.pre_node_id(source_parent, source_index)?
            == self.pre_node_id(target_parent, target_index)?)
    }

    fn placement(&self, id: EditNodeId) -> DiffResult<(Option<EditNodeId>, usize)> {
        self.placements
            .get(id.index())
            .copied()
            .ok_or_else(|| DiffError::InternalInvariant(format!("edit node {id} does not exist")))
    }

    fn node(&self, id: EditNodeId) -> DiffResult<&'a EditNode<A::Id>> {
        self.tree
            .get(id)
            .ok_or_else(|| DiffError::InternalInvariant(format!("edit node {id} does not exist")))
    }

    fn parent_new_id(&self, parent: Option<EditNodeId>) -> DiffResult<A::Id> {
        let parent = parent.ok_or_else(|| {
            DiffError::InternalInvariant("the edit tree root cannot be inserted or moved".into())
        })?;
        self.new_id(self.node(parent)?)
    }

    fn old_id(&self, node: &EditNode<A::Id>) -> DiffResult<A::Id> {
        node.old_id.clone().ok_or_else(|| {
            DiffError::InternalInvariant(format!("edit node {} has no old tree id", node.id))
        })
    }

    fn new_id(&self, node: &EditNode<A::Id>) -> DiffResult<A::Id> {
        node.new_id.clone().ok_or_else(|| {
            DiffError::InternalInvariant(format!("edit node {} has no new tree id", node.id))
        })
    }
}
