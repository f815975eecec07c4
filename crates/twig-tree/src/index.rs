//! Id lookup tables for one input tree.
//!
//! [`NodeIndex`] is built once per tree by a parent-first, depth-first walk.
//! Later stages never walk the caller's tree from the root again; they go
//! through the index.

use std::collections::HashMap;

use tracing::debug;

use crate::adapter::TreeAdapter;
use crate::error::{DiffError, DiffResult, TreeSide};

/// Everything the engine needs to know about one indexed node.
#[derive(Debug)]
pub struct IndexedNode<'n, N, Id> {
    /// The caller's node.
    pub node: &'n N,
    /// Id of the parent, `None` for the root.
    pub parent: Option<Id>,
    /// Position among the parent's children.
    pub position: usize,
}

/// `id -> node` and `id -> parent id` lookups for a single tree.
#[derive(Debug)]
pub struct NodeIndex<'n, N, Id> {
    side: TreeSide,
    root: Id,
    entries: HashMap<Id, IndexedNode<'n, N, Id>>,
    /// Ids in parent-first visiting order.
    order: Vec<Id>,
}

/// A node waiting to be visited, with what its parent already knows about it.
struct Pending<'n, N, Id> {
    node: &'n N,
    id: Id,
    parent: Option<Id>,
    position: usize,
}

impl<'n, N, Id> NodeIndex<'n, N, Id>
where
    Id: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    /// Index the tree under `root`.
    ///
    /// Fails with [`DiffError::Configuration`] if a node has no id and with
    /// [`DiffError::DuplicateId`] if an id repeats.
    pub fn build<A>(root: &'n N, adapter: &A, side: TreeSide) -> DiffResult<Self>
    where
        A: TreeAdapter<N, Id = Id> + ?Sized,
    {
        let root_id = adapter.node_id(root).ok_or_else(|| DiffError::Configuration {
            side,
            location: "root".to_string(),
        })?;

        let mut index = Self {
            side,
            root: root_id.clone(),
            entries: HashMap::new(),
            order: Vec::new(),
        };

        let mut stack = vec![Pending {
            node: root,
            id: root_id,
            parent: None,
            position: 0,
        }];

        while let Some(pending) = stack.pop() {
            let children = adapter.children(pending.node);
            let mut child_ids = Vec::with_capacity(children.len());
            for (pos, child) in children.iter().enumerate() {
                let id = adapter.node_id(child).ok_or_else(|| DiffError::Configuration {
                    side,
                    location: format!("child {pos} of {:?}", pending.id),
                })?;
                child_ids.push(id);
            }

            index.insert(pending.id.clone(), IndexedNode {
                node: pending.node,
                parent: pending.parent,
                position: pending.position,
            })?;

            // Reverse so the first child is visited next.
            for (pos, (child, id)) in children.into_iter().zip(child_ids).enumerate().rev() {
                stack.push(Pending {
                    node: child,
                    id,
                    parent: Some(pending.id.clone()),
                    position: pos,
                });
            }
        }

        debug!(%side, nodes = index.len(), "node index built");
        Ok(index)
    }

    fn insert(&mut self, id: Id, entry: IndexedNode<'n, N, Id>) -> DiffResult<()> {
        if self.entries.contains_key(&id) {
            return Err(DiffError::DuplicateId {
                side: self.side,
                id: format!("{id:?}"),
            });
        }
        self.order.push(id.clone());
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Which tree this index covers.
    pub fn side(&self) -> TreeSide {
        self.side
    }

    /// Id of the root node.
    pub fn root_id(&self) -> &Id {
        &self.root
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: an index holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` occurs in this tree.
    pub fn contains(&self, id: &Id) -> bool {
        self.entries.contains_key(id)
    }

    /// The full entry for `id`.
    pub fn entry(&self, id: &Id) -> Option<&IndexedNode<'n, N, Id>> {
        self.entries.get(id)
    }

    /// The caller's node for `id`.
    pub fn node(&self, id: &Id) -> Option<&'n N> {
        self.entries.get(id).map(|e| e.node)
    }

    /// The parent id of `id`; `None` for the root or an unknown id.
    pub fn parent_id(&self, id: &Id) -> Option<&Id> {
        self.entries.get(id).and_then(|e| e.parent.as_ref())
    }

    /// Like [`node`](Self::node), but an unknown id is an internal error.
    pub(crate) fn require(&self, id: &Id) -> DiffResult<&'n N> {
        self.node(id).ok_or_else(|| {
            DiffError::InternalInvariant(format!("{} tree has no node {id:?}", self.side))
        })
    }

    /// Ids in parent-first order.
    pub fn ids(&self) -> impl Iterator<Item = &Id> + '_ {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{leaf, node, TestAdapter};

    #[test]
    fn indexes_parents_and_positions() {
        let tree = node("root", vec![node("a", vec![leaf("a1"), leaf("a2")]), leaf("b")]);
        let index = NodeIndex::build(&tree, &TestAdapter, TreeSide::Old).unwrap();

        assert_eq!(index.len(), 5);
        assert_eq!(index.root_id(), &"root");
        assert_eq!(index.parent_id(&"a2"), Some(&"a"));
        assert_eq!(index.parent_id(&"root"), None);

        let a2 = index.entry(&"a2").unwrap();
        assert_eq!(a2.position, 1);
        assert_eq!(a2.parent, Some("a"));
        assert_eq!(index.entry(&"a").unwrap().position, 0);
        assert_eq!(index.entry(&"b").unwrap().position, 1);
    }

    #[test]
    fn visits_parent_first() {
        let tree = node("root", vec![node("a", vec![leaf("a1")]), leaf("b")]);
        let index = NodeIndex::build(&tree, &TestAdapter, TreeSide::New).unwrap();
        let order: Vec<_> = index.ids().copied().collect();
        assert_eq!(order, ["root", "a", "a1", "b"]);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let tree = node("root", vec![node("a", vec![leaf("x")]), leaf("x")]);
        let err = NodeIndex::build(&tree, &TestAdapter, TreeSide::New).unwrap_err();
        match err {
            DiffError::DuplicateId { side, id } => {
                assert_eq!(side, TreeSide::New);
                assert_eq!(id, "\"x\"");
            }
            other => panic!("expected DuplicateId, got {other:?}"),
        }
    }

    #[test]
    fn missing_id_is_a_configuration_error() {
        let tree = node("root", vec![leaf("a"), leaf("")]);
        let err = NodeIndex::build(&tree, &TestAdapter, TreeSide::Old).unwrap_err();
        assert!(matches!(
            err,
            DiffError::Configuration { side: TreeSide::Old, ref location } if location == "child 1 of \"root\""
        ));
    }
}
