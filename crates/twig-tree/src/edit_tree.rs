//! The derived edit tree.
//!
//! Every node of an [`EditTree`] pairs (at most) one old-tree node with
//! (at most) one new-tree node and records how they relate. Nodes live in
//! an arena; [`EditNodeId`] is the arena index, assigned in creation order
//! with the root at 0.
//!
//! # Invariants
//!
//! - Reserve and Replace nodes carry both ids; Remove and MoveSource nodes
//!   are old-side only in position, Add and MoveTarget new-side only.
//! - Both sides of a move carry the moved id as their old and new id.
//! - The tree is immutable once a session hands it out.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::Serialize;

/// Arena index of an [`EditNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EditNodeId(pub(crate) usize);

impl EditNodeId {
    /// The root of every edit tree.
    pub const ROOT: EditNodeId = EditNodeId(0);

    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EditNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse classification of an edit node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditType {
    Reserve,
    Remove,
    Add,
    Replace,
    Move,
}

/// Final resolved kind of an edit node. Moves are split by side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Matched in both trees.
    Reserve,
    /// Present only in the old tree.
    Remove,
    /// Present only in the new tree.
    Add,
    /// An unmatched old node and new node sharing a position.
    Replace,
    /// The old-tree position of a moved node.
    MoveSource,
    /// The new-tree position of a moved node.
    MoveTarget,
}

impl EditKind {
    /// Project onto [`EditType`].
    pub fn edit_type(self) -> EditType {
        match self {
            EditKind::Reserve => EditType::Reserve,
            EditKind::Remove => EditType::Remove,
            EditKind::Add => EditType::Add,
            EditKind::Replace => EditType::Replace,
            EditKind::MoveSource | EditKind::MoveTarget => EditType::Move,
        }
    }

    /// Whether a node of this kind exists in the new tree at its position.
    pub fn survives(self) -> bool {
        matches!(
            self,
            EditKind::Add | EditKind::Reserve | EditKind::MoveTarget | EditKind::Replace
        )
    }

    /// Whether this kind, on a child, means its parent's child list changed.
    pub fn is_structural_change(self) -> bool {
        !matches!(self, EditKind::Reserve)
    }
}

/// One node of the edit tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditNode<Id> {
    pub(crate) id: EditNodeId,
    pub(crate) kind: EditKind,
    pub(crate) old_id: Option<Id>,
    pub(crate) new_id: Option<Id>,
    pub(crate) is_property_changed: bool,
    pub(crate) has_child_changed: bool,
    pub(crate) children: Vec<EditNodeId>,
}

impl<Id> EditNode<Id> {
    pub fn id(&self) -> EditNodeId {
        self.id
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn edit_type(&self) -> EditType {
        self.kind.edit_type()
    }

    pub fn move_source(&self) -> bool {
        self.kind == EditKind::MoveSource
    }

    pub fn move_target(&self) -> bool {
        self.kind == EditKind::MoveTarget
    }

    /// Id of the paired old-tree node.
    pub fn old_tree_node_id(&self) -> Option<&Id> {
        self.old_id.as_ref()
    }

    /// Id of the paired new-tree node.
    pub fn new_tree_node_id(&self) -> Option<&Id> {
        self.new_id.as_ref()
    }

    /// Whether the paired nodes' properties differ. Only Reserve and move
    /// nodes can be flagged.
    pub fn is_property_changed(&self) -> bool {
        self.is_property_changed
    }

    /// Whether any direct child is a structural change or is itself changed.
    pub fn has_child_changed(&self) -> bool {
        self.has_child_changed
    }

    pub fn children(&self) -> &[EditNodeId] {
        &self.children
    }
}

/// A node reached during a traversal, with its place under its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visit {
    pub node: EditNodeId,
    pub parent: Option<EditNodeId>,
    /// Position among the parent's children; 0 for the root.
    pub index: usize,
}

/// Arena-backed edit tree plus lookups from tree-node ids to edit nodes.
#[derive(Clone, Debug, Serialize)]
pub struct EditTree<Id: Eq + Hash> {
    pub(crate) nodes: Vec<EditNode<Id>>,
    #[serde(skip)]
    pub(crate) by_old: HashMap<Id, EditNodeId>,
    #[serde(skip)]
    pub(crate) by_new: HashMap<Id, EditNodeId>,
    pub(crate) removed: Vec<Id>,
    pub(crate) added: Vec<Id>,
    pub(crate) moved: Vec<Id>,
}

impl<Id: Eq + Hash> EditTree<Id> {
    /// The root node, pairing the two tree roots.
    pub fn root(&self) -> &EditNode<Id> {
        &self.nodes[EditNodeId::ROOT.0]
    }

    pub fn get(&self, id: EditNodeId) -> Option<&EditNode<Id>> {
        self.nodes.get(id.0)
    }

    /// Children of `id`, in order. Unknown ids have none.
    pub fn children(&self, id: EditNodeId) -> impl Iterator<Item = &EditNode<Id>> + '_ {
        self.get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |c| &self.nodes[c.0])
    }

    /// The edit node holding old-tree node `id`. For a moved id this is the move source.
    pub fn by_old_id(&self, id: &Id) -> Option<&EditNode<Id>> {
        self.by_old.get(id).map(|e| &self.nodes[e.0])
    }

    /// The edit node holding new-tree node `id`. For a moved id this is the move target.
    pub fn by_new_id(&self, id: &Id) -> Option<&EditNode<Id>> {
        self.by_new.get(id).map(|e| &self.nodes[e.0])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &EditNode<Id>> + '_ {
        self.nodes.iter()
    }

    /// Every old-tree id under a removed branch, parent before children.
    pub fn removed_ids(&self) -> &[Id] {
        &self.removed
    }

    /// Every new-tree id under an added branch, parent before children.
    pub fn added_ids(&self) -> &[Id] {
        &self.added
    }

    /// Ids classified as moves, in removal order.
    pub fn moved_ids(&self) -> &[Id] {
        &self.moved
    }

    /// Parent-first depth-first order.
    pub fn pre_order(&self) -> Vec<Visit> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Visit {
            node: EditNodeId::ROOT,
            parent: None,
            index: 0,
        }];
        while let Some(visit) = stack.pop() {
            out.push(visit);
            let children = &self.nodes[visit.node.0].children;
            for (index, child) in children.iter().enumerate().rev() {
                stack.push(Visit {
                    node: *child,
                    parent: Some(visit.node),
                    index,
                });
            }
        }
        out
    }

    /// Children-first depth-first order.
    pub fn post_order(&self) -> Vec<Visit> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(
            Visit {
                node: EditNodeId::ROOT,
                parent: None,
                index: 0,
            },
            false,
        )];
        while let Some((visit, expanded)) = stack.pop() {
            if expanded {
                out.push(visit);
                continue;
            }
            stack.push((visit, true));
            let children = &self.nodes[visit.node.0].children;
            for (index, child) in children.iter().enumerate().rev() {
                stack.push((
                    Visit {
                        node: *child,
                        parent: Some(visit.node),
                        index,
                    },
                    false,
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EditTree<&'static str> {
        let mk = |id, kind, old_id, new_id, children: Vec<usize>| EditNode {
            id: EditNodeId(id),
            kind,
            old_id,
            new_id,
            is_property_changed: false,
            has_child_changed: false,
            children: children.into_iter().map(EditNodeId).collect(),
        };
        EditTree {
            nodes: vec![
                mk(0, EditKind::Reserve, Some("r"), Some("r"), vec![1, 2]),
                mk(1, EditKind::Remove, Some("a"), None, vec![3]),
                mk(2, EditKind::Add, None, Some("b"), vec![]),
                mk(3, EditKind::Remove, Some("a1"), None, vec![]),
            ],
            by_old: HashMap::from([("r", EditNodeId(0)), ("a", EditNodeId(1)), ("a1", EditNodeId(3))]),
            by_new: HashMap::from([("r", EditNodeId(0)), ("b", EditNodeId(2))]),
            removed: vec!["a", "a1"],
            added: vec!["b"],
            moved: vec![],
        }
    }

    #[test]
    fn traversal_orders() {
        let tree = sample();
        let pre: Vec<_> = tree.pre_order().iter().map(|v| v.node.index()).collect();
        let post: Vec<_> = tree.post_order().iter().map(|v| v.node.index()).collect();
        assert_eq!(pre, [0, 1, 3, 2]);
        assert_eq!(post, [3, 1, 2, 0]);

        let visit_b = tree.pre_order()[3];
        assert_eq!(visit_b.parent, Some(EditNodeId::ROOT));
        assert_eq!(visit_b.index, 1);
    }

    #[test]
    fn lookups_by_tree_id() {
        let tree = sample();
        assert_eq!(tree.by_old_id(&"a1").unwrap().id(), EditNodeId(3));
        assert_eq!(tree.by_new_id(&"b").unwrap().kind(), EditKind::Add);
        assert!(tree.by_new_id(&"a").is_none());
        let kids: Vec<_> = tree.children(EditNodeId::ROOT).map(|n| n.id().index()).collect();
        assert_eq!(kids, [1, 2]);
    }

    #[test]
    fn move_kinds_project_to_move() {
        assert_eq!(EditKind::MoveSource.edit_type(), EditType::Move);
        assert_eq!(EditKind::MoveTarget.edit_type(), EditType::Move);
        assert!(EditKind::MoveTarget.survives());
        assert!(!EditKind::MoveSource.survives());
        assert!(!EditKind::Remove.survives());
        assert!(!EditKind::Reserve.is_structural_change());
    }
}
