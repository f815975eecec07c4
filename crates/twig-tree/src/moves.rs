//! Move detection and final resolution of draft nodes.
//!
//! An id that is both removed (somewhere in the old tree) and added
//! (somewhere in the new tree) is a move. Correlation is purely by id: two
//! unrelated branches that happen to reuse an id are also reported as a
//! move.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;
use twig_seq::SeqOp;

use crate::builder::DraftTree;
use crate::edit_tree::{EditKind, EditNode, EditNodeId, EditTree};

/// Ids present in both the removed and the added lists, in removal order.
pub(crate) fn detect_moves<Id: Clone + Eq + Hash>(draft: &DraftTree<Id>) -> Vec<Id> {
    let added: HashSet<&Id> = draft.added.iter().collect();
    let moved: Vec<Id> = draft
        .removed
        .iter()
        .filter(|id| added.contains(id))
        .cloned()
        .collect();
    debug!(moved = moved.len(), "moves detected");
    moved
}

/// Turn every draft into its final [`EditNode`].
///
/// A removed node whose id is in `moved` becomes a move source, an added
/// one a move target; both then carry the id on both sides. Change flags
/// start cleared.
pub(crate) fn resolve<Id: Clone + Eq + Hash>(draft: DraftTree<Id>, moved: Vec<Id>) -> EditTree<Id> {
    let nodes: Vec<EditNode<Id>> = {
        let moved_set: HashSet<&Id> = moved.iter().collect();
        let is_moved = |id: &Option<Id>| id.as_ref().is_some_and(|id| moved_set.contains(id));

        draft
            .nodes
            .into_iter()
            .enumerate()
            .map(|(idx, node)| {
                let (kind, old_id, new_id) = match node.step {
                    SeqOp::Reserve => (EditKind::Reserve, node.old_id, node.new_id),
                    SeqOp::Replace => (EditKind::Replace, node.old_id, node.new_id),
                    SeqOp::Remove if is_moved(&node.old_id) => {
                        (EditKind::MoveSource, node.old_id.clone(), node.old_id)
                    }
                    SeqOp::Remove => (EditKind::Remove, node.old_id, None),
                    SeqOp::Add if is_moved(&node.new_id) => {
                        (EditKind::MoveTarget, node.new_id.clone(), node.new_id)
                    }
                    SeqOp::Add => (EditKind::Add, None, node.new_id),
                };
                EditNode {
                    id: EditNodeId(idx),
                    kind,
                    old_id,
                    new_id,
                    is_property_changed: false,
                    has_child_changed: false,
                    children: node.children,
                }
            })
            .collect()
    };

    EditTree {
        nodes,
        by_old: draft.by_old,
        by_new: draft.by_new,
        removed: draft.removed,
        added: draft.added,
        moved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EditTreeBuilder;
    use crate::error::TreeSide;
    use crate::index::NodeIndex;
    use crate::materialize::materialize;
    use crate::testutil::{leaf, node, Node, TestAdapter};

    fn resolved(old: &Node, new: &Node) -> EditTree<&'static str> {
        let old_index = NodeIndex::build(old, &TestAdapter, TreeSide::Old).unwrap();
        let new_index = NodeIndex::build(new, &TestAdapter, TreeSide::New).unwrap();
        let mut draft = EditTreeBuilder::new(&TestAdapter, &old_index, &new_index)
            .build()
            .unwrap();
        materialize(&mut draft, &TestAdapter, &old_index, &new_index).unwrap();
        let moved = detect_moves(&draft);
        resolve(draft, moved)
    }

    #[test]
    fn relocated_branch_becomes_move_pair() {
        let old = node("r", vec![node("p1", vec![node("x", vec![leaf("y")])]), leaf("p2")]);
        let new = node("r", vec![leaf("p1"), node("p2", vec![node("x", vec![leaf("y")])])]);
        let tree = resolved(&old, &new);

        assert_eq!(tree.moved_ids(), ["x", "y"]);

        let source = tree.by_old_id(&"x").unwrap();
        let target = tree.by_new_id(&"x").unwrap();
        assert!(source.move_source());
        assert!(target.move_target());
        assert_ne!(source.id(), target.id());
        assert_eq!(source.old_tree_node_id(), Some(&"x"));
        assert_eq!(source.new_tree_node_id(), Some(&"x"));
        assert_eq!(target.old_tree_node_id(), Some(&"x"));
        assert!(tree.by_new_id(&"y").unwrap().move_target());
    }

    #[test]
    fn plain_removal_stays_removal() {
        let old = node("r", vec![leaf("a"), leaf("b")]);
        let new = node("r", vec![leaf("a")]);
        let tree = resolved(&old, &new);

        assert!(tree.moved_ids().is_empty());
        let b = tree.by_old_id(&"b").unwrap();
        assert_eq!(b.kind(), EditKind::Remove);
        assert_eq!(b.new_tree_node_id(), None);
    }

    #[test]
    fn partial_branch_move_leaves_rest_removed() {
        // "x" moves out of "gone"; "gone" and "z" are deleted.
        let old = node("r", vec![node("gone", vec![leaf("x"), leaf("z")]), leaf("keep")]);
        let new = node("r", vec![node("keep", vec![leaf("x")])]);
        let tree = resolved(&old, &new);

        assert_eq!(tree.moved_ids(), ["x"]);
        assert_eq!(tree.by_old_id(&"gone").unwrap().kind(), EditKind::Remove);
        assert_eq!(tree.by_old_id(&"z").unwrap().kind(), EditKind::Remove);
        assert_eq!(tree.by_old_id(&"x").unwrap().kind(), EditKind::MoveSource);
        assert_eq!(tree.by_new_id(&"x").unwrap().kind(), EditKind::MoveTarget);
    }
}
