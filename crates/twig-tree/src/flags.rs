//! Bottom-up change flags.
//!
//! Children are visited before their parent, so by the time a parent is
//! evaluated every child's flags are final.

use tracing::debug;

use crate::adapter::TreeAdapter;
use crate::edit_tree::{EditKind, EditTree};
use crate::error::{DiffError, DiffResult};
use crate::index::NodeIndex;

/// Set `is_property_changed` and `has_child_changed` on every node.
///
/// Reserve nodes and both sides of a move ask the adapter whether the
/// paired nodes' properties differ. Every node is marked as having a
/// changed child when any direct child is a structural change (anything
/// but Reserve) or carries either flag.
pub(crate) fn propagate<N, A>(
    tree: &mut EditTree<A::Id>,
    adapter: &A,
    old: &NodeIndex<'_, N, A::Id>,
    new: &NodeIndex<'_, N, A::Id>,
) -> DiffResult<()>
where
    A: TreeAdapter<N>,
{
    let mut changed = 0usize;

    for visit in tree.post_order() {
        let idx = visit.node.0;
        let node = &tree.nodes[idx];

        let property_changed = match node.kind {
            EditKind::Reserve | EditKind::MoveSource | EditKind::MoveTarget => {
                let (Some(old_id), Some(new_id)) = (&node.old_id, &node.new_id) else {
                    return Err(DiffError::InternalInvariant(format!(
                        "edit node {} lacks a tree id pair",
                        node.id
                    )));
                };
                adapter.is_property_changed(old.require(old_id)?, new.require(new_id)?)
            }
            EditKind::Remove | EditKind::Add | EditKind::Replace => false,
        };

        let child_changed = node.children.iter().any(|c| {
            let child = &tree.nodes[c.0];
            child.kind.is_structural_change() || child.is_property_changed || child.has_child_changed
        });

        let node = &mut tree.nodes[idx];
        node.is_property_changed = property_changed;
        node.has_child_changed = child_changed;
        if property_changed || child_changed {
            changed += 1;
        }
    }

    debug!(changed, nodes = tree.nodes.len(), "change flags propagated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::edit_tree::EditKind;
    use crate::testutil::{leaf, node, stages};

    #[test]
    fn replaced_child_marks_parent_only() {
        let old = node("r", vec![node("a", vec![leaf("c")]), leaf("b")]);
        let new = node("r", vec![node("z", vec![leaf("c")]), leaf("b")]);
        let tree = stages(&old, &new).tree;

        let replaced = tree.by_old_id(&"a").unwrap();
        assert_eq!(replaced.kind(), EditKind::Replace);
        assert!(!replaced.has_child_changed());
        assert!(!replaced.is_property_changed());
        assert!(tree.root().has_child_changed());
        assert!(!tree.root().is_property_changed());
        assert!(!tree.by_old_id(&"b").unwrap().has_child_changed());
    }

    #[test]
    fn deep_property_change_reaches_the_root() {
        let old = node("r", vec![node("p", vec![node("q", vec![leaf("l").label("1")])])]);
        let new = node("r", vec![node("p", vec![node("q", vec![leaf("l").label("2")])])]);
        let tree = stages(&old, &new).tree;

        let changed = tree.by_new_id(&"l").unwrap();
        assert!(changed.is_property_changed());
        assert!(!changed.has_child_changed());
        for id in ["q", "p", "r"] {
            let ancestor = tree.by_new_id(&id).unwrap();
            assert!(ancestor.has_child_changed(), "{id} should see the change");
            assert!(!ancestor.is_property_changed());
        }
    }

    #[test]
    fn removed_nodes_never_report_property_changes() {
        let old = node("r", vec![node("g", vec![leaf("g1").label("x")])]);
        let new = leaf("r");
        let tree = stages(&old, &new).tree;

        for id in ["g", "g1"] {
            let removed = tree.by_old_id(&id).unwrap();
            assert_eq!(removed.kind(), EditKind::Remove);
            assert!(!removed.is_property_changed());
        }
        assert!(!tree.by_old_id(&"g1").unwrap().has_child_changed());
        assert!(tree.root().has_child_changed());
    }
}
