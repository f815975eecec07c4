//! Expansion of removed and added branches.
//!
//! The builder records a removed or added branch as a single leaf. This
//! stage walks the matching original subtree pre-order and gives every
//! descendant its own edit node of the same step, so that move detection
//! can see ids anywhere inside a branch.

use std::hash::Hash;

use tracing::debug;
use twig_seq::SeqOp;

use crate::adapter::TreeAdapter;
use crate::builder::DraftTree;
use crate::edit_tree::EditNodeId;
use crate::error::{DiffError, DiffResult, TreeSide};
use crate::index::NodeIndex;

/// Expand every removed branch (from the old tree), then every added branch
/// (from the new tree). Afterwards `draft.removed` and `draft.added` list
/// every affected id, each branch root followed by its descendants.
pub(crate) fn materialize<N, A>(
    draft: &mut DraftTree<A::Id>,
    adapter: &A,
    old: &NodeIndex<'_, N, A::Id>,
    new: &NodeIndex<'_, N, A::Id>,
) -> DiffResult<()>
where
    A: TreeAdapter<N>,
{
    let roots = std::mem::take(&mut draft.removed);
    draft.removed = expand_branches(draft, adapter, old, roots, SeqOp::Remove)?;

    let roots = std::mem::take(&mut draft.added);
    draft.added = expand_branches(draft, adapter, new, roots, SeqOp::Add)?;

    debug!(
        removed = draft.removed.len(),
        added = draft.added.len(),
        nodes = draft.nodes.len(),
        "branches materialized"
    );
    Ok(())
}

fn expand_branches<N, A>(
    draft: &mut DraftTree<A::Id>,
    adapter: &A,
    index: &NodeIndex<'_, N, A::Id>,
    roots: Vec<A::Id>,
    step: SeqOp,
) -> DiffResult<Vec<A::Id>>
where
    A: TreeAdapter<N>,
    A::Id: Clone + Eq + Hash,
{
    let side = index.side();
    let mut expanded = Vec::with_capacity(roots.len());

    for root in roots {
        let edit_root = draft.lookup(side, &root).ok_or_else(|| {
            DiffError::InternalInvariant(format!("{side} branch root {root:?} has no edit node"))
        })?;
        let tree_root = index.require(&root)?;
        expanded.push(root);

        let mut stack: Vec<(&N, EditNodeId)> = adapter
            .children(tree_root)
            .into_iter()
            .rev()
            .map(|child| (child, edit_root))
            .collect();

        while let Some((node, parent)) = stack.pop() {
            let id = adapter.node_id(node).ok_or_else(|| DiffError::Configuration {
                side,
                location: "a descendant of a changed branch".to_string(),
            })?;
            let (old_id, new_id) = match side {
                TreeSide::Old => (Some(id.clone()), None),
                TreeSide::New => (None, Some(id.clone())),
            };
            let edit = draft.push(Some(parent), step, old_id, new_id);
            expanded.push(id);

            for child in adapter.children(node).into_iter().rev() {
                stack.push((child, edit));
            }
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EditTreeBuilder;
    use crate::testutil::{leaf, node, TestAdapter};

    #[test]
    fn branches_expand_pre_order() {
        let old = node(
            "r",
            vec![node("gone", vec![node("g1", vec![leaf("g11")]), leaf("g2")]), leaf("keep")],
        );
        let new = node("r", vec![leaf("keep"), node("fresh", vec![leaf("f1")])]);
        let old_index = NodeIndex::build(&old, &TestAdapter, TreeSide::Old).unwrap();
        let new_index = NodeIndex::build(&new, &TestAdapter, TreeSide::New).unwrap();
        let mut draft = EditTreeBuilder::new(&TestAdapter, &old_index, &new_index)
            .build()
            .unwrap();
        let before = draft.nodes.len();

        materialize(&mut draft, &TestAdapter, &old_index, &new_index).unwrap();

        assert_eq!(draft.removed, ["gone", "g1", "g11", "g2"]);
        assert_eq!(draft.added, ["fresh", "f1"]);
        assert_eq!(draft.nodes.len(), before + 4);

        let gone = draft.by_old[&"gone"];
        let kids: Vec<_> = draft.nodes[gone.0]
            .children
            .iter()
            .map(|c| draft.nodes[c.0].old_id.unwrap())
            .collect();
        assert_eq!(kids, ["g1", "g2"]);

        let g11 = draft.by_old[&"g11"];
        assert_eq!(draft.nodes[g11.0].step, SeqOp::Remove);
        assert_eq!(draft.nodes[g11.0].new_id, None);
        // Removed descendants are numbered before added ones.
        assert!(g11 < draft.by_new[&"f1"]);
    }
}
