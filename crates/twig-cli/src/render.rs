//! Plain-text rendering of diff results. Colour is applied by the caller.

use twig_json::{FieldChange, JsonOperation};
use twig_seq::EditStep;
use twig_tree::{EditKind, EditNode, EditTree, Operation, OperationSummary};

fn anchor(pre: &Option<String>) -> String {
    match pre {
        Some(pre) => format!("after {pre}"),
        None => "first".to_string(),
    }
}

pub fn operation_line(op: &JsonOperation) -> String {
    match op {
        Operation::Add { node_id, parent_node_id, pre_node_id } => {
            format!("+ add {node_id} under {parent_node_id}, {}", anchor(pre_node_id))
        }
        Operation::Remove { node_id } => format!("- remove {node_id}"),
        Operation::Move { node_id, parent_node_id, pre_node_id } => {
            format!("> move {node_id} under {parent_node_id}, {}", anchor(pre_node_id))
        }
        Operation::Replace { source_node_id, target_node_id } => {
            format!("= replace {source_node_id} with {target_node_id}")
        }
        Operation::ModifyProperty { node_id, detail } => {
            format!("* modify {node_id} ({} fields)", detail.changes.len())
        }
    }
}

pub fn field_line(change: &FieldChange) -> String {
    match change {
        FieldChange::Added { key, value } => format!("{key}: + {value}"),
        FieldChange::Removed { key, value } => format!("{key}: - {value}"),
        FieldChange::Modified { key, old, new } => format!("{key}: {old} -> {new}"),
    }
}

pub fn summary_line(summary: &OperationSummary) -> String {
    if summary.is_empty() {
        return "no changes".to_string();
    }
    format!(
        "{} operations: {} added, {} removed, {} moved, {} replaced, {} modified",
        summary.total(),
        summary.additions,
        summary.removals,
        summary.moves,
        summary.replacements,
        summary.property_changes
    )
}

fn node_label(node: &EditNode<String>) -> String {
    let id = |side: Option<&String>| side.cloned().unwrap_or_default();
    let mut label = match node.kind() {
        EditKind::Reserve => format!("reserve {}", id(node.new_tree_node_id())),
        EditKind::Replace => format!(
            "replace {} -> {}",
            id(node.old_tree_node_id()),
            id(node.new_tree_node_id())
        ),
        EditKind::Remove => format!("remove {}", id(node.old_tree_node_id())),
        EditKind::Add => format!("add {}", id(node.new_tree_node_id())),
        EditKind::MoveSource => format!("move-from {}", id(node.old_tree_node_id())),
        EditKind::MoveTarget => format!("move-to {}", id(node.new_tree_node_id())),
    };
    if node.is_property_changed() {
        label.push_str(" [props]");
    }
    if node.has_child_changed() {
        label.push_str(" [children]");
    }
    label
}

/// The edit tree as an indented outline, parents first.
pub fn tree_outline(tree: &EditTree<String>) -> Vec<String> {
    let mut depth = vec![0usize; tree.len()];
    let mut lines = Vec::with_capacity(tree.len());
    for visit in tree.pre_order() {
        let level = visit.parent.map_or(0, |p| depth[p.index()] + 1);
        depth[visit.node.index()] = level;
        if let Some(node) = tree.get(visit.node) {
            lines.push(format!("{}{}", "  ".repeat(level), node_label(node)));
        }
    }
    lines
}

pub fn step_line(step: &EditStep<'_, String>) -> String {
    match step {
        EditStep::Add { new_pos, new_element } => format!("+ {new_pos:>3}      {new_element:?}"),
        EditStep::Remove { old_pos, old_element } => format!("- {old_pos:>3}      {old_element:?}"),
        EditStep::Reserve { old_pos, new_pos, old_element, .. } => {
            format!("  {old_pos:>3} -> {new_pos:<3} {old_element:?}")
        }
        EditStep::Replace { old_pos, new_pos, old_element, new_element } => {
            format!("~ {old_pos:>3} -> {new_pos:<3} {old_element:?} -> {new_element:?}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use twig_json::{JsonTree, PropertyChange};
    use twig_tree::TreeDiff;

    #[test]
    fn operation_lines() {
        let add: JsonOperation = Operation::Add {
            node_id: "n".into(),
            parent_node_id: "r".into(),
            pre_node_id: None,
        };
        assert_eq!(operation_line(&add), "+ add n under r, first");

        let modify: JsonOperation = Operation::ModifyProperty {
            node_id: "n".into(),
            detail: PropertyChange {
                node_id: "n".into(),
                changes: vec![FieldChange::Modified { key: "k".into(), old: json!(1), new: json!(2) }],
            },
        };
        assert_eq!(operation_line(&modify), "* modify n (1 fields)");
        assert_eq!(field_line(&FieldChange::Added { key: "k".into(), value: json!("v") }), "k: + \"v\"");
    }

    #[test]
    fn empty_summary() {
        assert_eq!(summary_line(&OperationSummary::default()), "no changes");
    }

    #[test]
    fn outline_indents_children() {
        let old = json!({"id": "r", "children": [{"id": "a"}, {"id": "b"}]});
        let new = json!({"id": "r", "children": [{"id": "a", "x": 1}]});
        let diff = TreeDiff::new(&old, &new, JsonTree::default());
        let lines = tree_outline(diff.edit_tree().unwrap());
        assert_eq!(
            lines,
            vec![
                "reserve r [children]".to_string(),
                "  reserve a [props]".to_string(),
                "  remove b".to_string(),
            ]
        );
    }
}
