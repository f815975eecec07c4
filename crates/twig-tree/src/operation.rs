//! Replayable operations.
//!
//! Operations are applied in the order emitted: every structural operation
//! comes before every property operation, and within each group parents
//! come before their children.

use serde::Serialize;

/// A single step of the patch turning the old tree into the new one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation<Id, D> {
    /// Insert new node `node_id` under `parent_node_id`, right after
    /// `pre_node_id` (at the front when `None`).
    Add {
        node_id: Id,
        parent_node_id: Id,
        pre_node_id: Option<Id>,
    },
    /// Remove `node_id` and its whole branch.
    Remove { node_id: Id },
    /// Relocate existing node `node_id` under `parent_node_id`, right after
    /// `pre_node_id` (at the front when `None`).
    Move {
        node_id: Id,
        parent_node_id: Id,
        pre_node_id: Option<Id>,
    },
    /// Swap old node `source_node_id` for new node `target_node_id` in place.
    Replace {
        source_node_id: Id,
        target_node_id: Id,
    },
    /// Apply a caller-defined property change to `node_id`.
    ModifyProperty { node_id: Id, detail: D },
}

impl<Id, D> Operation<Id, D> {
    /// Returns `true` for property operations.
    pub fn is_property(&self) -> bool {
        matches!(self, Operation::ModifyProperty { .. })
    }

    /// The node this operation acts on (the source node for a replace).
    pub fn node_id(&self) -> &Id {
        match self {
            Operation::Add { node_id, .. }
            | Operation::Remove { node_id }
            | Operation::Move { node_id, .. }
            | Operation::ModifyProperty { node_id, .. } => node_id,
            Operation::Replace { source_node_id, .. } => source_node_id,
        }
    }
}

/// Per-kind operation counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OperationSummary {
    pub additions: usize,
    pub removals: usize,
    pub moves: usize,
    pub replacements: usize,
    pub property_changes: usize,
}

impl OperationSummary {
    /// Count the operations in `ops`.
    pub fn of<Id, D>(ops: &[Operation<Id, D>]) -> Self {
        ops.iter().fold(Self::default(), |mut acc, op| {
            match op {
                Operation::Add { .. } => acc.additions += 1,
                Operation::Remove { .. } => acc.removals += 1,
                Operation::Move { .. } => acc.moves += 1,
                Operation::Replace { .. } => acc.replacements += 1,
                Operation::ModifyProperty { .. } => acc.property_changes += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.additions + self.removals + self.moves + self.replacements + self.property_changes
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_internally_tagged() {
        let op: Operation<&str, ()> = Operation::Move {
            node_id: "x",
            parent_node_id: "p",
            pre_node_id: None,
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "move", "node_id": "x", "parent_node_id": "p", "pre_node_id": null})
        );

        let op: Operation<&str, u32> = Operation::ModifyProperty { node_id: "x", detail: 7 };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "modify_property", "node_id": "x", "detail": 7})
        );
    }

    #[test]
    fn summary_counts_each_kind() {
        let ops: Vec<Operation<&str, ()>> = vec![
            Operation::Remove { node_id: "a" },
            Operation::Add { node_id: "b", parent_node_id: "r", pre_node_id: None },
            Operation::Add { node_id: "c", parent_node_id: "r", pre_node_id: Some("b") },
            Operation::ModifyProperty { node_id: "r", detail: () },
        ];
        let summary = OperationSummary::of(&ops);
        assert_eq!(summary.additions, 2);
        assert_eq!(summary.removals, 1);
        assert_eq!(summary.property_changes, 1);
        assert_eq!(summary.total(), 4);
        assert!(!summary.is_empty());
        assert_eq!(ops[3].node_id(), &"r");
        assert!(ops[3].is_property());
    }
}
