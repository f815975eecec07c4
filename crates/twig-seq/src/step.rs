//! Edit steps and their replay.

use serde::Serialize;

use crate::error::{SeqError, SeqResult};

/// The kind of an [`EditStep`], also used to record the winner of each grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeqOp {
    /// Insert a new element.
    Add,
    /// Drop an old element.
    Remove,
    /// Keep an old element that is equal to the new one.
    Reserve,
    /// Overwrite an old element with an unequal new one.
    Replace,
}

/// A single step transforming the old sequence into the new one.
///
/// Positions are 0-based indices into the original inputs, not into any
/// intermediate state.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep<'a, T> {
    /// Insert `new_element`, found at `new_pos` in the new sequence.
    Add { new_pos: usize, new_element: &'a T },
    /// Drop `old_element`, found at `old_pos` in the old sequence.
    Remove { old_pos: usize, old_element: &'a T },
    /// Keep `old_element`; it matches `new_element`.
    Reserve {
        old_pos: usize,
        new_pos: usize,
        old_element: &'a T,
        new_element: &'a T,
    },
    /// Swap `old_element` for the unmatched `new_element` in place.
    Replace {
        old_pos: usize,
        new_pos: usize,
        old_element: &'a T,
        new_element: &'a T,
    },
}

// Manual impls: a derive would demand `T: Clone`/`T: Copy`.
impl<T> Clone for EditStep<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EditStep<'_, T> {}

impl<'a, T> EditStep<'a, T> {
    /// The step's discriminant.
    pub fn op(&self) -> SeqOp {
        match self {
            EditStep::Add { .. } => SeqOp::Add,
            EditStep::Remove { .. } => SeqOp::Remove,
            EditStep::Reserve { .. } => SeqOp::Reserve,
            EditStep::Replace { .. } => SeqOp::Replace,
        }
    }

    /// Position in the old sequence, if the step consumes an old element.
    pub fn old_pos(&self) -> Option<usize> {
        match self {
            EditStep::Add { .. } => None,
            EditStep::Remove { old_pos, .. }
            | EditStep::Reserve { old_pos, .. }
            | EditStep::Replace { old_pos, .. } => Some(*old_pos),
        }
    }

    /// Position in the new sequence, if the step produces a new element.
    pub fn new_pos(&self) -> Option<usize> {
        match self {
            EditStep::Remove { .. } => None,
            EditStep::Add { new_pos, .. }
            | EditStep::Reserve { new_pos, .. }
            | EditStep::Replace { new_pos, .. } => Some(*new_pos),
        }
    }

    /// The old element, if any.
    pub fn old_element(&self) -> Option<&'a T> {
        match *self {
            EditStep::Add { .. } => None,
            EditStep::Remove { old_element, .. }
            | EditStep::Reserve { old_element, .. }
            | EditStep::Replace { old_element, .. } => Some(old_element),
        }
    }

    /// The new element, if any.
    pub fn new_element(&self) -> Option<&'a T> {
        match *self {
            EditStep::Remove { .. } => None,
            EditStep::Add { new_element, .. }
            | EditStep::Reserve { new_element, .. }
            | EditStep::Replace { new_element, .. } => Some(new_element),
        }
    }

    /// Returns `true` for Add, Remove and Replace steps.
    pub fn is_change(&self) -> bool {
        !matches!(self, EditStep::Reserve { .. })
    }
}

/// Replay `steps` left to right against `old`, producing the new sequence.
///
/// Reserved elements are taken from `old`; added and replaced elements from
/// the steps. Every old element must be consumed exactly once, in order.
pub fn apply_steps<T: Clone>(old: &[T], steps: &[EditStep<'_, T>]) -> SeqResult<Vec<T>> {
    let mut out = Vec::with_capacity(steps.len());
    let mut cursor = 0usize;

    for step in steps {
        if let Some(pos) = step.old_pos() {
            if pos != cursor || pos >= old.len() {
                return Err(SeqError::StepOutOfOrder {
                    expected: cursor,
                    found: pos,
                });
            }
            cursor += 1;
        }
        match step {
            EditStep::Add { new_element, .. } | EditStep::Replace { new_element, .. } => {
                out.push((*new_element).clone());
            }
            EditStep::Reserve { old_pos, .. } => out.push(old[*old_pos].clone()),
            EditStep::Remove { .. } => {}
        }
    }

    if cursor != old.len() {
        return Err(SeqError::Unconsumed {
            remaining: old.len() - cursor,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_variant() {
        let a = 'a';
        let b = 'b';
        let add = EditStep::Add { new_pos: 3, new_element: &b };
        assert_eq!(add.op(), SeqOp::Add);
        assert_eq!(add.old_pos(), None);
        assert_eq!(add.new_pos(), Some(3));
        assert_eq!(add.new_element(), Some(&'b'));
        assert!(add.is_change());

        let keep = EditStep::Reserve { old_pos: 1, new_pos: 2, old_element: &a, new_element: &a };
        assert_eq!(keep.op(), SeqOp::Reserve);
        assert_eq!(keep.old_pos(), Some(1));
        assert_eq!(keep.old_element(), Some(&'a'));
        assert!(!keep.is_change());
    }

    #[test]
    fn replay_rejects_skipped_old_element() {
        let old = ['x', 'y'];
        let steps = [EditStep::Remove { old_pos: 1, old_element: &old[1] }];
        let err = apply_steps(&old, &steps).unwrap_err();
        assert_eq!(err, SeqError::StepOutOfOrder { expected: 0, found: 1 });
    }

    #[test]
    fn replay_rejects_unconsumed_tail() {
        let old = ['x', 'y'];
        let steps = [EditStep::Reserve { old_pos: 0, new_pos: 0, old_element: &old[0], new_element: &old[0] }];
        let err = apply_steps(&old, &steps).unwrap_err();
        assert_eq!(err, SeqError::Unconsumed { remaining: 1 });
    }

    #[test]
    fn step_serializes_with_tag() {
        let c = 'c';
        let json = serde_json::to_value(EditStep::Add { new_pos: 0, new_element: &c }).unwrap();
        assert_eq!(json, serde_json::json!({"op": "add", "new_pos": 0, "new_element": "c"}));
    }
}
