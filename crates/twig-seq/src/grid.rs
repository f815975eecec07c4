//! Dynamic-programming edit distance over an `(m + 1) x (n + 1)` grid.
//!
//! Cell `(i, j)` holds the minimal cost of turning the first `i` old
//! elements into the first `j` new ones, plus the operation that won the
//! cell. When several candidates tie, the winner is chosen in the fixed
//! order Add, Remove, Reserve, Replace. Callers depend on that order to get
//! a stable minimal script, so it must not change.

use tracing::trace;

use crate::error::{SeqError, SeqResult};
use crate::step::{EditStep, SeqOp};

/// Cost and winning operation for every prefix pair.
struct Grid {
    cols: usize,
    dist: Vec<usize>,
    ops: Vec<Option<SeqOp>>,
}

impl Grid {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            dist: vec![0; rows * cols],
            ops: vec![None; rows * cols],
        }
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    #[inline]
    fn dist(&self, i: usize, j: usize) -> usize {
        self.dist[self.at(i, j)]
    }

    #[inline]
    fn op(&self, i: usize, j: usize) -> Option<SeqOp> {
        self.ops[self.at(i, j)]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, dist: usize, op: SeqOp) {
        let idx = self.at(i, j);
        self.dist[idx] = dist;
        self.ops[idx] = Some(op);
    }

    /// Fill every cell of the grid.
    fn fill<T, U, F>(old: &[T], new: &[U], mut eq: F) -> Self
    where
        F: FnMut(&T, &U) -> bool,
    {
        let (m, n) = (old.len(), new.len());
        let mut grid = Grid::new(m + 1, n + 1);

        for i in 1..=m {
            grid.set(i, 0, i, SeqOp::Remove);
        }
        for j in 1..=n {
            grid.set(0, j, j, SeqOp::Add);
        }

        for i in 1..=m {
            for j in 1..=n {
                let remove = grid.dist(i - 1, j) + 1;
                let add = grid.dist(i, j - 1) + 1;
                let diagonal = grid.dist(i - 1, j - 1);
                let replace = diagonal + 1;
                let reserve = eq(&old[i - 1], &new[j - 1]).then_some(diagonal);

                let min = [remove, add, replace, reserve.unwrap_or(usize::MAX)]
                    .into_iter()
                    .min()
                    .unwrap_or(replace);

                let op = if min == add {
                    SeqOp::Add
                } else if min == remove {
                    SeqOp::Remove
                } else if reserve == Some(min) {
                    SeqOp::Reserve
                } else {
                    SeqOp::Replace
                };
                grid.set(i, j, min, op);
            }
        }
        grid
    }

    /// Walk back from `(m, n)` to `(0, 0)`, emitting one step per cell.
    fn steps<'a, T>(&self, old: &'a [T], new: &'a [T]) -> SeqResult<Vec<EditStep<'a, T>>> {
        let (mut i, mut j) = (old.len(), new.len());
        let mut steps = Vec::with_capacity(i.max(j));

        while i > 0 || j > 0 {
            let step = match self.op(i, j) {
                Some(SeqOp::Add) if j > 0 => {
                    j -= 1;
                    EditStep::Add {
                        new_pos: j,
                        new_element: &new[j],
                    }
                }
                Some(SeqOp::Remove) if i > 0 => {
                    i -= 1;
                    EditStep::Remove {
                        old_pos: i,
                        old_element: &old[i],
                    }
                }
                Some(SeqOp::Reserve) if i > 0 && j > 0 => {
                    i -= 1;
                    j -= 1;
                    EditStep::Reserve {
                        old_pos: i,
                        new_pos: j,
                        old_element: &old[i],
                        new_element: &new[j],
                    }
                }
                Some(SeqOp::Replace) if i > 0 && j > 0 => {
                    i -= 1;
                    j -= 1;
                    EditStep::Replace {
                        old_pos: i,
                        new_pos: j,
                        old_element: &old[i],
                        new_element: &new[j],
                    }
                }
                _ => return Err(SeqError::InternalInvariant { row: i, col: j }),
            };
            trace!(op = ?step.op(), row = i, col = j, "grid step");
            steps.push(step);
        }

        steps.reverse();
        Ok(steps)
    }
}

/// Diff two sequences using `PartialEq` as the element equality.
///
/// # Example
///
/// ```
/// use twig_seq::{diff_sequences, SeqOp};
///
/// let old: Vec<char> = "abc".chars().collect();
/// let new: Vec<char> = "abd".chars().collect();
/// let steps = diff_sequences(&old, &new).unwrap();
/// let ops: Vec<SeqOp> = steps.iter().map(|s| s.op()).collect();
/// assert_eq!(ops, [SeqOp::Reserve, SeqOp::Reserve, SeqOp::Replace]);
/// ```
pub fn diff_sequences<'a, T: PartialEq>(
    old: &'a [T],
    new: &'a [T],
) -> SeqResult<Vec<EditStep<'a, T>>> {
    diff_sequences_by(old, new, |a, b| a == b)
}

/// Diff two sequences with a caller-supplied equality predicate.
///
/// The result is a minimal-length list of steps which, applied left to
/// right to `old`, yields `new`. Runs in `O(m * n)` time and space.
pub fn diff_sequences_by<'a, T, F>(
    old: &'a [T],
    new: &'a [T],
    eq: F,
) -> SeqResult<Vec<EditStep<'a, T>>>
where
    F: FnMut(&T, &T) -> bool,
{
    let grid = Grid::fill(old, new, eq);
    let steps = grid.steps(old, new)?;
    trace!(
        old_len = old.len(),
        new_len = new.len(),
        steps = steps.len(),
        "sequence diff done"
    );
    Ok(steps)
}

/// The minimal number of changing steps (Add, Remove, Replace) between two sequences.
pub fn edit_distance<T, U, F>(old: &[T], new: &[U], eq: F) -> usize
where
    F: FnMut(&T, &U) -> bool,
{
    Grid::fill(old, new, eq).dist(old.len(), new.len())
}
