//! Sequence edit distance for Twig.
//!
//! Computes the minimal list of edit steps that turns one ordered sequence
//! into another. The tree reconciliation engine in `twig-tree` runs this on
//! every matched pair of child lists, so its tie-break order is part of the
//! observable output.
//!
//! # Key Types
//!
//! - [`EditStep`] -- One Add/Remove/Reserve/Replace step, with positions into the inputs
//! - [`SeqOp`] -- The discriminant of an [`EditStep`]
//! - [`diff_sequences`] / [`diff_sequences_by`] -- Compute the steps
//! - [`apply_steps`] -- Replay steps against the old sequence

pub mod error;
pub mod grid;
pub mod step;

pub use error::{SeqError, SeqResult};
pub use grid::{diff_sequences, diff_sequences_by, edit_distance};
pub use step::{apply_steps, EditStep, SeqOp};
