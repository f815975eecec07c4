//! Error types for the sequence engine.

/// Errors that can occur while computing or replaying edit steps.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeqError {
    /// Reconstruction reached a grid cell with no recorded operation.
    #[error("no operation recorded for grid cell ({row}, {col})")]
    InternalInvariant {
        /// Row index (old sequence length consumed).
        row: usize,
        /// Column index (new sequence length consumed).
        col: usize,
    },

    /// A step consumed an old element out of order during replay.
    #[error("step expects old position {found}, but replay is at {expected}")]
    StepOutOfOrder {
        /// The next unconsumed old position.
        expected: usize,
        /// The old position named by the step.
        found: usize,
    },

    /// Replay finished without consuming every old element.
    #[error("replay left {remaining} old element(s) unconsumed")]
    Unconsumed {
        /// How many old elements were never touched by a step.
        remaining: usize,
    },
}

/// Convenience alias for sequence engine results.
pub type SeqResult<T> = Result<T, SeqError>;
