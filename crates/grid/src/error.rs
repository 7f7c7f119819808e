//! Error types for hydat-grid.

/// Error type for all fallible operations in the hydat-grid crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when two grids that must align have different shapes.
    #[error("{what}: expected shape {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Which operand disagreed.
        what: &'static str,
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// Returned when a reduction window contains no days.
    #[error("empty reduction window for month index {month}")]
    EmptyWindow {
        /// 0-based month index of the window.
        month: usize,
    },

    /// Returned when a reducer name cannot be parsed.
    #[error("unknown reducer '{name}' (expected 'average', 'net_change' or 'sum')")]
    UnknownReducer {
        /// The name that was provided.
        name: String,
    },

    /// Calendar error.
    #[error(transparent)]
    Calendar(#[from] hydat_calendar::CalendarError),
}
