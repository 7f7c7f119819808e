//! Error types for the hydat-calendar crate.

/// Error type for all fallible operations in the hydat-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a 0-based month index is outside the valid range 0..12.
    #[error("invalid month index: {index} (must be 0..12)")]
    InvalidMonthIndex {
        /// The invalid month index that was provided.
        index: usize,
    },
}
