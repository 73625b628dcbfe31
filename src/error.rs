use thiserror::Error;

/// Errors reported by [`SkipListSet`](crate::SkipListSet) and its cursor.
///
/// Expected outcomes such as inserting a duplicate or removing a missing
/// element are reported through `bool` returns, not through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipListError {
    /// An argument was rejected before any state was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `first` or `last` was called on an empty set.
    #[error("the set is empty")]
    Empty,

    /// A cursor was advanced past its last element.
    #[error("no more elements")]
    NoSuchElement,

    /// The operation is deliberately not provided.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// The node graph breaks one of its structural invariants.
    #[error("corrupt node graph at level {level}: {reason}")]
    Corrupt {
        /// Level at which the violation was found (1 is the bottom).
        level: usize,
        /// What was wrong.
        reason: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SkipListError>;
