use thiserror::Error;

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, Error, PartialEq)]
pub enum Error<K> {
    /// Argument is outside the domain of the operation, like a rank
    /// beyond the number of entries, or a meaningless [`Config`] value.
    ///
    /// [`Config`]: crate::Config
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No key satisfies the query, returned by floor() and ceiling().
    #[error("no qualifying key")]
    NotFound,
    /// Query needs at least one entry, returned by min(), max(), floor()
    /// and ceiling() on an empty table.
    #[error("empty table")]
    EmptyTable,
    /// Returned by delete_min() and delete_max() on an empty table.
    #[error("table underflow")]
    Underflow,
    /// Returned by create() API when key is already present.
    #[error("key already present")]
    OverwriteKey,
    /// Fatal case, a red node has a red child.
    #[error("consecutive red links")]
    ConsecutiveReds,
    /// Fatal case, a red link is leaning right.
    #[error("red link leaning right")]
    RightLeaningRed,
    /// Fatal case, paths from root to leaf differ in black links. The
    /// String component of this variant can be used for debugging.
    #[error("unbalanced blacks, {0}")]
    UnbalancedBlacks(String),
    /// Fatal case, index entries are not in sort-order.
    #[error("sort error, {0:?} against {1:?}")]
    SortError(K, K),
    /// Fatal case, cached subtree size does not match its children.
    #[error("size mismatch, {0}")]
    SizeMismatch(String),
    /// Fatal case, rank() and select() do not invert each other.
    #[error("rank/select mismatch, {0}")]
    RankSelect(String),
}

/// Result type returned by [`Llrb`] operations.
///
/// [`Llrb`]: crate::Llrb
pub type Result<T, K> = std::result::Result<T, Error<K>>;
