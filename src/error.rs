//! Errors returned by [`Tree`][crate::Tree] operations.

use thiserror::Error;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong when using a [`Tree`][crate::Tree].
///
/// Both variants describe a usage error rather than a transient failure: given the same tree and
/// the same input the same error comes back every time, and the tree is never modified.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `insert` was called with a key that is already stored in the tree.
    #[error("key is already present in the tree")]
    DuplicateKey,

    /// A lookup or removal was attempted for a key that is not stored in the tree.
    #[error("key is not present in the tree")]
    KeyNotFound,
}
