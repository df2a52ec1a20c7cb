//! Error types for accord-verify.

use accord_slate::ItemId;
use thiserror::Error;

/// Result type for accord-verify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during verification.
///
/// These are programming errors in the surrounding pipeline, not
/// verification failures. A constraint violation is reported inside a
/// [`Verification`](crate::Verification), never as an `Error`.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A verified selection references an item the catalog does not know.
    /// The subset check guarantees the item was shown to the mediator, so a
    /// missing catalog entry means the inputs are malformed.
    #[error("item {0} has no catalog metadata")]
    UnknownItem(ItemId),
}
