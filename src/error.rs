//! Error taxonomy shared by every fallible array operation.

/// Errors reported by [`ResizableArray`](crate::ResizableArray) and the
/// shared-array cursor.
///
/// Every variant is reported before the offending call mutates anything, so
/// the container is still in its prior state when an error is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// `pop`, `front` or `back` on an array with no live elements.
    #[error("array is empty")]
    EmptyContainer,

    /// Index past the live elements. For insertion `index == len` is valid;
    /// for access it is not.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },

    /// Backing storage for the requested growth could not be obtained.
    #[error("cannot reserve room for {requested} more elements")]
    ResourceExhaustion {
        /// Additional elements the caller asked for.
        requested: usize,
    },

    /// The array a cursor pointed into has been dropped.
    #[error("cursor is not bound to a live array")]
    DetachedCursor,
}
